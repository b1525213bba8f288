//! Error taxonomy for schema checks, alias resolution and artifact compilation.

use crate::template::TemplateKey;

/// Broad class of a fatal error. Neither class is recoverable within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing template, unresolvable type, bad type catalogue.
    Configuration,
    /// Schema contradicts itself (duplicate ids, names or fields).
    Consistency,
}

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Template not found: {0}")]
    TemplateNotFound(TemplateKey),
    #[error("Template for {key} has the wrong shape: expected {expected}, found {found}")]
    TemplateShape {
        key: TemplateKey,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Unresolved type `{type_ref}` in field {message}.{field} (message id {id:#x})")]
    UnresolvedType {
        message: String,
        id: u64,
        field: String,
        type_ref: String,
    },
    #[error("Duplicate type declaration: {0}")]
    DuplicateType(String),
    #[error("Type declaration shadows primitive type: {0}")]
    PrimitiveShadowed(String),
    #[error("Duplicate message id {id:#x}: {first} and {second}")]
    DuplicateMessageId { id: u64, first: String, second: String },
    #[error("Duplicate message name: {0}")]
    DuplicateMessageName(String),
    #[error("Duplicate field {field} in message {message}")]
    DuplicateField { message: String, field: String },
}

impl GenError {
    pub fn class(&self) -> ErrorClass {
        match self {
            GenError::TemplateNotFound(_)
            | GenError::TemplateShape { .. }
            | GenError::UnresolvedType { .. }
            | GenError::DuplicateType(_)
            | GenError::PrimitiveShadowed(_) => ErrorClass::Configuration,
            GenError::DuplicateMessageId { .. }
            | GenError::DuplicateMessageName(_)
            | GenError::DuplicateField { .. } => ErrorClass::Consistency,
        }
    }
}
