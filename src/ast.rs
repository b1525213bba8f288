//! Schema model: messages, fields and the schema-local type catalogue.

use crate::error::GenError;
use std::collections::{HashMap, HashSet};

/// Root schema: type declarations and messages, both in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub types: Vec<TypeDecl>,
    pub messages: Vec<MessageSpec>,
}

/// Binds a non-primitive type name to its target-language declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub declaration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageSpec {
    /// Wire identifier; unique across the schema.
    pub id: u64,
    pub name: String,
    /// Wire order. Never re-sorted.
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_ref: String,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Required,
    Optional,
    Repeated,
}

/// Built-in wire types. These never need an alias declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    Bool,
    Varint,
    Bytes,
    String,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        let p = match name {
            "u8" => PrimitiveType::U8,
            "u16" => PrimitiveType::U16,
            "u32" => PrimitiveType::U32,
            "u64" => PrimitiveType::U64,
            "i8" => PrimitiveType::I8,
            "i16" => PrimitiveType::I16,
            "i32" => PrimitiveType::I32,
            "i64" => PrimitiveType::I64,
            "bool" => PrimitiveType::Bool,
            "varint" => PrimitiveType::Varint,
            "bytes" => PrimitiveType::Bytes,
            "string" => PrimitiveType::String,
            _ => return None,
        };
        Some(p)
    }

    pub fn is_primitive(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl MessageSpec {
    pub fn new(id: u64, name: impl Into<String>, fields: Vec<Field>) -> Self {
        MessageSpec {
            id,
            name: name.into(),
            fields,
        }
    }
}

impl Field {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>, cardinality: Cardinality) -> Self {
        Field {
            name: name.into(),
            type_ref: type_ref.into(),
            cardinality,
        }
    }

    pub fn required(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self::new(name, type_ref, Cardinality::Required)
    }

    pub fn optional(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self::new(name, type_ref, Cardinality::Optional)
    }

    pub fn repeated(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self::new(name, type_ref, Cardinality::Repeated)
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        PrimitiveType::from_name(&self.type_ref)
    }
}

/// Schema after structural checks, with messages indexed by name and id.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub schema: Schema,
    pub messages_by_name: HashMap<String, usize>,
    pub messages_by_id: HashMap<u64, usize>,
}

/// Structural checks on a borrowed schema: no primitive shadowing, no
/// duplicate type names, message ids, message names or field names.
pub fn check_schema(schema: &Schema) -> Result<(), GenError> {
    let mut types_seen = HashSet::new();
    for t in &schema.types {
        if PrimitiveType::is_primitive(&t.name) {
            return Err(GenError::PrimitiveShadowed(t.name.clone()));
        }
        if !types_seen.insert(t.name.as_str()) {
            return Err(GenError::DuplicateType(t.name.clone()));
        }
    }

    let mut ids: HashMap<u64, &str> = HashMap::new();
    let mut names = HashSet::new();
    for m in &schema.messages {
        if let Some(first) = ids.insert(m.id, m.name.as_str()) {
            return Err(GenError::DuplicateMessageId {
                id: m.id,
                first: first.to_string(),
                second: m.name.clone(),
            });
        }
        if !names.insert(m.name.as_str()) {
            return Err(GenError::DuplicateMessageName(m.name.clone()));
        }
        let mut fields_seen = HashSet::new();
        for f in &m.fields {
            if !fields_seen.insert(f.name.as_str()) {
                return Err(GenError::DuplicateField {
                    message: m.name.clone(),
                    field: f.name.clone(),
                });
            }
        }
    }
    Ok(())
}

impl ResolvedSchema {
    pub fn resolve(schema: Schema) -> Result<Self, GenError> {
        check_schema(&schema)?;
        let messages_by_name = schema
            .messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        let messages_by_id = schema
            .messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect();
        Ok(ResolvedSchema {
            schema,
            messages_by_name,
            messages_by_id,
        })
    }

    pub fn get_message(&self, name: &str) -> Option<&MessageSpec> {
        self.messages_by_name
            .get(name)
            .map(|&i| &self.schema.messages[i])
    }

    pub fn get_message_by_id(&self, id: u64) -> Option<&MessageSpec> {
        self.messages_by_id
            .get(&id)
            .map(|&i| &self.schema.messages[i])
    }
}
