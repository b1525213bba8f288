//! Type alias resolution: which non-primitive types need a declaration, and
//! which of them are shared by more than one field.

use crate::ast::{MessageSpec, PrimitiveType, Schema, TypeDecl};
use crate::error::GenError;
use std::collections::HashMap;

/// One alias declaration: `name` bound to a target-language `declaration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub name: String,
    pub declaration: String,
}

/// Ordered alias declarations. Keys are unique; insertion order is emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: Vec<AliasEntry>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration. Returns false (and keeps the first) if `name` is already present.
    pub fn insert(&mut self, name: impl Into<String>, declaration: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push(AliasEntry {
            name,
            declaration: declaration.into(),
        });
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.declaration.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Alias names referenced by two or more distinct fields, with their use count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepeatAliasMap {
    entries: Vec<(String, usize)>,
}

impl RepeatAliasMap {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn uses(&self, name: &str) -> Option<usize> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of [`resolve_aliases`]. Shared read-only between artifact compilations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasResolution {
    pub aliases: AliasMap,
    pub repeats: RepeatAliasMap,
}

/// Resolve every field type of `messages` against the `types` catalogue.
///
/// Fails on the first non-primitive reference (in schema order) with no declaration.
pub fn resolve_aliases(types: &[TypeDecl], messages: &[MessageSpec]) -> Result<AliasResolution, GenError> {
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for m in messages {
        for f in &m.fields {
            if PrimitiveType::is_primitive(&f.type_ref) {
                continue;
            }
            if !types.iter().any(|t| t.name == f.type_ref) {
                return Err(GenError::UnresolvedType {
                    message: m.name.clone(),
                    id: m.id,
                    field: f.name.clone(),
                    type_ref: f.type_ref.clone(),
                });
            }
            *uses.entry(f.type_ref.as_str()).or_insert(0) += 1;
        }
    }

    let mut aliases = AliasMap::new();
    let mut repeats = RepeatAliasMap::default();
    for t in types {
        let count = match uses.get(t.name.as_str()) {
            Some(&c) => c,
            None => {
                tracing::warn!(alias = %t.name, "type declared but not used by any field");
                continue;
            }
        };
        if !aliases.insert(t.name.clone(), t.declaration.clone()) {
            tracing::warn!(alias = %t.name, "duplicate type declaration, keeping the first");
            continue;
        }
        if count >= 2 {
            repeats.entries.push((t.name.clone(), count));
        }
    }

    tracing::debug!(
        aliases = aliases.len(),
        repeats = repeats.len(),
        "resolved type aliases"
    );
    Ok(AliasResolution { aliases, repeats })
}

/// [`resolve_aliases`] over a whole schema.
pub fn resolve_schema_aliases(schema: &Schema) -> Result<AliasResolution, GenError> {
    resolve_aliases(&schema.types, &schema.messages)
}
