//! Discard policy: fields kept in the schema for wire compatibility but left out
//! of generated encode/decode logic.
//!
//! Names apply to every message. A name written `Message.field` applies to that
//! message only.

use crate::ast::{Field, MessageSpec};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Whether discarded fields still appear in declared structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardMode {
    /// Dropped from declarations and from codec logic.
    #[default]
    Omit,
    /// Declared (annotated) but never encoded or decoded.
    Declare,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscardSet {
    global: BTreeSet<String>,
    scoped: BTreeSet<(String, String)>,
    mode: DiscardMode,
}

impl DiscardSet {
    pub fn new(mode: DiscardMode) -> Self {
        DiscardSet {
            mode,
            ..Default::default()
        }
    }

    /// Build from names; `Message.field` entries are scoped to one message.
    pub fn from_names<I, S>(names: I, mode: DiscardMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new(mode);
        for n in names {
            set.insert(n.as_ref());
        }
        set
    }

    pub fn insert(&mut self, name: &str) {
        match name.split_once('.') {
            Some((message, field)) => {
                self.scoped.insert((message.to_string(), field.to_string()));
            }
            None => {
                self.global.insert(name.to_string());
            }
        }
    }

    pub fn mode(&self) -> DiscardMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.scoped.is_empty()
    }

    pub fn is_discarded(&self, message: &str, field: &str) -> bool {
        self.global.contains(field)
            || self
                .scoped
                .iter()
                .any(|(m, f)| m == message && f == field)
    }

    /// Fields that take part in encode/decode logic, in wire order.
    pub fn encoded_fields<'m>(&'m self, message: &'m MessageSpec) -> impl Iterator<Item = &'m Field> + 'm {
        message
            .fields
            .iter()
            .filter(move |f| !self.is_discarded(&message.name, &f.name))
    }

    /// Fields declared in the message structure, paired with their discard flag.
    pub fn declared_fields<'m>(
        &'m self,
        message: &'m MessageSpec,
    ) -> impl Iterator<Item = (&'m Field, bool)> + 'm {
        message.fields.iter().filter_map(move |f| {
            let discarded = self.is_discarded(&message.name, &f.name);
            match (discarded, self.mode) {
                (true, DiscardMode::Omit) => None,
                _ => Some((f, discarded)),
            }
        })
    }
}
