//! Template catalogue: a closed mapping from `(surface, side, section)` keys to
//! rendering functions, checked for completeness before any rendering starts.

use crate::alias::{AliasMap, RepeatAliasMap};
use crate::ast::MessageSpec;
use crate::discard::DiscardSet;
use crate::error::GenError;
use std::collections::HashMap;
use std::fmt;

/// Generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Per-message structures and codecs.
    Message,
    /// Transport-framing methods.
    Transport,
}

/// Which half of an artifact pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Interface,
    Implementation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Prologue,
    Aliases,
    Enums,
    /// Per-message declarations (structs, or transport method declarations).
    Message,
    /// Per-message bodies (encode/decode, or transport method bodies).
    Codec,
    Epilogue,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Prologue => "prologue",
            Section::Aliases => "alias-block",
            Section::Enums => "enum-block",
            Section::Message => "message-block",
            Section::Codec => "codec-block",
            Section::Epilogue => "epilogue",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Surface::Message => "message",
            Surface::Transport => "transport",
        })
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Interface => "interface",
            Side::Implementation => "implementation",
        })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub surface: Surface,
    pub side: Side,
    pub section: Section,
}

impl TemplateKey {
    pub const fn new(surface: Surface, side: Side, section: Section) -> Self {
        TemplateKey {
            surface,
            side,
            section,
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.surface, self.side, self.section)
    }
}

/// One of the four generated artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    MessageInterface,
    MessageImplementation,
    TransportInterface,
    TransportImplementation,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::MessageInterface,
        ArtifactKind::MessageImplementation,
        ArtifactKind::TransportInterface,
        ArtifactKind::TransportImplementation,
    ];

    pub fn surface(self) -> Surface {
        match self {
            ArtifactKind::MessageInterface | ArtifactKind::MessageImplementation => Surface::Message,
            ArtifactKind::TransportInterface | ArtifactKind::TransportImplementation => {
                Surface::Transport
            }
        }
    }

    pub fn side(self) -> Side {
        match self {
            ArtifactKind::MessageInterface | ArtifactKind::TransportInterface => Side::Interface,
            ArtifactKind::MessageImplementation | ArtifactKind::TransportImplementation => {
                Side::Implementation
            }
        }
    }

    /// Fixed section order. Prologue first, epilogue last. Only the message
    /// interface has an enum block; transport artifacts have no alias block.
    pub fn sections(self) -> &'static [Section] {
        match self {
            ArtifactKind::MessageInterface => &[
                Section::Prologue,
                Section::Aliases,
                Section::Enums,
                Section::Message,
                Section::Epilogue,
            ],
            ArtifactKind::MessageImplementation => &[
                Section::Prologue,
                Section::Aliases,
                Section::Codec,
                Section::Epilogue,
            ],
            ArtifactKind::TransportInterface => {
                &[Section::Prologue, Section::Message, Section::Epilogue]
            }
            ArtifactKind::TransportImplementation => {
                &[Section::Prologue, Section::Codec, Section::Epilogue]
            }
        }
    }

    pub fn key(self, section: Section) -> TemplateKey {
        TemplateKey::new(self.surface(), self.side(), section)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.surface(), self.side())
    }
}

/// Per-artifact values for prologue and epilogue templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactContext {
    /// Schema file the artifact was generated from.
    pub source_filename: String,
    pub namespace: String,
    pub includes: Vec<String>,
}

pub type PrologueFn = fn(&ArtifactContext) -> String;
pub type AliasFn = fn(&AliasMap, &RepeatAliasMap) -> String;
pub type EnumFn = fn(&[&MessageSpec]) -> String;
pub type MessageFn = fn(&MessageSpec, &DiscardSet) -> String;
pub type EpilogueFn = fn(&ArtifactContext, &AliasMap) -> String;

/// A rendering function, tagged by the inputs it accepts.
#[derive(Clone, Copy)]
pub enum Template {
    Prologue(PrologueFn),
    Aliases(AliasFn),
    Enums(EnumFn),
    /// Used for both [`Section::Message`] and [`Section::Codec`].
    PerMessage(MessageFn),
    Epilogue(EpilogueFn),
}

impl Template {
    pub fn shape(&self) -> &'static str {
        match self {
            Template::Prologue(_) => "prologue",
            Template::Aliases(_) => "aliases",
            Template::Enums(_) => "enums",
            Template::PerMessage(_) => "per-message",
            Template::Epilogue(_) => "epilogue",
        }
    }

    fn shape_for(section: Section) -> &'static str {
        match section {
            Section::Prologue => "prologue",
            Section::Aliases => "aliases",
            Section::Enums => "enums",
            Section::Message | Section::Codec => "per-message",
            Section::Epilogue => "epilogue",
        }
    }

    pub fn accepts(&self, section: Section) -> bool {
        self.shape() == Self::shape_for(section)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Template::{}", self.shape())
    }
}

/// Registered templates. Read-only once generation starts.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<TemplateKey, Template>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` under `key`, replacing any previous one.
    pub fn insert(&mut self, key: TemplateKey, template: Template) -> Result<(), GenError> {
        if !template.accepts(key.section) {
            return Err(GenError::TemplateShape {
                key,
                expected: Template::shape_for(key.section),
                found: template.shape(),
            });
        }
        self.templates.insert(key, template);
        Ok(())
    }

    pub fn get(&self, key: TemplateKey) -> Result<&Template, GenError> {
        self.templates
            .get(&key)
            .ok_or(GenError::TemplateNotFound(key))
    }

    pub fn contains(&self, key: TemplateKey) -> bool {
        self.templates.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Check that every section of every `kind` has a template.
    pub fn require(&self, kinds: &[ArtifactKind]) -> Result<(), GenError> {
        for &kind in kinds {
            for &section in kind.sections() {
                self.get(kind.key(section))?;
            }
        }
        Ok(())
    }
}
