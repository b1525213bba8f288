//! Generator configuration, loaded from TOML.
//!
//! Example `wiregen.toml`:
//! ```toml
//! schema = "schemas/moqt.wire"
//! out_dir = "generated"
//! namespace = "wire::messages"
//! includes = ["wire/bytes.h"]
//!
//! [outputs]
//! message_header = "messages.h"
//! message_source = "messages.cpp"
//! transport_header = "transport.h"
//! transport_source = "transport.cpp"
//!
//! [discard]
//! fields = ["reserved", "Subscribe.filter"]
//! mode = "declare"
//! ```

use crate::discard::{DiscardMode, DiscardSet};
use crate::template::{ArtifactContext, ArtifactKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Output file names, relative to `out_dir`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputNames {
    pub message_header: String,
    pub message_source: String,
    pub transport_header: String,
    pub transport_source: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        OutputNames {
            message_header: "messages.h".to_string(),
            message_source: "messages.cpp".to_string(),
            transport_header: "transport.h".to_string(),
            transport_source: "transport.cpp".to_string(),
        }
    }
}

impl OutputNames {
    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::MessageInterface => &self.message_header,
            ArtifactKind::MessageImplementation => &self.message_source,
            ArtifactKind::TransportInterface => &self.transport_header,
            ArtifactKind::TransportImplementation => &self.transport_source,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DiscardConfig {
    /// Field names; `Message.field` scopes a name to one message.
    pub fields: Vec<String>,
    pub mode: DiscardMode,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub schema: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub namespace: String,
    /// Extra includes for the message header.
    pub includes: Vec<String>,
    pub outputs: OutputNames,
    pub discard: DiscardConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            schema: None,
            out_dir: PathBuf::from("."),
            namespace: "wire::messages".to_string(),
            includes: Vec::new(),
            outputs: OutputNames::default(),
            discard: DiscardConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Output names must be non-empty and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: Vec<&str> = Vec::new();
        for kind in ArtifactKind::ALL {
            let name = self.outputs.get(kind);
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("empty output name for {}", kind)));
            }
            if seen.contains(&name) {
                return Err(ConfigError::Invalid(format!("duplicate output name: {}", name)));
            }
            seen.push(name);
        }
        if self.discard.fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::Invalid("empty discard field name".to_string()));
        }
        Ok(())
    }

    pub fn discard_set(&self) -> DiscardSet {
        DiscardSet::from_names(&self.discard.fields, self.discard.mode)
    }

    /// Prologue/epilogue values for one artifact. Each source includes its own
    /// header; the transport header includes the message header.
    pub fn context_for(&self, kind: ArtifactKind) -> ArtifactContext {
        let includes = match kind {
            ArtifactKind::MessageInterface => self.includes.clone(),
            ArtifactKind::MessageImplementation | ArtifactKind::TransportInterface => {
                vec![self.outputs.message_header.clone()]
            }
            ArtifactKind::TransportImplementation => vec![self.outputs.transport_header.clone()],
        };
        let source_filename = self
            .schema
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ArtifactContext {
            source_filename,
            namespace: self.namespace.clone(),
            includes,
        }
    }

    pub fn output_path(&self, kind: ArtifactKind) -> PathBuf {
        self.out_dir.join(self.outputs.get(kind))
    }
}
