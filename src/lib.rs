//! # wiregen: Wire-Protocol Codec Generator
//!
//! Compiles a declarative message schema into paired interface/implementation
//! artifacts for two surfaces: protocol messages (structs, an id enum and
//! encode/decode bodies) and the transport-framing layer (send/handle methods).
//!
//! ## Pipeline
//!
//! `Schema → resolve aliases → compile 4 artifacts`. Every stage is a pure
//! function of its inputs, so two runs over the same schema, templates and
//! discard set produce byte-identical output.
//!
//! - **Schema model** ([`ast`]): messages with a wire id and ordered, typed fields
//! - **Type alias resolver** ([`alias`]): one declaration per shared type
//! - **Section renderer** ([`render`]): one template, one section
//! - **Artifact compiler** ([`compiler`]): fixed section order per artifact
//!
//! ## Example schema
//!
//! ```text
//! type TrackId = "quicr::Bytes";
//!
//! message Subscribe = 2 {
//!     track: TrackId;
//! }
//!
//! message Announce = 0x1 {
//!     namespace: TrackId;
//!     reserved: u8;
//!     auth: optional<bytes>;
//! }
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use wiregen::{cpp, generate, parse, ArtifactKind, DiscardMode, DiscardSet, GeneratorConfig};
//!
//! let schema = parse(&std::fs::read_to_string("schemas/moqt.wire")?)?;
//! let config = GeneratorConfig::default();
//! let templates = cpp::template_set()?;
//! let discards = DiscardSet::from_names(["reserved"], DiscardMode::Omit);
//! let artifacts = generate(&schema, &templates, &discards, &|kind: ArtifactKind| config.context_for(kind))?;
//! print!("{}", artifacts.message_interface);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alias;
pub mod ast;
pub mod compiler;
pub mod config;
pub mod cpp;
pub mod discard;
pub mod error;
pub mod parser;
pub mod render;
pub mod template;

pub use alias::{resolve_aliases, resolve_schema_aliases, AliasMap, AliasResolution, RepeatAliasMap};
pub use ast::{
    check_schema, Cardinality, Field, MessageSpec, PrimitiveType, ResolvedSchema, Schema, TypeDecl,
};
pub use compiler::{generate, sorted_by_id, Artifacts, Compiler, GenerationPlan};
pub use config::{ConfigError, GeneratorConfig, OutputNames};
pub use discard::{DiscardMode, DiscardSet};
pub use error::{ErrorClass, GenError};
pub use parser::parse;
pub use render::{render_section, SectionInput};
pub use template::{
    ArtifactContext, ArtifactKind, Section, Side, Surface, Template, TemplateKey, TemplateSet,
};
