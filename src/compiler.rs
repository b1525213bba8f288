//! Artifact compiler: drives the section renderer in a fixed, per-artifact
//! order and concatenates the results.
//!
//! A [`GenerationPlan`] materializes the message order once. Interface and
//! implementation of each surface iterate that same slice, so both artifacts
//! list the same messages in the same order.

use crate::alias::{resolve_aliases, AliasMap, AliasResolution};
use crate::ast::{check_schema, MessageSpec, Schema};
use crate::discard::DiscardSet;
use crate::error::GenError;
use crate::render::{render_section, SectionInput};
use crate::template::{ArtifactContext, ArtifactKind, Section, Surface, TemplateSet};

/// Everything a run needs, computed once and shared read-only by all four
/// artifact compilations.
#[derive(Debug)]
pub struct GenerationPlan<'s> {
    /// Declaration order.
    pub messages: Vec<&'s MessageSpec>,
    /// Sorted copy (ascending id) for the enum block.
    pub by_id: Vec<&'s MessageSpec>,
    pub aliases: AliasResolution,
    pub discards: &'s DiscardSet,
}

impl<'s> GenerationPlan<'s> {
    /// Check structure, resolve aliases and derive the sorted view.
    pub fn build(schema: &'s Schema, discards: &'s DiscardSet) -> Result<Self, GenError> {
        check_schema(schema)?;
        let aliases = resolve_aliases(&schema.types, &schema.messages)?;
        let messages: Vec<&MessageSpec> = schema.messages.iter().collect();
        let by_id = sorted_by_id(&messages);
        Ok(GenerationPlan {
            messages,
            by_id,
            aliases,
            discards,
        })
    }
}

/// Stable sort by id on a copy; the input order is left untouched.
pub fn sorted_by_id<'s>(messages: &[&'s MessageSpec]) -> Vec<&'s MessageSpec> {
    let mut sorted = messages.to_vec();
    sorted.sort_by_key(|m| m.id);
    sorted
}

/// Compiles artifacts against a template set checked for completeness up front.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'t> {
    templates: &'t TemplateSet,
}

impl<'t> Compiler<'t> {
    /// Fails with [`GenError::TemplateNotFound`] if any artifact section lacks a template.
    pub fn new(templates: &'t TemplateSet) -> Result<Self, GenError> {
        templates.require(&ArtifactKind::ALL)?;
        Ok(Compiler { templates })
    }

    pub fn compile(
        &self,
        kind: ArtifactKind,
        plan: &GenerationPlan<'_>,
        context: &ArtifactContext,
    ) -> Result<String, GenError> {
        // Transport artifacts never see the message-level aliases.
        let no_aliases = AliasMap::new();
        let epilogue_aliases = match kind.surface() {
            Surface::Message => &plan.aliases.aliases,
            Surface::Transport => &no_aliases,
        };

        let mut out = String::new();
        for &section in kind.sections() {
            let key = kind.key(section);
            match section {
                Section::Prologue => {
                    out += &render_section(self.templates, key, SectionInput::Prologue(context))?;
                }
                Section::Aliases => {
                    out += &render_section(
                        self.templates,
                        key,
                        SectionInput::Aliases {
                            aliases: &plan.aliases.aliases,
                            repeats: &plan.aliases.repeats,
                        },
                    )?;
                }
                Section::Enums => {
                    out += &render_section(self.templates, key, SectionInput::Enums(&plan.by_id))?;
                }
                Section::Message | Section::Codec => {
                    for &message in &plan.messages {
                        out += &render_section(
                            self.templates,
                            key,
                            SectionInput::Message {
                                message,
                                discards: plan.discards,
                            },
                        )?;
                    }
                }
                Section::Epilogue => {
                    out += &render_section(
                        self.templates,
                        key,
                        SectionInput::Epilogue {
                            context,
                            aliases: epilogue_aliases,
                        },
                    )?;
                }
            }
        }
        tracing::info!(artifact = %kind, bytes = out.len(), "compiled artifact");
        Ok(out)
    }

    /// Compile the interface/implementation pair of one surface from one plan.
    pub fn compile_pair(
        &self,
        interface: ArtifactKind,
        implementation: ArtifactKind,
        plan: &GenerationPlan<'_>,
        contexts: &dyn Fn(ArtifactKind) -> ArtifactContext,
    ) -> Result<(String, String), GenError> {
        let header = self.compile(interface, plan, &contexts(interface))?;
        let source = self.compile(implementation, plan, &contexts(implementation))?;
        Ok((header, source))
    }
}

/// The four generated text blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub message_interface: String,
    pub message_implementation: String,
    pub transport_interface: String,
    pub transport_implementation: String,
}

impl Artifacts {
    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::MessageInterface => &self.message_interface,
            ArtifactKind::MessageImplementation => &self.message_implementation,
            ArtifactKind::TransportInterface => &self.transport_interface,
            ArtifactKind::TransportImplementation => &self.transport_implementation,
        }
    }
}

/// Run the whole pipeline: plan, then all four artifacts. Nothing is returned
/// unless every artifact compiled.
pub fn generate(
    schema: &Schema,
    templates: &TemplateSet,
    discards: &DiscardSet,
    contexts: &dyn Fn(ArtifactKind) -> ArtifactContext,
) -> Result<Artifacts, GenError> {
    let compiler = Compiler::new(templates)?;
    let plan = GenerationPlan::build(schema, discards)?;
    let (message_interface, message_implementation) = compiler.compile_pair(
        ArtifactKind::MessageInterface,
        ArtifactKind::MessageImplementation,
        &plan,
        contexts,
    )?;
    let (transport_interface, transport_implementation) = compiler.compile_pair(
        ArtifactKind::TransportInterface,
        ArtifactKind::TransportImplementation,
        &plan,
        contexts,
    )?;
    Ok(Artifacts {
        message_interface,
        message_implementation,
        transport_interface,
        transport_implementation,
    })
}
