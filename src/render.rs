//! Section renderer: one template, one narrow set of inputs, one string out.

use crate::alias::{AliasMap, RepeatAliasMap};
use crate::ast::MessageSpec;
use crate::discard::DiscardSet;
use crate::error::GenError;
use crate::template::{ArtifactContext, Template, TemplateKey, TemplateSet};

/// Inputs for a single section render.
#[derive(Debug, Clone, Copy)]
pub enum SectionInput<'a> {
    Prologue(&'a ArtifactContext),
    Aliases {
        aliases: &'a AliasMap,
        repeats: &'a RepeatAliasMap,
    },
    /// Messages sorted ascending by id.
    Enums(&'a [&'a MessageSpec]),
    Message {
        message: &'a MessageSpec,
        discards: &'a DiscardSet,
    },
    Epilogue {
        context: &'a ArtifactContext,
        aliases: &'a AliasMap,
    },
}

impl SectionInput<'_> {
    fn shape(&self) -> &'static str {
        match self {
            SectionInput::Prologue(_) => "prologue",
            SectionInput::Aliases { .. } => "aliases",
            SectionInput::Enums(_) => "enums",
            SectionInput::Message { .. } => "per-message",
            SectionInput::Epilogue { .. } => "epilogue",
        }
    }

    /// Schema-global sections with nothing to render.
    fn is_empty(&self) -> bool {
        match self {
            SectionInput::Aliases { aliases, .. } => aliases.is_empty(),
            SectionInput::Enums(messages) => messages.is_empty(),
            _ => false,
        }
    }
}

/// Render one section. Empty alias and enum inputs render to `""` without
/// calling the template and log a warning; the run continues.
pub fn render_section(
    templates: &TemplateSet,
    key: TemplateKey,
    input: SectionInput<'_>,
) -> Result<String, GenError> {
    let template = templates.get(key)?;
    if input.is_empty() {
        tracing::warn!(%key, "empty input, section rendered empty");
        return Ok(String::new());
    }
    let out = match (template, input) {
        (Template::Prologue(f), SectionInput::Prologue(ctx)) => f(ctx),
        (Template::Aliases(f), SectionInput::Aliases { aliases, repeats }) => f(aliases, repeats),
        (Template::Enums(f), SectionInput::Enums(messages)) => f(messages),
        (Template::PerMessage(f), SectionInput::Message { message, discards }) => f(message, discards),
        (Template::Epilogue(f), SectionInput::Epilogue { context, aliases }) => f(context, aliases),
        (t, i) => {
            return Err(GenError::TemplateShape {
                key,
                expected: i.shape(),
                found: t.shape(),
            })
        }
    };
    tracing::debug!(%key, bytes = out.len(), "rendered section");
    Ok(out)
}
