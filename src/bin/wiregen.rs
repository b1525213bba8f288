//! Generate message and transport header/source pairs from a wire schema.
//!
//! Usage:
//!   wiregen [OPTIONS] [--config wiregen.toml] [--schema FILE.wire]
//!
//! Options on the command line override the config file. All four artifacts
//! are generated in memory first; files are written only if every artifact
//! compiled. With `--check`, nothing is written and the exit code is 1 when
//! any file on disk differs from what would be generated.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiregen::{cpp, generate, parse, ArtifactKind, DiscardMode, GeneratorConfig, ResolvedSchema};

#[derive(Parser, Debug)]
#[command(name = "wiregen", version, about = "Wire-protocol codec generator")]
struct Args {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Schema file (overrides `schema` in the config).
    #[arg(short, long)]
    schema: Option<PathBuf>,
    /// Output directory (overrides `out_dir` in the config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// Field to leave out of encode/decode logic. `Message.field` scopes it to one message.
    #[arg(short, long = "discard")]
    discards: Vec<String>,
    /// Keep discarded fields declared in message structs.
    #[arg(long)]
    declare_discarded: bool,
    /// Compare against files on disk instead of writing them.
    #[arg(long)]
    check: bool,
    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "wiregen=debug" } else { "wiregen=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(schema) = args.schema {
        config.schema = Some(schema);
    }
    if let Some(out_dir) = args.out_dir {
        config.out_dir = out_dir;
    }
    config.discard.fields.extend(args.discards);
    if args.declare_discarded {
        config.discard.mode = DiscardMode::Declare;
    }
    config.validate()?;

    let schema_path = match &config.schema {
        Some(p) => p.clone(),
        None => bail!("no schema given (use --schema or set `schema` in the config)"),
    };
    let src = std::fs::read_to_string(&schema_path)
        .with_context(|| format!("reading schema {}", schema_path.display()))?;
    let schema = parse(&src)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("parsing {}", schema_path.display()))?;
    let resolved = ResolvedSchema::resolve(schema)?;
    tracing::info!(
        messages = resolved.schema.messages.len(),
        types = resolved.schema.types.len(),
        "loaded schema"
    );

    let templates = cpp::template_set()?;
    let discards = config.discard_set();
    let artifacts = generate(&resolved.schema, &templates, &discards, &|kind: ArtifactKind| {
        config.context_for(kind)
    })?;

    if args.check {
        let mut drift = 0usize;
        for kind in ArtifactKind::ALL {
            let path = config.output_path(kind);
            let on_disk = std::fs::read_to_string(&path).unwrap_or_default();
            if on_disk != artifacts.get(kind) {
                eprintln!("{}: out of date", path.display());
                drift += 1;
            }
        }
        if drift > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;
    for kind in ArtifactKind::ALL {
        let path = config.output_path(kind);
        std::fs::write(&path, artifacts.get(kind))
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), artifact = %kind, "wrote artifact");
    }
    Ok(())
}
