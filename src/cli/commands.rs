use crate::crd::{documents, summarize};
use crate::generator::{
    generate_stream, load_config, resolve_config_path, seeded_registry, wrap_file,
    TypegenConfig,
};
use crate::logging::{init_logging, LogConfig};
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for crd-typegen
///
/// Generates Go struct declarations from CustomResourceDefinition schemas.
#[derive(Parser, Debug)]
#[command(name = "crd-typegen", version)]
#[command(about = "Generate Go types from CRD schemas", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate declarations for every document of a schema file
    Generate {
        /// Schema documents (YAML or JSON, `---` separated)
        #[arg(short, long)]
        input: PathBuf,

        /// Destination file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Version to generate for each kind (default: first declared)
        #[arg(long)]
        version: Option<String>,

        /// Wrap the output in a file with this package clause and an import block
        #[arg(long)]
        package: Option<String>,

        /// Path to the generator config (crd-typegen.toml)
        /// If not provided, will auto-detect alongside the input
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List kind, group and declared versions of each document
    Inspect {
        /// Schema documents (YAML or JSON, `---` separated)
        #[arg(short, long)]
        input: PathBuf,

        /// Print one JSON object per document instead of tab-separated lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Parse arguments, set up logging and run the selected command
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env().with_verbosity(cli.verbose))?;
    run(cli)
}

/// Run an already parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            version,
            package,
            config,
        } => {
            let config = generator_config(config.as_deref(), &input)?
                .merged(version.as_deref(), package.as_deref());
            let text = generate_file(&input, &config)?;
            match output {
                Some(path) => {
                    fs::write(&path, &text)
                        .with_context(|| format!("Failed to write output: {}", path.display()))?;
                    info!(output = %path.display(), bytes = text.len(), "wrote declarations");
                }
                None => io::stdout()
                    .write_all(text.as_bytes())
                    .context("Failed to write to stdout")?,
            }
            Ok(())
        }
        Commands::Inspect { input, json } => {
            let contents = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read input: {}", input.display()))?;
            let mut stdout = io::stdout().lock();
            for document in documents(&contents)? {
                let summary = summarize(document)?;
                if json {
                    writeln!(stdout, "{}", serde_json::to_string(&summary)?)?;
                } else {
                    writeln!(
                        stdout,
                        "{}\t{}\t{}",
                        summary.kind,
                        summary.group,
                        summary.versions.join(",")
                    )?;
                }
            }
            Ok(())
        }
    }
}

fn generator_config(explicit: Option<&Path>, input: &Path) -> anyhow::Result<TypegenConfig> {
    let Some(path) = resolve_config_path(explicit, input)? else {
        return Ok(TypegenConfig::default());
    };
    info!(config = %path.display(), "using generator config");
    Ok(load_config(&path)?.unwrap_or_default())
}

/// Generate the complete output text for `input`, wrapped in a file when a
/// package is configured. Nothing is written anywhere.
fn generate_file(input: &Path, config: &TypegenConfig) -> anyhow::Result<String> {
    let file = fs::File::open(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;
    let mut registry = seeded_registry(config.renames.clone())?;
    let mut body = Vec::new();
    let summary = generate_stream(
        BufReader::new(file),
        &mut body,
        config.version_or_default(),
        &mut registry,
    )
    .with_context(|| format!("Failed to generate types from {}", input.display()))?;
    info!(
        documents = summary.documents(),
        registered = registry.len(),
        "generation complete"
    );

    let body = String::from_utf8(body).context("Generated output is not valid UTF-8")?;
    match &config.package {
        Some(package) => Ok(wrap_file(package, &summary.imports, &body)?),
        None => Ok(body),
    }
}
