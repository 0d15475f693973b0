#![allow(missing_docs)]

//! memory-bank CLI: scaffold, search and check memory bank documents.
//!
//! Logging: set `RUST_LOG=omni_memory_bank=debug` to see engine logs on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use omni_memory_bank::{
    CorpusSource, DocumentType, MemoryBank, MemoryBankSettings, analyze, build_template,
    extract_all_schemas, extract_schema, load_settings, load_settings_from_file, search,
    validate_query,
};

#[derive(Parser, Debug)]
#[command(
    name = "memory-bank",
    about = "Memory bank CLI for scaffolding, searching and checking project documents",
    arg_required_else_help = true
)]
struct Cli {
    /// Project root directory.
    #[arg(
        long,
        short = 'r',
        value_name = "DIR",
        default_value = ".",
        global = true
    )]
    root: PathBuf,

    /// Explicit settings file (for example: `.config/omni-dev-fusion/memory-bank.yaml`).
    ///
    /// This overrides the default system/user settings resolution.
    #[arg(long = "conf", short = 'c', value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Json, global = true)]
    output: OutputFormat,

    /// Enable debug logging (ignored when `RUST_LOG` is set).
    #[arg(long, short = 'v', default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the memory bank directory and missing documents from the rules.
    Init {
        /// Overwrite existing documents with fresh templates.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Search all documents for relevant paragraphs.
    Search { query: String },
    /// Check documents against the rules structure and staleness policy.
    Analyze,
    /// Show the rules schema for one document type (or all when omitted).
    Schema { document_type: Option<String> },
    /// Print a fresh template for a document type.
    Template { document_type: String },
    /// Print the current text of a document.
    Show { document_type: String },
    /// Replace a document with the contents of a file.
    Update {
        document_type: String,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Export every document to a JSON file.
    Export { target: PathBuf },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn resolve_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(root)
    }
}

fn resolve_settings(cli: &Cli, root: &Path) -> MemoryBankSettings {
    match &cli.config_file {
        Some(path) => load_settings_from_file(&resolve_root(path)),
        None => load_settings(root),
    }
}

fn emit<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    }
    .context("failed to serialize CLI output as JSON")?;
    println!("{rendered}");
    Ok(())
}

fn parse_document_type(raw: &str) -> Result<DocumentType> {
    raw.parse::<DocumentType>()
        .with_context(|| format!("expected one of the memory bank documents, got '{raw}'"))
}

fn load_rules_text(bank: &MemoryBank) -> Result<String> {
    Ok(bank
        .load_rules()
        .context("failed to read rules document")?
        .unwrap_or_default())
}

fn execute(cli: &Cli, bank: &MemoryBank, settings: &MemoryBankSettings) -> Result<()> {
    match &cli.command {
        Command::Init { force } => {
            let written = bank
                .initialize(*force)
                .context("failed to initialize memory bank")?;
            emit(
                &json!({
                    "directory": bank.directory().display().to_string(),
                    "written": written,
                }),
                cli.output,
            )
        }
        Command::Search { query } => {
            let query = validate_query(query, settings.min_query_chars())?;
            let corpus = bank.load_corpus().context("failed to load memory bank")?;
            let hits = search(query, &corpus);
            if hits.is_empty() {
                return emit(
                    &json!({
                        "query": query,
                        "results": hits,
                        "message": format!("No results found for '{query}'"),
                    }),
                    cli.output,
                );
            }
            emit(&json!({ "query": query, "results": hits }), cli.output)
        }
        Command::Analyze => {
            let corpus = bank.load_corpus().context("failed to load memory bank")?;
            let rules = load_rules_text(bank)?;
            emit(&analyze(&rules, &corpus), cli.output)
        }
        Command::Schema { document_type } => {
            let rules = load_rules_text(bank)?;
            match document_type {
                Some(kind) => emit(&extract_schema(&rules, kind), cli.output),
                None => emit(&extract_all_schemas(&rules), cli.output),
            }
        }
        Command::Template { document_type } => {
            let rules = load_rules_text(bank)?;
            let schema = extract_schema(&rules, document_type);
            print!("{}", build_template(&schema, document_type));
            Ok(())
        }
        Command::Show { document_type } => {
            let kind = parse_document_type(document_type)?;
            let body = bank
                .read_document(kind)
                .with_context(|| format!("failed to read {kind}"))?;
            print!("{body}");
            Ok(())
        }
        Command::Update {
            document_type,
            file,
        } => {
            let kind = parse_document_type(document_type)?;
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            bank.update_document(kind, &content)
                .with_context(|| format!("failed to update {kind}"))?;
            emit(
                &json!({
                    "document": kind,
                    "path": bank.document_path(kind).display().to_string(),
                }),
                cli.output,
            )
        }
        Command::Export { target } => {
            let exported = bank
                .export_json(target)
                .context("failed to export memory bank")?;
            emit(
                &json!({
                    "target": target.display().to_string(),
                    "documents": exported,
                }),
                cli.output,
            )
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_memory_bank=debug"
        } else {
            "omni_memory_bank=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let root = resolve_root(&cli.root);
    let settings = resolve_settings(&cli, &root);
    let bank = MemoryBank::open(&root, &settings);
    execute(&cli, &bank, &settings)
}
