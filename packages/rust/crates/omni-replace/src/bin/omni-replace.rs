#![allow(missing_docs)]

//! omni-replace CLI: validate, scan, apply, replace-one.
//!
//! Logging: set `RUST_LOG=omni_replace=debug` to see engine logs on stderr.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use omni_io::VaultStore;
use omni_replace::{
    Document, MatchRecord, PatternSpec, Progress, ReplaceSettings, VaultReplacer, commit_batch,
    load_documents, render_batch_diff,
};

#[derive(Parser, Debug)]
#[command(
    name = "omni-replace",
    about = "Regex find-and-replace across a markdown vault",
    arg_required_else_help = true
)]
struct Cli {
    /// Vault root directory.
    #[arg(long, short = 'r', value_name = "DIR", default_value = ".", global = true)]
    root: PathBuf,

    /// Settings file (YAML). Falls back to `$OMNI_REPLACE_CONFIG`.
    #[arg(long = "conf", short = 'c', value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Json, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a pattern compiles.
    Validate { pattern: String },
    /// Preview every match.
    Scan {
        pattern: String,
        /// Replacement template shown in the preview.
        #[arg(long = "replace", default_value = "")]
        replacement: String,
        /// Flag string (defaults to the settings file).
        #[arg(long)]
        flags: Option<String>,
        #[arg(long, default_value_t = false)]
        adjust_case: bool,
    },
    /// Replace every match in every document.
    Apply {
        pattern: String,
        replacement: String,
        #[arg(long)]
        flags: Option<String>,
        #[arg(long, default_value_t = false)]
        adjust_case: bool,
        /// Print a diff instead of writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Replace the single occurrence described by a match record (JSON file).
    ReplaceOne {
        record: PathBuf,
        #[arg(long, default_value_t = false)]
        adjust_case: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
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

fn log_progress(progress: &Progress) -> ControlFlow<()> {
    tracing::info!(current = progress.current, total = progress.total, "{}", progress.message);
    ControlFlow::Continue(())
}

fn open_vault(root: &Path, settings: &ReplaceSettings) -> Result<(VaultStore, Vec<Document>)> {
    let store = VaultStore::new(root, settings.vault.discover_options());
    let loaded = load_documents(&store)
        .with_context(|| format!("failed to list vault documents under {}", root.display()))?;
    for (id, err) in &loaded.failures {
        tracing::warn!(document = %id, error = %err, "document skipped");
    }
    Ok((store, loaded.documents))
}

fn build_spec(
    pattern: &str,
    replacement: &str,
    flags: Option<&str>,
    adjust_case: bool,
    settings: &ReplaceSettings,
) -> PatternSpec {
    PatternSpec::new(pattern)
        .with_flags(flags.unwrap_or(&settings.search.flags))
        .with_replacement(replacement)
        .with_adjust_case(adjust_case || settings.search.adjust_case)
}

async fn execute(cli: &Cli, settings: &ReplaceSettings) -> Result<()> {
    let chunks = settings.search.chunk_config();

    match &cli.command {
        Command::Validate { pattern } => emit(
            &json!({"pattern": pattern, "valid": VaultReplacer::validate(pattern)}),
            cli.output,
        ),
        Command::Scan {
            pattern,
            replacement,
            flags,
            adjust_case,
        } => {
            if !VaultReplacer::validate(pattern) {
                bail!("invalid regular expression: {pattern}");
            }
            let spec = build_spec(pattern, replacement, flags.as_deref(), *adjust_case, settings);
            let (_, documents) = open_vault(&cli.root, settings)?;
            let outcome = VaultReplacer::scan_chunked(&documents, &spec, &chunks, log_progress).await;
            emit(
                &json!({"summary": outcome.output.summary(), "result": outcome.output}),
                cli.output,
            )
        }
        Command::Apply {
            pattern,
            replacement,
            flags,
            adjust_case,
            dry_run,
        } => {
            if !VaultReplacer::validate(pattern) {
                bail!("invalid regular expression: {pattern}");
            }
            let spec = build_spec(pattern, replacement, flags.as_deref(), *adjust_case, settings);
            let (mut store, documents) = open_vault(&cli.root, settings)?;
            let outcome =
                VaultReplacer::apply_all_chunked(&documents, &spec, &chunks, log_progress).await;
            let batch = outcome.output;

            if batch.is_empty() {
                return emit(&json!({"changed": 0, "message": "No changes to apply"}), cli.output);
            }
            if *dry_run {
                print!("{}", render_batch_diff(&documents, &batch));
                return Ok(());
            }

            let report = commit_batch(&mut store, &batch);
            let failed: Vec<_> = report
                .failed
                .iter()
                .map(|(id, err)| json!({"path": id, "error": err.to_string()}))
                .collect();
            emit(
                &json!({"changed": report.written.len(), "written": report.written, "failed": failed}),
                cli.output,
            )?;
            if !report.is_complete() {
                bail!("{} document(s) could not be written", report.failed.len());
            }
            Ok(())
        }
        Command::ReplaceOne {
            record,
            adjust_case,
        } => {
            let raw = std::fs::read_to_string(record)
                .with_context(|| format!("failed to read match record {}", record.display()))?;
            let record: MatchRecord =
                serde_json::from_str(&raw).context("match record is not valid JSON")?;
            let mut store = VaultStore::new(&cli.root, settings.vault.discover_options());
            VaultReplacer::replace_one_in_store(&mut store, &record, *adjust_case)
                .context("single replacement rejected; re-scan and retry")?;
            emit(
                &json!({"path": record.path, "line": record.line_number, "replaced": true}),
                cli.output,
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; default keeps stdout for JSON and logs info to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("omni_replace=info,omni_io=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = ReplaceSettings::resolve(cli.config_file.as_deref())
        .context("failed to load omni-replace settings")?;

    execute(&cli, &settings).await
}
