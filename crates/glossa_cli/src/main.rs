//! CLI probe for `glossa_core`.
//!
//! # Responsibility
//! - Verify core crate linkage without any UI runtime.
//! - Validate document and editor config JSON files and print metadata only.

use clap::Parser;
use glossa_core::{
    core_version, default_log_level, init_logging, Document, EditorConfig, FragmentType,
};
use log::info;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "glossa", about = "glossa core probe", version)]
struct Cli {
    /// Document JSON file to validate and summarize
    document: Option<PathBuf>,

    /// Editor config JSON file to validate
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, env = "GLOSSA_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    println!("glossa_core version={}", core_version());

    if let Some(path) = &cli.config {
        let config: EditorConfig = read_json(path)?;
        config.validate().map_err(|err| format!("{}: {err}", path.display()))?;
        let active = config
            .active_language()
            .map_or("none", |language| language.id.as_str());
        println!(
            "config ok languages={} active={active}",
            config.language_configs.len()
        );
        info!("event=cli_config module=cli status=ok languages={}", config.language_configs.len());
    }

    if let Some(path) = &cli.document {
        let document: Document = read_json(path)?;
        document
            .validate()
            .map_err(|err| format!("{}: {err}", path.display()))?;
        println!("{}", summarize(&document));
        info!(
            "event=cli_document module=cli status=ok blocks={}",
            document.blocks.len()
        );
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| format!("{}: {err}", path.display()))
}

/// Counts only; document text never reaches the output.
fn summarize(document: &Document) -> String {
    let mut counts: BTreeMap<FragmentType, usize> = BTreeMap::new();
    let fragments = document
        .blocks
        .iter()
        .flat_map(|block| &block.fragmentables)
        .flat_map(|text| &text.fragments);
    for fragment in fragments {
        *counts.entry(fragment.kind()).or_default() += 1;
        for word in fragment.words() {
            *counts.entry(word.kind()).or_default() += 1;
        }
    }

    let mut summary = format!(
        "document ok id={} rows={} blocks={}",
        document.id,
        document.render_map.row_count(),
        document.blocks.len()
    );
    for (kind, count) in counts {
        summary.push_str(&format!(" {}={count}", kind.as_str().to_ascii_lowercase()));
    }
    summary
}
