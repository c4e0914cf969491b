use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modgraph::config::Config;
use modgraph::export::{export, ExportFormat};

#[derive(Parser)]
#[command(name = "modgraph")]
#[command(version)]
#[command(about = "Module dependency graph extractor with Graphviz output", long_about = None)]
struct Cli {
    /// Base directory that registry files and module paths are relative to
    base_dir: PathBuf,

    /// Registry files to scan for 'key': 'path' declarations
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format (dot, json)
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source file extension to try, in order (repeatable)
    #[arg(short, long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Loader prefix stripped from dependency names
    #[arg(long)]
    marker: Option<String>,

    /// Report circular dependencies on stderr
    #[arg(long)]
    cycles: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if !cli.extensions.is_empty() {
        config.scan.extensions = cli.extensions;
    }
    if let Some(marker) = cli.marker {
        config.scan.marker = marker;
    }
    let format = cli.format.unwrap_or(config.render.format);

    let (forest, stats) = modgraph::build_forest(&cli.base_dir, &cli.files, &config.scan)
        .with_context(|| format!("failed to build graph from {}", cli.base_dir.display()))?;

    tracing::info!(
        "{} expansions, {} dangling references, {} back edges",
        stats.expansions,
        stats.dangling,
        stats.back_edges
    );

    if cli.cycles {
        for cycle in forest.detect_cycles() {
            eprintln!("cycle: {}", cycle.cycle_path());
        }
    }

    let mut stdout = io::stdout().lock();
    export(format, &forest, &mut stdout).context("failed to write output")?;
    stdout.flush()?;

    Ok(())
}
