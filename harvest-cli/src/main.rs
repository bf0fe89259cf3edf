//! CLI binary for running and validating harvest pipelines.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use harvest::config::PipelineConfig;
use harvest::engine::Pipeline;
use harvest::events::LoggingEventSink;
use harvest::sites::demo;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "harvest", version, about = "Recursive recipe-catalog harvester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest everything reachable from one entry link
    Run {
        /// Path to the JSON pipeline configuration
        #[arg(short, long, required_unless_present = "demo")]
        config: Option<PathBuf>,

        /// Entry locator (default with --demo: the demo catalog)
        #[arg(short, long, required_unless_present = "demo")]
        url: Option<String>,

        /// Page-type tag of the entry link
        #[arg(short, long, required_unless_present = "demo")]
        page_type: Option<String>,

        /// Serve the built-in demo catalog through the canned-response strategy
        #[arg(long)]
        demo: bool,
    },

    /// Validate a pipeline configuration against the built-in components
    Validate {
        /// Path to the JSON pipeline configuration
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            url,
            page_type,
            demo,
        } => {
            cmd_run(config.as_deref(), url, page_type, demo, cli.verbose).await?;
        }
        Commands::Validate { config } => {
            cmd_validate(&config)?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<PipelineConfig> {
    PipelineConfig::load_from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

async fn cmd_run(
    config_path: Option<&Path>,
    url: Option<String>,
    page_type: Option<String>,
    use_demo: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => demo::config(),
    };
    let url = url.unwrap_or_else(|| demo::ENTRY_URL.to_string());
    let page_type = page_type.unwrap_or_else(|| demo::LISTING_PAGE_TYPE.to_string());

    let sink = if verbose {
        LoggingEventSink::debug()
    } else {
        LoggingEventSink::default()
    };
    let mut builder = Pipeline::builder(config).event_sink(Arc::new(sink));
    if use_demo {
        builder = builder.canned_responses(Arc::new(demo::canned_fetcher()));
    }
    let pipeline = builder.build().context("invalid pipeline configuration")?;

    let results = pipeline
        .run_from(url.as_str(), page_type.as_str())
        .await
        .with_context(|| format!("harvest of {url} failed"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for payload in &results {
        writeln!(out, "{}", serde_json::to_string(payload)?)?;
    }
    info!(url = %url, results = results.len(), "Harvest complete");
    Ok(())
}

fn cmd_validate(path: &Path) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let pipeline = Pipeline::new(config).context("invalid pipeline configuration")?;

    println!("Configuration is valid.");
    println!(
        "  Fetch sequence: {}",
        pipeline
            .fetch_chain()
            .sequence()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Extractors: {}", pipeline.config().extractor_map.len());
    println!("  Expanders: {}", pipeline.config().expander_map.len());
    Ok(())
}
