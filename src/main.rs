use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use paper_batch::batch::{render_text, write_json, BatchAssembler, BatchError, BatchWindow};
use paper_batch::config::{find_config_file, load_config, Config, ENV_PREFIX};
use paper_batch::resolver::AbstractResolver;
use paper_batch::sources::{SourceCapabilities, SourceRegistry};
use paper_batch::ui::{self, BatchProgress};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prepare a batch of papers from the paper table, fetching each paper's abstract
#[derive(Parser, Debug)]
#[command(name = "paper-batch")]
#[command(version = paper_batch::VERSION)]
#[command(about = "Prepare a batch of papers from the paper table, fetching each paper's abstract", long_about = None)]
struct Cli {
    /// 1-based batch index (batch 1 = rows 1-20, batch 2 = rows 21-40, ...)
    #[arg(
        long,
        short,
        value_parser = clap::value_parser!(u64).range(1..),
        required_unless_present_any = ["list_sources", "env"]
    )]
    batch: Option<u64>,

    /// Write the batch file, or print the batch to stdout
    #[arg(long, short, value_enum, default_value_t = Emit::Json)]
    emit: Emit,

    /// Paper table (CSV); overrides the configured path
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Directory for batch files; overrides the configured path
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Number of pages fetched at once
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    concurrency: Option<u64>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,

    /// List known source families and exit
    #[arg(long)]
    list_sources: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,
}

/// Output mode
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// Write out/batches/batch_NNN.json
    Json,
    /// Print a readable listing to stdout
    Stdout,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("paper-batch - Environment Variables");
    println!();
    println!("Paths:");
    println!("  {}_PATHS__INPUT            Paper table CSV (default: papers.csv)", ENV_PREFIX);
    println!("  {}_PATHS__OUTPUT_DIR       Batch file directory (default: out/batches)", ENV_PREFIX);
    println!();
    println!("Fetching:");
    println!("  {}_FETCH__TIMEOUT_SECS     Request timeout in seconds (default: 20)", ENV_PREFIX);
    println!("  {}_FETCH__MAX_BYTES        Bytes read per page (default: 200000)", ENV_PREFIX);
    println!("  {}_FETCH__USER_AGENT       User-Agent header (default: Mozilla/5.0)", ENV_PREFIX);
    println!("  {}_FETCH__CONCURRENCY      Pages fetched at once (default: 1)", ENV_PREFIX);
    println!();
    println!("Batching:");
    println!("  {}_BATCH__SIZE             Rows per batch (default: 20)", ENV_PREFIX);
    println!();
    println!("Global Proxy Settings:");
    println!("  HTTP_PROXY                  HTTP proxy URL (e.g., http://proxy:8080)");
    println!("  HTTPS_PROXY                 HTTPS proxy URL (e.g., https://proxy:8080)");
    println!("  NO_PROXY                    Comma-separated list of hosts to bypass proxy");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export {}_FETCH__TIMEOUT_SECS=\"30\"", ENV_PREFIX);
    println!("  export {}_PATHS__INPUT=\"./data/papers.csv\"", ENV_PREFIX);
}

fn print_sources(registry: &SourceRegistry) {
    println!("Source families (checked in this order):");
    for source in registry.all() {
        let mut caps = Vec::new();
        if source.capabilities().contains(SourceCapabilities::EXTRACT) {
            caps.push("extract");
        }
        if source.capabilities().contains(SourceCapabilities::REWRITE_URL) {
            caps.push("rewrite-url");
        }
        println!("  {:<10} {:<22} {}", source.id(), source.name(), caps.join(", "));
    }
    println!("  {:<10} {:<22} {}", "*", "Any other page", "whole-page text");
}

/// Load config from the given file, a discovered file, or defaults, then apply CLI overrides
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config(Some(config_path))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(Some(&config_path))?
    } else {
        load_config(None)?
    };

    if let Some(input) = &cli.input {
        config.paths.input = input.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.paths.output_dir = output_dir.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.fetch.concurrency = usize::try_from(concurrency)?;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli, batch: u64) -> Result<()> {
    let config = resolve_config(&cli)?;
    let window = BatchWindow::new(usize::try_from(batch)?, config.batch.size)?;

    let resolver =
        AbstractResolver::from_config(&config.fetch).context("Failed to create HTTP client")?;
    let assembler = BatchAssembler::new(resolver, &config.paths.input);

    let rows = assembler.rows(window)?;
    let progress = BatchProgress::new(
        rows.len() as u64,
        window.index(),
        !cli.quiet && !cli.no_progress && ui::is_terminal(),
    );
    let records = assembler
        .resolve_rows(rows, |resolution| progress.record(resolution))
        .await;

    match cli.emit {
        Emit::Stdout => {
            // The listing goes to the same terminal; leave no bar behind it
            progress.clear();
            print!("{}", render_text(&records));
        }
        Emit::Json => {
            let failed = records.iter().filter(|r| !r.fetch_status.is_ok()).count();
            progress.finish_with_success(&format!(
                "{} resolved, {} without fetched abstract",
                progress.position(),
                failed
            ));

            let path = write_json(&records, &config.paths.output_dir, window.index())
                .with_context(|| {
                    format!(
                        "Failed to write batch to {}",
                        config.paths.output_dir.display()
                    )
                })?;
            if !cli.quiet {
                println!("Wrote {} records to {}", records.len(), path.display());
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(());
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("paper_batch={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.list_sources {
        print_sources(&SourceRegistry::new());
        return Ok(());
    }

    let Some(batch) = cli.batch else {
        anyhow::bail!("--batch is required");
    };

    match run(cli, batch).await {
        Err(e) if matches!(e.downcast_ref::<BatchError>(), Some(BatchError::EmptyBatch { .. })) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        other => other,
    }
}
