use anyhow::Context;
use clap::{Parser, Subcommand};
use emtak_enricher::config::Config;
use emtak_enricher::pipeline::EnrichmentPipeline;
use emtak_enricher::server::{self, AppState};
use emtak_enricher::spreadsheet::{self, Artifacts};
use emtak_enricher::{logging, metrics};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "emtak_enricher")]
#[command(about = "Enriches organization spreadsheets from the Estonian business registry")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration (defaults to $EMTAK_CONFIG or config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the rotating JSON log file
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a spreadsheet and write Clients.xlsx / Ecosystem.xlsx
    Process {
        /// Input workbook (.xlsx, .xls, .ods); the first sheet is used
        #[arg(long)]
        input: PathBuf,
        /// Directory the two result workbooks are written to
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,
    },
    /// Serve the upload endpoint and static upload page
    Serve {
        /// Overrides server.bind from the configuration
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir);

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Process { input, out_dir } => {
            let rows = spreadsheet::read_rows(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let pipeline = EnrichmentPipeline::from_config(&config)?;
            let tables = pipeline.process_data(rows).await?;

            let (matching, non_matching) = Artifacts::from_tables(&tables)?
                .write_to_dir(&out_dir)
                .with_context(|| format!("writing results to {}", out_dir.display()))?;

            println!("\n📊 Enrichment results:");
            println!("   Matching:     {} -> {}", tables.matching.len(), matching.display());
            println!("   Non-matching: {} -> {}", tables.non_matching.len(), non_matching.display());
            println!("   Skipped:      {}", tables.skipped);
            println!("   Errors:       {}", tables.failures.len());
            if !tables.failures.is_empty() {
                warn!("{} rows failed and were left out of both results", tables.failures.len());
                println!("\n⚠️  Rows left out:");
                for failure in &tables.failures {
                    println!("   - row {}: {}", failure.row_number, failure.error);
                }
            }
        }
        Commands::Serve { bind } => {
            let handle = match metrics::init() {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            };
            let pipeline = EnrichmentPipeline::from_config(&config)?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            info!("Serving static files from {}", config.server.static_dir);
            server::start_server(AppState::new(pipeline, handle), &bind, &config.server.static_dir).await?;
        }
    }
    Ok(())
}
