use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use price_index::app::ports::DocumentDecoderPort;
use price_index::config::Config;
use price_index::constants::DEFAULT_PORT;
use price_index::infra::pdf_decoder::PdfTextDecoder;
use price_index::render::render_catalog;
use price_index::{filter_empty, logging, parse_with_rules, server, Catalog, PriceService};

#[derive(Parser)]
#[command(name = "price_index")]
#[command(about = "Daily retail price index bulletin scraper")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and parse the bulletin, falling back to the previous day
    Fetch {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print the catalog as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse a local bulletin (.pdf or extracted text) without network access
    Parse {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the bulletin URL for a date
    Url {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Serve the catalog over HTTP
    Serve {
        /// Port to listen on (falls back to $PORT, then 3000)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn print_catalog(catalog: &Catalog, json: bool, config: &Config) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
    } else {
        print!("{}", render_catalog(catalog, &config.render.currency_symbol));
    }
    Ok(())
}

fn read_bulletin(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        PdfTextDecoder
            .decode(&bytes)
            .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {}", path.display(), e))
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8 text", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    // Dropped when main returns, flushing the file log on error paths too
    let _log_guard = logging::init_logging();
    price_index::metrics::init_metrics();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Fetch { date, json } => {
            let service = PriceService::from_config(&config)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            match service.get_prices_for(date).await {
                Ok(catalog) => print_catalog(&catalog, json, &config)?,
                Err(e) => {
                    error!("Price lookup failed: {}", e);
                    // Same empty state the HTTP surface shows
                    print_catalog(&Vec::new(), json, &config)?;
                    return Err(anyhow::Error::new(e).context("No bulletin available"));
                }
            }
        }
        Commands::Parse { file, json } => {
            let text = read_bulletin(&file)?;
            let catalog = filter_empty(parse_with_rules(&text, &config.rules));
            info!("Parsed {} commodities from {}", catalog.len(), file.display());
            print_catalog(&catalog, json, &config)?;
        }
        Commands::Url { date } => {
            let service = PriceService::from_config(&config)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            println!("{}", service.fetcher().url_for(date));
        }
        Commands::Serve { port } => {
            let port = match port {
                Some(p) => p,
                None => std::env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            };
            let service = Arc::new(PriceService::from_config(&config)?);
            server::start_server(service, port)
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;
        }
    }

    Ok(())
}
