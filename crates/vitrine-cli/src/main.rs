mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrine_catalog::CatalogService;

#[derive(Debug, Parser)]
#[command(name = "vitrine-cli")]
#[command(about = "Build the storefront catalog from a price workbook")]
struct Cli {
    /// Workbook to read instead of `VITRINE_WORKBOOK_PATH`.
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// Seed for generated ratings and review counts.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print single-line JSON.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the full catalog payload for a market.
    Catalog {
        #[arg(long)]
        market: Option<String>,
        #[arg(long, default_value = "")]
        city: String,
    },
    /// Print the featured list for a market and city.
    Featured {
        #[arg(long)]
        market: Option<String>,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// `scheme://host` prefixed to root-relative image paths.
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = vitrine_core::load_app_config()?;

    // stdout carries the JSON payload; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut service = CatalogService::from_config(&config);
    if let Some(workbook) = cli.workbook {
        service.workbook_path = workbook;
    }

    let json = match cli.command {
        Commands::Catalog { market, city } => {
            let payload = commands::run_catalog(&service, market.as_deref(), &city, cli.seed)?;
            commands::render(&payload, cli.compact)?
        }
        Commands::Featured {
            market,
            city,
            count,
            base_url,
        } => {
            let payload = commands::run_featured(
                &service,
                market.as_deref(),
                &city,
                count,
                base_url.as_deref(),
                cli.seed,
            )?;
            commands::render(&payload, cli.compact)?
        }
    };

    println!("{json}");
    Ok(())
}
