use clap::{Parser, ValueEnum};
use pokemon_sv_scraper::{Config, Crawler};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pokemon-sv-scraper",
    about = "Scrapes ability, move and pokemon data for Scarlet/Violet into JSON",
    version
)]
struct Cli {
    /// Record type to scrape
    #[arg(value_enum)]
    target: Target,

    /// TOML config file; the bundled defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the JSON files (overrides the config)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip downloading pokemon images
    #[arg(long)]
    no_images: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Abilities,
    Moves,
    Pokemon,
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}={}", env!("CARGO_CRATE_NAME"), default_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(dir) = cli.out_dir {
        config.output.dir = dir;
    }
    if cli.no_images {
        config.crawl.download_images = false;
    }

    let crawler = match Crawler::new(config) {
        Ok(crawler) => crawler,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.target {
        Target::Abilities => crawler.write_abilities().await,
        Target::Moves => crawler.write_moves().await,
        Target::Pokemon => crawler.write_pokemon().await,
        Target::All => async {
            crawler.write_abilities().await?;
            crawler.write_moves().await?;
            crawler.write_pokemon().await
        }
        .await,
    };

    if let Err(e) = result {
        tracing::error!("Scrape aborted: {}", e);
        std::process::exit(1);
    }
}
