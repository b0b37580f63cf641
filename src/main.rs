use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod crawler;
mod error;
mod extract;
mod fetch;
mod gym_finder;
mod models;
mod normalize;
mod output;
mod text;
mod traits;

use config::Config;
use gym_finder::GymFinder;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!("Starting gym finder at {}", config.start_url);

    let finder = GymFinder::from_config(&config)?;
    let records = finder.run(&config.start_url).await?;

    output::save_csv(&config.out, &records)?;
    info!("Saved -> {} ({} rows)", config.out.display(), records.len());

    Ok(())
}
