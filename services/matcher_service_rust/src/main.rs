mod config;
mod runner;

use crate::config::MatcherConfig;
use crate::runner::{format_summary, run_league};
use anyhow::{bail, Result};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = MatcherConfig::from_env();
    info!(
        "Starting game matcher (data dir: {}, leagues: {})",
        config.data_dir.display(),
        config.leagues.join(",")
    );

    let mut failed = Vec::new();
    for league in &config.leagues {
        match run_league(&config, league).await {
            Ok(run) => println!("\n{}\n", format_summary(&run)),
            Err(e) => {
                error!("{} matching failed: {:#}", league, e);
                failed.push(league.as_str());
            }
        }
    }

    if !failed.is_empty() {
        bail!("Matching failed for: {}", failed.join(", "));
    }
    Ok(())
}
