use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use apple_music_client::AppleMusicClient;
use instagram_client::InstagramClient;

use tunescout::config::{Cli, RunConfig};
use tunescout::pacing::FixedDelay;
use tunescout::pipeline::Pipeline;
use tunescout::report;
use tunescout::scraper::SongScraper;

/// Politeness delay between successive post fetches.
const POST_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RunConfig::load(&cli)?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Tunescout starting...");

    let instagram = InstagramClient::new(config.ig_session_id.clone());
    let scraper = SongScraper::new(instagram, Arc::new(FixedDelay::new(POST_DELAY)));

    // A missing catalog session outside dry-run is fatal before any
    // scraping starts.
    let mut pipeline = if config.dry_run {
        info!("Running in dry-run mode, no songs will be added");
        Pipeline::dry_run(scraper)
    } else {
        let developer_token = config.require_developer_token()?;
        if config.apple_user_token.is_none() {
            warn!("No user token configured, library adds will fail");
        }
        let catalog = AppleMusicClient::new(developer_token, config.apple_user_token.clone())
            .with_storefront(&config.storefront);
        Pipeline::live(scraper, Arc::new(catalog))
    };

    let run_report = pipeline.run(&config.target_user, config.max_posts).await;
    println!("{run_report}");

    if let Some(path) = &config.output_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        report::write_csv(&run_report, file)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Results saved");
    }

    Ok(())
}
