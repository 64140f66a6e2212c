mod batch;
mod config;
mod error;
mod formatter;
mod model;
mod transcript;
mod youtube;

use anyhow::Context;
use clap::Parser;

use batch::{load_videos, write_failures, BatchFetcher};
use config::Config;
use formatter::summary_line;
use youtube::YoutubeSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let config = Config::parse();

    let videos = load_videos(&config.input).await?;
    log::info!(
        "Fetching subtitles for {} video(s) from {}",
        videos.len(),
        config.input.display()
    );

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let source = YoutubeSource::new()?;
    let fetcher = BatchFetcher::new(
        source,
        config.output_dir.clone(),
        config.languages.clone(),
        config.pacing(),
    );
    let report = fetcher.run(&videos).await;

    println!(
        "\n{}",
        summary_line(report.success_count, report.fail_count, report.skipped_count)
    );

    if write_failures(&config.failures, &report.failures).await? {
        println!("❌ Failed videos: {}", config.failures.display());
    }
    log::info!("Run finished");

    Ok(())
}
