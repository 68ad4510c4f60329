use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use forum_watch::config::Config;
use forum_watch::forum::client::ForumClient;
use forum_watch::moderation::openai::OpenAiModerator;
use forum_watch::output::{markdown, terminal};
use forum_watch::pipeline::scan::{self, ScanSettings};

/// forum-watch: moderation sweep for Vanilla forum comments.
///
/// Fetches recent comments, scores each one with the OpenAI moderation
/// endpoint, and prints a Markdown table of flagged comments on stdout.
/// All configuration comes from environment variables (or a .env file):
/// OPENAI_API_KEY, VANILLA_API_TOKEN, VANILLA_BASE_URL,
/// MODERATION_THRESHOLD, LOOKBACK_HOURS, PAGE_SIZE.
#[derive(Parser)]
#[command(name = "forum-watch", version, about)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("forum_watch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    if let Err(e) = run().await {
        terminal::display_error(&e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::load()?;
    info!(?config, "Loaded configuration");

    let report = sweep(&config).await?;
    println!("{report}");
    Ok(())
}

/// Fetch, classify, filter, and render. Returns the Markdown report.
async fn sweep(config: &Config) -> Result<String> {
    let client = ForumClient::new(&config.vanilla_base_url, &config.vanilla_api_token)?;
    let moderator = OpenAiModerator::new(
        &config.moderation_url,
        &config.openai_api_key,
        &config.moderation_model,
    )?;

    let settings = ScanSettings {
        threshold: config.threshold,
        lookback_hours: config.lookback_hours,
        page_size: config.page_size,
    };

    let outcome = scan::run(&client, &moderator, &settings)
        .await
        .context("Failed to fetch forum comments")?;

    terminal::display_summary(&outcome.summary);

    Ok(markdown::render_report(&outcome.entries))
}
