// benchwarmer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Load config (seeding config/ from defaults/ on first run)
// 3. Build the ESPN client
// 4. Fetch and report every configured season, one at a time
// 5. Print a summary to stdout

use anyhow::Context;
use tracing::{error, info};

use benchwarmer_app::pipeline::{self, SeasonStatus};
use benchwarmer_core::config;
use benchwarmer_espn::EspnClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("benchwarmer starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, seasons={:?}, private={}",
        config.league.id,
        config.league.seasons,
        config.credentials.is_configured()
    );

    // 3. Build the ESPN client
    let client = EspnClient::from_config(&config).context("failed to build ESPN client")?;

    // 4. Fetch and report
    let summary = pipeline::run(&client, &config).await;

    // 5. Summary
    for outcome in &summary.seasons {
        match &outcome.status {
            SeasonStatus::Written {
                teams,
                weeks,
                skipped_weeks,
                worst_manager,
            } => {
                print!("{}: {teams} teams, {weeks} weeks", outcome.season);
                if !skipped_weeks.is_empty() {
                    print!(" (skipped weeks {skipped_weeks:?})");
                }
                println!();
                if let Some((team, pct)) = worst_manager {
                    println!("  most mismanaged: {team} ({pct:.2}% of optimal)");
                }
            }
            SeasonStatus::Failed { reason } => {
                println!("{}: FAILED ({reason})", outcome.season);
            }
        }
    }
    for file in &summary.files {
        println!("wrote {}", file.display());
    }

    if summary.all_failed() {
        error!("Every season failed; no reports written");
        anyhow::bail!("no season could be fetched; see logs/benchwarmer.log");
    }

    info!("benchwarmer finished");
    Ok(())
}

/// Initialize tracing to log to `logs/benchwarmer.log`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("benchwarmer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("benchwarmer=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
