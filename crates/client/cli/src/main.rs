//! Headless battle simulator.
//!
//! Loads content, runs one battle to completion under the autopilot and
//! prints the battle report as JSON on stdout. Progress goes to stderr
//! through `tracing`.
mod config;

use anyhow::{Context, Result};
use combat_content::ContentBundle;
use combat_core::CombatEvent;
use config::CliConfig;
use runtime::{BattleRuntime, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = CliConfig::from_env();
    tracing::info!(
        content = %config.content_dir.display(),
        stage = %config.stage_file,
        seed = config.runtime.seed,
        "starting battle"
    );

    let bundle = ContentBundle::load_dir(&config.content_dir, &config.stage_file)
        .with_context(|| format!("loading content from {}", config.content_dir.display()))?;
    let mut runtime = BattleRuntime::from_bundle(bundle, config.runtime.clone())?;

    let mut progression = runtime
        .bus()
        .subscribe(Topic::Progression)
        .context("subscribing to progression events")?;
    let narrator = tokio::spawn(async move {
        loop {
            match progression.recv().await {
                Ok(event) => narrate(event.at.0, &event.payload),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "progression log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let report = tokio::task::spawn_blocking(move || runtime.run_to_completion())
        .await
        .context("battle task panicked")??;

    // runtime dropped with the blocking task, so the narrator sees Closed
    narrator.await.context("narrator task panicked")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn narrate(clock_ms: u64, event: &CombatEvent) {
    match event {
        CombatEvent::WaveStarted {
            area_index,
            wave_index,
            total_waves,
            ..
        } => tracing::info!(
            clock_ms,
            "area {} wave {}/{} started",
            area_index + 1,
            wave_index + 1,
            total_waves
        ),
        CombatEvent::AreaStarted { name, .. } => {
            tracing::info!(clock_ms, area = %name, "entering area")
        }
        other => tracing::info!(clock_ms, event = other.name()),
    }
}

/// Logging to stderr, filtered by `RUST_LOG` (default `info`).
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
