//! Main Entrypoint for the Yorimichi Walking Guide
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and flags from the command line.
//! 2. Building the live session context (Gemini Live client + config slot).
//! 3. Mounting the overlay, which registers the session config and starts
//!    acknowledging tool calls.
//! 4. Connecting with the registered config and running until Ctrl+C.

use anyhow::Context;
use clap::Parser;
use gemini_realtime::GeminiLiveClient;
use std::sync::Arc;
use tracing::info;
use yorimichi::{
    cli::{Cli, overlay_lines},
    config::Config,
};
use yorimichi_core::{ConfigSlot, GuideOverlay, SessionContext};

/// Waits for the `Ctrl+C` signal.
async fn shutdown_signal() -> anyhow::Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to install Ctrl+C handler")?;
    info!("Received shutdown signal. Shutting down gracefully...");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!(video_on = cli.video_on, offline = cli.offline, "Configuration loaded.");

    // --- 3. Build the Session Context ---
    let endpoint = if cli.offline {
        config.live_url.clone()
    } else {
        config.live_endpoint()?
    };
    let client = Arc::new(GeminiLiveClient::new(endpoint));
    let config_slot = Arc::new(ConfigSlot::new());
    let ctx = SessionContext::new(client.clone(), config_slot.clone());

    // --- 4. Mount and Render the Overlay ---
    let mut overlay = GuideOverlay::new();
    overlay.mount(&ctx);

    match GuideOverlay::render(cli.props()) {
        Some(view) if cli.json => println!("{}", serde_json::to_string_pretty(&view)?),
        Some(view) => {
            for line in overlay_lines(&view) {
                println!("{}", line);
            }
        }
        None => info!("Video is on; overlay hidden."),
    }

    // --- 5. Connect and Run ---
    if !cli.offline {
        let session_config = config_slot
            .current()
            .context("Overlay did not register a session config")?;
        client.connect(session_config).await?;
    }
    shutdown_signal().await?;

    overlay.unmount();
    client.disconnect();
    info!("Walking guide has shut down.");
    Ok(())
}
