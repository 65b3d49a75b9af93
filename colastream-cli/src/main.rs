use anyhow::{Context, Result};
use clap::Parser;
use colastream_core::RoomId;
use colastream_relay::{RelayConfig, RunOutcome, WsSignalingTransport, close_session, start_relay};
use colored::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Relays WHIP/WHEP offers from browser peers in a signaling room to a local
/// media server.
#[derive(Parser)]
#[command(name = "colastream", version)]
struct Cli {
    /// Room to join. A random `colastream-xxxxxx` room is used when omitted.
    room: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::from_env();
    let room_id = RoomId::from_arg(cli.room);

    let mut transport = WsSignalingTransport::new(config.signaling_url.clone());
    let relay = start_relay(&config, &room_id, &mut transport)
        .await
        .context("Failed to start relay")?;

    print_banner(&config, &room_id);

    let outcome = relay
        .run(&mut transport, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Shutting down...");
    close_session(&mut transport).await;

    match outcome {
        RunOutcome::Shutdown => Ok(()),
        RunOutcome::SessionEnded => anyhow::bail!("Signaling session ended unexpectedly"),
    }
}

fn print_banner(config: &RelayConfig, room_id: &RoomId) {
    println!();
    println!("{}", "ColaStream relay is live".green().bold());
    println!("   Room:    {}", room_id.as_str().cyan().bold());
    println!("   Publish: {}", config.publish_url(room_id.as_str()));
    println!("   View:    {}", config.view_url(room_id.as_str()));
    println!();
    println!("{}", "Waiting for connections...".dimmed());
}
