use crate::config::RelayConfig;
use crate::discovery::load_ice_servers;
use crate::error::StartError;
use crate::media::ReqwestHttpClient;
use crate::relay::Relay;
use crate::signaling::SignalingTransport;
use colastream_core::RoomId;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches relay credentials, opens the signaling session and announces the
/// relay in `room_id`. Credential failures degrade to the fallback list;
/// signaling failures abort.
pub async fn start_relay<T>(
    config: &RelayConfig,
    room_id: &RoomId,
    transport: &mut T,
) -> Result<Relay, StartError>
where
    T: SignalingTransport + ?Sized,
{
    info!("Room ID: {}", room_id);
    info!("Media server: {}", config.media_server_url);

    let http = ReqwestHttpClient::new(config.upstream_timeout)?;
    let ice_servers = load_ice_servers(&config.discovery_url, config.discovery_timeout).await;

    transport.connect().await?;
    transport.announce(room_id, &config.identity).await?;
    let output = transport.output()?;

    Ok(Relay::new(
        config.media_server_url.clone(),
        ice_servers,
        Arc::new(http),
        output,
    ))
}

/// Best-effort close of the signaling session.
pub async fn close_session<T>(transport: &mut T)
where
    T: SignalingTransport + ?Sized,
{
    if let Err(e) = transport.disconnect().await {
        debug!("Ignoring error while closing signaling session: {}", e);
    }
    info!("Bridge stopped");
}
