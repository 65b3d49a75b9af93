use crate::error::SessionError;
use colastream_core::{OutboundMessage, PeerId};
use async_trait::async_trait;

/// Peer-addressed send half of a signaling session. The relay holds it
/// behind an `Arc` so negotiation tasks can reply on their own.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver a message to one peer only.
    async fn send(&self, peer_id: &PeerId, message: OutboundMessage) -> Result<(), SessionError>;
}
