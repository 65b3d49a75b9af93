use crate::error::SessionError;
use crate::signaling::{SignalingEvent, SignalingOutput};
use async_trait::async_trait;
use colastream_core::RoomId;
use std::sync::Arc;

/// Connection to the external signaling service.
///
/// Lifecycle: `connect`, then `announce`, then `output`/`next_event` until
/// `next_event` yields `None` or the relay calls `disconnect`.
#[async_trait]
pub trait SignalingTransport: Send {
    async fn connect(&mut self) -> Result<(), SessionError>;

    /// Join `room_id` and advertise the relay under `identity`.
    async fn announce(&mut self, room_id: &RoomId, identity: &str) -> Result<(), SessionError>;

    /// Send half, valid once connected.
    fn output(&self) -> Result<Arc<dyn SignalingOutput>, SessionError>;

    /// Next inbound event; `None` once the session is gone.
    async fn next_event(&mut self) -> Option<SignalingEvent>;

    async fn disconnect(&mut self) -> Result<(), SessionError>;
}
