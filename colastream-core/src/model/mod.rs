mod ice;
mod message;
mod peer;
mod room;

pub use ice::{FALLBACK_STUN_URL, IceServerConfig};
pub use message::{DEFAULT_STREAM_PATH, InboundMessage, NegotiationKind, NegotiationRequest, OutboundMessage};
pub use peer::PeerId;
pub use room::RoomId;
