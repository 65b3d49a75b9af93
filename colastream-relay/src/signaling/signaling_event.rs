use bytes::Bytes;
use colastream_core::PeerId;

/// Everything the signaling session delivers to the relay, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingEvent {
    /// Raw data payload sent by a peer.
    Data(PeerId, Bytes),
    PeerConnected(PeerId),
    PeerDisconnected(PeerId),
}
