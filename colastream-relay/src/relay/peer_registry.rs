use colastream_core::PeerId;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Peers the signaling session reported as present. Observational only:
/// negotiation never consults it.
#[derive(Clone, Default)]
pub struct PeerRegistry {
    peers: Arc<DashMap<PeerId, Instant>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, peer_id: PeerId) {
        self.peers.insert(peer_id, Instant::now());
    }

    /// Removes the peer and returns how long it was present, or `None` if
    /// it was never seen.
    pub fn disconnect(&self, peer_id: &PeerId) -> Option<Duration> {
        self.peers
            .remove(peer_id)
            .map(|(_, connected_at)| connected_at.elapsed())
    }

    pub fn connected_for(&self, peer_id: &PeerId) -> Option<Duration> {
        self.peers.get(peer_id).map(|entry| entry.value().elapsed())
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn list(&self) -> Vec<PeerId> {
        self.peers.iter().map(|entry| entry.key().clone()).collect()
    }
}
