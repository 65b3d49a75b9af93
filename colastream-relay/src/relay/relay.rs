use crate::error::ParseError;
use crate::media::{HttpClient, negotiate};
use crate::relay::PeerRegistry;
use crate::signaling::{SignalingEvent, SignalingOutput, SignalingTransport};
use bytes::Bytes;
use colastream_core::{
    IceServerConfig, InboundMessage, NegotiationKind, NegotiationRequest, OutboundMessage, PeerId,
};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Why [`Relay::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The shutdown future resolved.
    Shutdown,
    /// The transport stopped yielding events.
    SessionEnded,
}

/// Bridges peer data messages on the signaling session to the media
/// server's WHIP/WHEP endpoints.
///
/// Events are handled one at a time in arrival order. Each negotiation runs
/// as its own task so a slow media server only delays that peer's answer.
pub struct Relay {
    http: Arc<dyn HttpClient>,
    output: Arc<dyn SignalingOutput>,
    media_server_url: Arc<str>,
    ice_servers: Arc<[IceServerConfig]>,
    peers: PeerRegistry,
    negotiations: JoinSet<()>,
}

impl Relay {
    pub fn new(
        media_server_url: impl Into<String>,
        ice_servers: Vec<IceServerConfig>,
        http: Arc<dyn HttpClient>,
        output: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            http,
            output,
            media_server_url: Arc::from(media_server_url.into()),
            ice_servers: Arc::from(ice_servers),
            peers: PeerRegistry::new(),
            negotiations: JoinSet::new(),
        }
    }

    pub fn peers(&self) -> PeerRegistry {
        self.peers.clone()
    }

    /// Credentials attached to every answer. Fixed at construction.
    pub fn ice_servers(&self) -> &[IceServerConfig] {
        &self.ice_servers
    }

    pub fn in_flight(&self) -> usize {
        self.negotiations.len()
    }

    /// Consumes events from `transport` until the session ends or `shutdown`
    /// resolves. Negotiations still in flight at that point are aborted.
    pub async fn run<T, S>(mut self, transport: &mut T, shutdown: S) -> RunOutcome
    where
        T: SignalingTransport + ?Sized,
        S: Future<Output = ()>,
    {
        info!("Relay event loop started");
        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break RunOutcome::Shutdown;
                }

                event = transport.next_event() => {
                    match event {
                        Some(e) => self.handle_event(e).await,
                        None => {
                            warn!("Signaling session ended");
                            break RunOutcome::SessionEnded;
                        }
                    }
                }

                Some(res) = self.negotiations.join_next(), if !self.negotiations.is_empty() => {
                    if let Err(e) = res {
                        if e.is_panic() {
                            error!("Negotiation task panicked: {}", e);
                        }
                    }
                }
            }
        };

        if !self.negotiations.is_empty() {
            info!(
                "Abandoning {} in-flight negotiations",
                self.negotiations.len()
            );
            self.negotiations.abort_all();
        }
        info!("Relay event loop finished");
        outcome
    }

    pub async fn handle_event(&mut self, event: SignalingEvent) {
        match event {
            SignalingEvent::Data(peer_id, payload) => {
                self.handle_data(peer_id, payload).await;
            }

            SignalingEvent::PeerConnected(peer_id) => {
                self.peers.connect(peer_id.clone());
                info!(
                    "[{}] Peer connected ({} connected)",
                    peer_id.short(),
                    self.peers.len()
                );
            }

            SignalingEvent::PeerDisconnected(peer_id) => match self.peers.disconnect(&peer_id) {
                Some(present_for) => info!(
                    "[{}] Peer disconnected after {:.1?} ({} connected)",
                    peer_id.short(),
                    present_for,
                    self.peers.len()
                ),
                None => debug!("[{}] Disconnect for unknown peer", peer_id.short()),
            },
        }
    }

    async fn handle_data(&mut self, peer_id: PeerId, payload: Bytes) {
        let message = match InboundMessage::parse(&payload).map_err(ParseError::from) {
            Ok(message) => message,
            Err(e) => {
                debug!("[{}] Dropping message: {}", peer_id.short(), e);
                return;
            }
        };

        match message {
            InboundMessage::Whip(request) => {
                self.spawn_negotiation(peer_id, NegotiationKind::Whip, request)
            }
            InboundMessage::Whep(request) => {
                self.spawn_negotiation(peer_id, NegotiationKind::Whep, request)
            }
            InboundMessage::Ping => {
                deliver(self.output.as_ref(), &peer_id, OutboundMessage::Pong).await;
            }
            InboundMessage::Unsupported => {
                info!("[{}] Ignoring unsupported message type", peer_id.short());
            }
        }
    }

    fn spawn_negotiation(
        &mut self,
        peer_id: PeerId,
        kind: NegotiationKind,
        request: NegotiationRequest,
    ) {
        info!(
            "[{}] {} /{}",
            peer_id.short(),
            kind.endpoint().to_uppercase(),
            request.stream_path()
        );

        let http = self.http.clone();
        let output = self.output.clone();
        let base_url = self.media_server_url.clone();
        let ice_servers = self.ice_servers.clone();

        self.negotiations.spawn(async move {
            let reply = match negotiate(http.as_ref(), &base_url, kind, &request).await {
                Ok(sdp) => {
                    info!(
                        "[{}] {} answer ready",
                        peer_id.short(),
                        kind.endpoint().to_uppercase()
                    );
                    OutboundMessage::answer(kind, request.request_id, sdp, ice_servers.to_vec())
                }
                Err(e) => {
                    warn!("[{}] {} failed: {}", peer_id.short(), kind, e);
                    OutboundMessage::error(request.request_id, e.to_string())
                }
            };

            deliver(output.as_ref(), &peer_id, reply).await;
        });
    }
}

async fn deliver(output: &dyn SignalingOutput, peer_id: &PeerId, message: OutboundMessage) {
    if let Err(e) = output.send(peer_id, message).await {
        warn!("[{}] Failed to send reply: {}", peer_id.short(), e);
    }
}
