use crate::model::ice::IceServerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stream path used when a request does not name one.
pub const DEFAULT_STREAM_PATH: &str = "live";

/// Which media-server endpoint a negotiation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationKind {
    /// Ingest: the peer publishes media.
    Whip,
    /// Egress: the peer plays media back.
    Whep,
}

impl NegotiationKind {
    /// Trailing path segment of the media-server endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            NegotiationKind::Whip => "whip",
            NegotiationKind::Whep => "whep",
        }
    }
}

impl fmt::Display for NegotiationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl NegotiationRequest {
    pub fn stream_path(&self) -> &str {
        match self.stream_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => DEFAULT_STREAM_PATH,
        }
    }

    pub fn sdp(&self) -> &str {
        self.sdp.as_deref().unwrap_or_default()
    }
}

/// Data message a peer sends to the relay over the signaling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundMessage {
    Whip(NegotiationRequest),
    Whep(NegotiationRequest),
    Ping,
    #[serde(other)]
    Unsupported,
}

impl InboundMessage {
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// Data message the relay sends back to a single peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "whip-answer", rename_all = "camelCase")]
    WhipAnswer {
        request_id: Option<String>,
        sdp: String,
        ice_servers: Vec<IceServerConfig>,
    },
    #[serde(rename = "whep-answer", rename_all = "camelCase")]
    WhepAnswer {
        request_id: Option<String>,
        sdp: String,
        ice_servers: Vec<IceServerConfig>,
    },
    #[serde(rename = "error", rename_all = "camelCase")]
    Error {
        request_id: Option<String>,
        error: String,
    },
    #[serde(rename = "pong")]
    Pong,
}

impl OutboundMessage {
    pub fn answer(
        kind: NegotiationKind,
        request_id: Option<String>,
        sdp: String,
        ice_servers: Vec<IceServerConfig>,
    ) -> Self {
        match kind {
            NegotiationKind::Whip => OutboundMessage::WhipAnswer {
                request_id,
                sdp,
                ice_servers,
            },
            NegotiationKind::Whep => OutboundMessage::WhepAnswer {
                request_id,
                sdp,
                ice_servers,
            },
        }
    }

    pub fn error(request_id: Option<String>, error: impl Into<String>) -> Self {
        OutboundMessage::Error {
            request_id,
            error: error.into(),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            OutboundMessage::WhipAnswer { request_id, .. }
            | OutboundMessage::WhepAnswer { request_id, .. }
            | OutboundMessage::Error { request_id, .. } => request_id.as_deref(),
            OutboundMessage::Pong => None,
        }
    }
}
