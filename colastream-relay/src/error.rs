use thiserror::Error;

/// Longest slice of a media-server error body echoed back to a peer.
const MAX_BODY_EXCERPT: usize = 100;

/// Inbound data message that could not be decoded. The message is dropped.
#[derive(Debug, Error)]
#[error("malformed relay message: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

/// A WHIP/WHEP call to the media server failed. Reported to the requesting peer only.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("media server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("media server request timed out")]
    Timeout,

    #[error("media server unreachable: {0}")]
    Transport(String),
}

impl UpstreamError {
    pub fn status(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((idx, _)) => &body[..idx],
            None => body,
        };
        UpstreamError::Status {
            status,
            body: body.trim().to_owned(),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// ICE credential discovery failed. The relay substitutes the fallback list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("credential request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("credential service returned {0}")]
    Status(u16),

    #[error("credential response is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("credential service returned no servers")]
    Empty,
}

/// Signaling session failure. Fatal during startup.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to signaling server: {0}")]
    Connect(String),

    #[error("failed to announce on signaling server: {0}")]
    Announce(String),

    #[error("signaling session is not connected")]
    NotConnected,

    #[error("failed to send signaling message: {0}")]
    Send(String),

    #[error("signaling session closed")]
    Closed,
}

/// Startup failure. The process exits non-zero.
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to build media server client: {0}")]
    HttpClient(#[from] UpstreamError),
}
