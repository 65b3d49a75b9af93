use serde::{Deserialize, Serialize};

/// Public STUN server used when credential discovery is unavailable.
pub const FALLBACK_STUN_URL: &str = "stun:stun.l.google.com:19302";

/// One relay/STUN server entry as handed to browser clients in `iceServers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn new(urls: impl Into<String>) -> Self {
        Self {
            urls: urls.into(),
            username: None,
            credential: None,
        }
    }

    pub fn with_credentials(
        urls: impl Into<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            urls: urls.into(),
            username: Some(username.into()),
            credential: Some(credential.into()),
        }
    }

    pub fn fallback() -> Vec<IceServerConfig> {
        vec![IceServerConfig::new(FALLBACK_STUN_URL)]
    }
}
