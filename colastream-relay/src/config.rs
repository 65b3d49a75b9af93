use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MEDIA_SERVER_URL: &str = "http://localhost:8889";
pub const DEFAULT_SIGNALING_URL: &str = "wss://wss.vdo.ninja";
pub const DEFAULT_DISCOVERY_URL: &str = "https://turnservers.vdo.ninja/";
pub const DEFAULT_IDENTITY: &str = "colastream-server";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://steveseguin.github.io/colastream";

const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

/// Runtime settings of the relay. Every field can be overridden through a
/// `COLASTREAM_*` environment variable.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base address of the media server's WHIP/WHEP endpoints.
    pub media_server_url: String,
    pub signaling_url: String,
    /// Credential discovery endpoint returning `{servers: [...]}`.
    pub discovery_url: String,
    /// Stream identity the relay announces in the room.
    pub identity: String,
    /// Where the publish/view pages live; only used for the startup banner.
    pub share_base_url: String,
    pub discovery_timeout: Duration,
    pub upstream_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            media_server_url: DEFAULT_MEDIA_SERVER_URL.to_owned(),
            signaling_url: DEFAULT_SIGNALING_URL.to_owned(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_owned(),
            identity: DEFAULT_IDENTITY.to_owned(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_owned(),
            discovery_timeout: Duration::from_millis(DEFAULT_DISCOVERY_TIMEOUT_MS),
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let string = |key: &str, current: &mut String| {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *current = value.trim().to_owned();
            }
        };
        string("COLASTREAM_MEDIA_SERVER_URL", &mut config.media_server_url);
        string("COLASTREAM_SIGNALING_URL", &mut config.signaling_url);
        string("COLASTREAM_DISCOVERY_URL", &mut config.discovery_url);
        string("COLASTREAM_IDENTITY", &mut config.identity);
        string("COLASTREAM_SHARE_BASE_URL", &mut config.share_base_url);

        let millis = |key: &str, current: &mut Duration| {
            let Some(value) = lookup(key) else {
                return;
            };
            match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => *current = Duration::from_millis(ms),
                _ => warn!("Ignoring invalid {}={:?}, keeping {:?}", key, value, current),
            }
        };
        millis(
            "COLASTREAM_DISCOVERY_TIMEOUT_MS",
            &mut config.discovery_timeout,
        );
        millis(
            "COLASTREAM_UPSTREAM_TIMEOUT_MS",
            &mut config.upstream_timeout,
        );

        config
    }

    pub fn publish_url(&self, room: &str) -> String {
        format!(
            "{}/publish.html?room={}",
            self.share_base_url.trim_end_matches('/'),
            room
        )
    }

    pub fn view_url(&self, room: &str) -> String {
        format!(
            "{}/view.html?room={}",
            self.share_base_url.trim_end_matches('/'),
            room
        )
    }
}
