use crate::error::DiscoveryError;
use colastream_core::IceServerConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(default)]
    servers: Vec<DiscoveredServer>,
}

#[derive(Debug, Deserialize)]
struct DiscoveredServer {
    /// Entries without `urls` contribute nothing.
    #[serde(default)]
    urls: ServerUrls,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    credential: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServerUrls {
    One(String),
    Many(Vec<String>),
}

impl Default for ServerUrls {
    fn default() -> Self {
        ServerUrls::Many(Vec::new())
    }
}

impl DiscoveryResponse {
    /// One entry per URL; blank usernames and credentials are dropped.
    fn flatten(self) -> Vec<IceServerConfig> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let mut out = Vec::new();
        for server in self.servers {
            let urls = match server.urls {
                ServerUrls::One(url) => vec![url],
                ServerUrls::Many(urls) => urls,
            };
            let username = non_empty(server.username);
            let credential = non_empty(server.credential);

            for url in urls {
                out.push(IceServerConfig {
                    urls: url,
                    username: username.clone(),
                    credential: credential.clone(),
                });
            }
        }
        out
    }
}

/// Parses a discovery document into the flattened server list.
pub fn parse_ice_servers(body: &[u8]) -> Result<Vec<IceServerConfig>, DiscoveryError> {
    let response: DiscoveryResponse = serde_json::from_slice(body)?;
    let servers = response.flatten();
    if servers.is_empty() {
        return Err(DiscoveryError::Empty);
    }
    Ok(servers)
}

pub async fn fetch_ice_servers(
    url: &str,
    timeout: Duration,
) -> Result<Vec<IceServerConfig>, DiscoveryError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DiscoveryError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    parse_ice_servers(&body)
}

/// Fetches relay credentials once. Any failure yields the fallback STUN entry,
/// so the result is always either the full fetched set or the fallback set.
pub async fn load_ice_servers(url: &str, timeout: Duration) -> Vec<IceServerConfig> {
    match fetch_ice_servers(url, timeout).await {
        Ok(servers) => {
            info!("Fetched {} ICE servers", servers.len());
            servers
        }
        Err(e) => {
            warn!("Using default STUN server ({})", e);
            IceServerConfig::fallback()
        }
    }
}
