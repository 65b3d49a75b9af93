pub mod config;
pub mod discovery;
pub mod error;
pub mod media;
mod relay;
mod signaling;

pub use config::RelayConfig;
pub use error::{DiscoveryError, ParseError, SessionError, StartError, UpstreamError};
pub use relay::*;
pub use signaling::*;
