mod bootstrap;
mod peer_registry;
mod relay;

pub use bootstrap::*;
pub use peer_registry::*;
pub use relay::*;
