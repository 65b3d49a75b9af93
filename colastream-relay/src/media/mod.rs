mod http_client;
mod negotiation;

pub use http_client::*;
pub use negotiation::*;
