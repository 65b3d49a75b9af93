pub mod fake_media_server;
pub mod signal_helpers;

pub use fake_media_server::*;
pub use mock_signaling::*;
pub use mock_transport::*;
pub use signal_helpers::*;
