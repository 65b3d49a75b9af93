mod signaling_event;
mod signaling_output;
mod signaling_transport;
mod ws_transport;

pub use signaling_event::*;
pub use signaling_output::*;
pub use signaling_transport::*;
pub use ws_transport::*;
