mod ice_discovery;

pub use ice_discovery::*;
