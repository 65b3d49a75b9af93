use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const ROOM_PREFIX: &str = "colastream-";
const ROOM_SUFFIX_LEN: usize = 6;

/// Signaling room the relay joins. Fixed for the lifetime of the process.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Random room id of the form `colastream-xxxxxx`.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{ROOM_PREFIX}{}", &suffix[..ROOM_SUFFIX_LEN]))
    }

    /// Uses the supplied id when present, otherwise generates one.
    pub fn from_arg(arg: Option<String>) -> Self {
        match arg {
            Some(id) if !id.trim().is_empty() => Self(id.trim().to_owned()),
            _ => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
