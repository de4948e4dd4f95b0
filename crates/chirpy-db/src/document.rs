use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chirpy_types::models::{Chirp, User};

/// The whole persisted state. Always loaded and saved as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    /// Raw refresh token -> when it was revoked.
    #[serde(default)]
    pub revoked_tokens: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    pub sequences: Sequences,
}

/// Highest id ever handed out per collection. Never decreases, so deletes
/// cannot cause an id to be reissued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequences {
    #[serde(default)]
    pub chirps: u64,
    #[serde(default)]
    pub users: u64,
}
