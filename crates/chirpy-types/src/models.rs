use serde::{Deserialize, Serialize};

/// Maximum length of a chirp body, counted in characters after filtering.
pub const MAX_CHIRP_LEN: usize = 140;

/// Stored chirp. Immutable once created; only its author may delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chirp {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

/// Stored user account.
///
/// `password_hash` is persisted in the document but must never cross the
/// system boundary; convert to [`crate::api::UserResponse`] before returning
/// a user to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_upgraded: bool,
}

impl User {
    /// Drop the password hash, leaving the rest of the record intact.
    pub fn redacted(mut self) -> Self {
        self.password_hash.clear();
        self
    }
}
