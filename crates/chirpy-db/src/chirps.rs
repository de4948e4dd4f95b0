use tracing::info;

use chirpy_types::models::{Chirp, MAX_CHIRP_LEN};
use chirpy_types::{Error, Result};

use crate::Database;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl Database {
    // -- Chirps --

    /// `body` is stored as given; any filtering happens before this call.
    pub fn create_chirp(&self, body: &str, author_id: u64) -> Result<Chirp> {
        let len = body.chars().count();
        if len > MAX_CHIRP_LEN {
            return Err(Error::validation(format!(
                "chirp is {len} characters, limit is {MAX_CHIRP_LEN}"
            )));
        }

        let chirp = self.chirps().create(|id, _| {
            Ok(Chirp {
                id,
                body: body.to_string(),
                author_id,
            })
        })?;

        info!("New chirp {} by user {}", chirp.id, author_id);
        Ok(chirp)
    }

    pub fn get_chirp(&self, id: u64) -> Result<Chirp> {
        self.chirps().read_one(id)
    }

    /// Chirps ordered by id, optionally restricted to one author.
    pub fn list_chirps(&self, author_id: Option<u64>, order: SortOrder) -> Result<Vec<Chirp>> {
        let mut chirps = self
            .chirps()
            .read_where(|c| author_id.is_none_or(|a| c.author_id == a))?;
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    /// Ownership is the caller's concern: read the chirp and compare
    /// `author_id` before deleting.
    pub fn delete_chirp(&self, id: u64) -> Result<()> {
        self.chirps().delete(id)
    }
}
