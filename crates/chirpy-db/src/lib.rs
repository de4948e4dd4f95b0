pub mod chirps;
pub mod document;
pub mod repository;
pub mod revocations;
pub mod store;
pub mod users;

use std::path::Path;
use std::sync::Arc;

use chirpy_auth::{Clock, PasswordHasher};
use chirpy_types::Result;
use tracing::info;

pub use chirps::SortOrder;
pub use document::Document;
pub use repository::{Chirps, Repository, Users};
pub use store::Store;

/// Entry point for every persisted operation: chirp and user repositories
/// plus the refresh-token revocation registry, all over one [`Store`].
pub struct Database {
    store: Store,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl Database {
    /// Open (creating if missing) the document at `path`. Failure here means
    /// the service cannot run.
    pub fn open(path: &Path, hasher: Arc<dyn PasswordHasher>, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = Store::open(path)?;
        info!("Database opened at {}", path.display());
        Ok(Self {
            store,
            hasher,
            clock,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn chirps(&self) -> Repository<'_, Chirps> {
        Repository::new(&self.store)
    }

    pub fn users(&self) -> Repository<'_, Users> {
        Repository::new(&self.store)
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }
}
