use tracing::info;

use chirpy_types::Result;

use crate::Database;

impl Database {
    // -- Revoked refresh tokens --

    /// Record `token` as revoked now. Revoking again only moves the stamp.
    pub fn revoke_token(&self, token: &str) -> Result<()> {
        let now = self.clock.now();
        self.store().mutate(|doc| {
            doc.revoked_tokens.insert(token.to_string(), now);
            Ok(())
        })?;
        info!("Refresh token revoked");
        Ok(())
    }

    pub fn is_token_revoked(&self, token: &str) -> Result<bool> {
        Ok(self.store().load()?.revoked_tokens.contains_key(token))
    }
}
