use tracing::{info, warn};

use chirpy_types::models::User;
use chirpy_types::{Error, Result};

use crate::Database;
use crate::document::Document;
use crate::repository::{Collection, Users};

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Error::validation("email must be a valid address"));
    }
    if password.is_empty() {
        return Err(Error::validation("password must not be empty"));
    }
    Ok(())
}

fn email_taken(doc: &Document, email: &str, except: Option<u64>) -> bool {
    Users::records(doc)
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

impl Database {
    // -- Users --

    pub fn create_user(&self, email: &str, password: &str) -> Result<User> {
        validate_credentials(email, password)?;
        // Hash before taking the store lock; it is the slow part.
        let password_hash = self.hasher().hash(password)?;

        let user = self.users().create(|id, doc| {
            if email_taken(doc, email, None) {
                return Err(Error::validation("email already registered"));
            }
            Ok(User {
                id,
                email: email.to_string(),
                password_hash,
                is_upgraded: false,
            })
        })?;

        info!("New user {}", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: u64) -> Result<User> {
        self.users().read_one(id)
    }

    /// Replace email and password. The hash is recomputed from `password`.
    pub fn update_user(&self, id: u64, email: &str, password: &str) -> Result<User> {
        validate_credentials(email, password)?;
        let password_hash = self.hasher().hash(password)?;

        self.store().mutate(|doc| {
            if email_taken(doc, email, Some(id)) {
                return Err(Error::validation("email already registered"));
            }
            let user = Users::records_mut(doc).get_mut(&id).ok_or(Error::NotFound)?;
            user.email = email.to_string();
            user.password_hash = password_hash;
            info!("Updated user {}", id);
            Ok(user.clone())
        })
    }

    /// Mark a user as upgraded. Set by the billing webhook.
    pub fn upgrade_user(&self, id: u64) -> Result<()> {
        self.users().update(id, |user| {
            user.is_upgraded = true;
            Ok(())
        })?;
        info!("Upgraded user {}", id);
        Ok(())
    }

    /// Look the user up by email (linear scan) and check the password.
    ///
    /// Unknown email is `NotFound`, a wrong password is
    /// `InvalidCredentials`. On success the returned user carries no hash.
    pub fn auth_user(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .users()
            .read_all()?
            .into_iter()
            .find(|u| u.email == email)
            .ok_or(Error::NotFound)?;

        if !self.hasher().verify(&user.password_hash, password)? {
            warn!("Password mismatch for user {}", user.id);
            return Err(Error::InvalidCredentials);
        }

        Ok(user.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open_temp;

    #[test]
    fn create_hashes_password() {
        let (db, _dir) = open_temp();
        let user = db.create_user("saul@bettercall.com", "123456").unwrap();
        assert_eq!(user.id, 1);
        assert!(!user.is_upgraded);
        assert_ne!(user.password_hash, "123456");
        assert!(db.hasher().verify(&user.password_hash, "123456").unwrap());
    }

    #[test]
    fn auth_outcomes_are_distinct() {
        let (db, _dir) = open_temp();
        db.create_user("walt@breakingbad.com", "04234").unwrap();

        let user = db.auth_user("walt@breakingbad.com", "04234").unwrap();
        assert_eq!(user.id, 1);
        assert!(user.password_hash.is_empty());

        assert!(matches!(
            db.auth_user("walt@breakingbad.com", "wrong"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            db.auth_user("jesse@breakingbad.com", "04234"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn update_rehashes_and_changes_email() {
        let (db, _dir) = open_temp();
        let before = db.create_user("old@example.com", "old-pass").unwrap();

        let after = db.update_user(before.id, "new@example.com", "new-pass").unwrap();
        assert_eq!(after.email, "new@example.com");
        assert_ne!(after.password_hash, before.password_hash);

        assert!(db.auth_user("new@example.com", "new-pass").is_ok());
        assert!(matches!(db.auth_user("old@example.com", "old-pass"), Err(Error::NotFound)));
        assert!(matches!(
            db.update_user(99, "x@example.com", "pw"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn duplicate_email_rejected() {
        let (db, _dir) = open_temp();
        db.create_user("a@example.com", "pw").unwrap();
        let b = db.create_user("b@example.com", "pw").unwrap();

        assert!(matches!(db.create_user("a@example.com", "pw"), Err(Error::Validation(_))));
        assert!(matches!(db.update_user(b.id, "a@example.com", "pw"), Err(Error::Validation(_))));
        // Keeping your own email is fine.
        assert!(db.update_user(b.id, "b@example.com", "pw2").is_ok());
    }

    #[test]
    fn malformed_credentials_rejected() {
        let (db, _dir) = open_temp();
        assert!(matches!(db.create_user("", "pw"), Err(Error::Validation(_))));
        assert!(matches!(db.create_user("no-at-sign", "pw"), Err(Error::Validation(_))));
        assert!(matches!(db.create_user("a@b.c", ""), Err(Error::Validation(_))));
        assert!(db.users().read_all().unwrap().is_empty());
    }

    #[test]
    fn upgrade_sets_flag() {
        let (db, _dir) = open_temp();
        let user = db.create_user("a@example.com", "pw").unwrap();
        db.upgrade_user(user.id).unwrap();
        assert!(db.get_user(user.id).unwrap().is_upgraded);
        assert!(matches!(db.upgrade_user(42), Err(Error::NotFound)));
    }
}
