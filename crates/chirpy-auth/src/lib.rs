//! Chirpy authentication primitives.
//!
//! - Password hashing behind [`password::PasswordHasher`] (Argon2id by default)
//! - Signed session tokens behind [`tokens::TokenCodec`] (HS256 JWT by default)
//! - [`tokens::TokenIssuer`] mints and validates access/refresh tokens
//! - An injectable [`clock::Clock`] so expiry is testable

pub mod clock;
pub mod password;
pub mod tokens;

pub use clock::{Clock, ManualClock, SystemClock};
pub use password::{Argon2Hasher, PasswordHasher};
pub use tokens::{HmacCodec, TokenCodec, TokenIssuer};
