use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, warn};

use chirpy_types::api::{Claims, TokenKind};
use chirpy_types::{Error, Result};

use crate::clock::Clock;

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 60 * 24 * 60 * 60;

/// Upper bound for a caller-requested access token lifetime.
pub const MAX_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;

/// Signs claims into a token string and verifies them back.
///
/// `decode` checks the signature and claim shape only. Kind and expiry are
/// enforced by [`TokenIssuer::validate`].
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &Claims) -> Result<String>;
    fn decode(&self, token: &str) -> Result<Claims>;
}

/// HS256 JWTs keyed by a shared secret supplied through configuration.
pub struct HmacCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl HmacCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock, not the system time.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["iss", "sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenCodec for HmacCodec {
    fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| Error::Signing(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Error::token_invalid(e.to_string()))
    }
}

/// Mints and validates access and refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(codec: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            clock,
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Sign a token of `kind` for `subject`, valid from now until `expires_at`.
    pub fn issue(&self, kind: TokenKind, subject: u64, expires_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            iss: kind.as_str().to_string(),
            sub: subject.to_string(),
            iat: self.clock.now().timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = self.codec.encode(&claims)?;
        debug!("Issued {} token for user {} (exp {})", kind, subject, claims.exp);
        Ok(token)
    }

    /// Access token with the default lifetime, or `expires_in_secs` when the
    /// caller asks for one. Non-positive requests fall back to the default;
    /// anything past a day is clamped.
    pub fn issue_access(&self, subject: u64, expires_in_secs: Option<i64>) -> Result<String> {
        let ttl = match expires_in_secs {
            Some(secs) if secs > 0 => Duration::seconds(secs.min(MAX_ACCESS_TTL_SECS)),
            _ => self.access_ttl,
        };
        self.issue(TokenKind::Access, subject, self.clock.now() + ttl)
    }

    pub fn issue_refresh(&self, subject: u64) -> Result<String> {
        self.issue(TokenKind::Refresh, subject, self.clock.now() + self.refresh_ttl)
    }

    /// Verify signature, then kind, then the [iat, exp] window.
    ///
    /// Revocation is not consulted here; refresh-token callers check the
    /// registry before calling this.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = self.codec.decode(token)?;

        if claims.iss != expected.as_str() {
            warn!("Rejected token: expected {} but got {:?}", expected, claims.iss);
            return Err(Error::token_invalid(format!("expected a {} token", expected)));
        }

        let now = self.clock.now().timestamp();
        if now < claims.iat {
            return Err(Error::token_invalid("token issued in the future"));
        }
        if now > claims.exp {
            return Err(Error::token_invalid("token expired"));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn setup() -> (TokenIssuer, Arc<ManualClock>) {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let issuer = TokenIssuer::new(Arc::new(HmacCodec::new("test-secret")), clock.clone());
        (issuer, clock)
    }

    #[test]
    fn access_token_validates_as_access() {
        let (issuer, _) = setup();
        let token = issuer.issue_access(7, None).unwrap();
        let claims = issuer.validate(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.iss, "access");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.exp - claims.iat, DEFAULT_ACCESS_TTL_SECS);
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let (issuer, _) = setup();
        let token = issuer.issue_refresh(7).unwrap();
        let result = issuer.validate(&token, TokenKind::Access);
        assert!(matches!(result, Err(Error::TokenInvalid(_))));
        assert!(issuer.validate(&token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let (issuer, _) = setup();
        let token = issuer.issue_access(7, None).unwrap();
        let result = issuer.validate(&token, TokenKind::Refresh);
        assert!(matches!(result, Err(Error::TokenInvalid(_))));
    }

    #[test]
    fn expiry_detected_lazily() {
        let (issuer, clock) = setup();
        let token = issuer.issue_access(1, Some(60)).unwrap();

        clock.advance(Duration::seconds(60));
        assert!(issuer.validate(&token, TokenKind::Access).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(
            issuer.validate(&token, TokenKind::Access),
            Err(Error::TokenInvalid(_))
        ));
    }

    #[test]
    fn refresh_lifetime_is_sixty_days() {
        let (issuer, clock) = setup();
        let token = issuer.issue_refresh(3).unwrap();

        clock.advance(Duration::days(59));
        assert!(issuer.validate(&token, TokenKind::Refresh).is_ok());

        clock.advance(Duration::days(2));
        assert!(issuer.validate(&token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn requested_access_ttl_is_clamped() {
        let (issuer, _) = setup();

        let token = issuer.issue_access(1, Some(10 * MAX_ACCESS_TTL_SECS)).unwrap();
        let claims = issuer.validate(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_ACCESS_TTL_SECS);

        let token = issuer.issue_access(1, Some(0)).unwrap();
        let claims = issuer.validate(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_ACCESS_TTL_SECS);
    }

    #[test]
    fn wrong_secret_fails_signature() {
        let (issuer, clock) = setup();
        let token = issuer.issue_access(1, None).unwrap();

        let other = TokenIssuer::new(Arc::new(HmacCodec::new("other-secret")), clock);
        assert!(matches!(
            other.validate(&token, TokenKind::Access),
            Err(Error::TokenInvalid(_))
        ));
    }

    #[test]
    fn token_from_the_future_rejected() {
        let (issuer, clock) = setup();
        let token = issuer.issue_access(1, None).unwrap();
        clock.advance(Duration::seconds(-5));
        assert!(issuer.validate(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn garbage_is_invalid() {
        let (issuer, _) = setup();
        assert!(matches!(
            issuer.validate("not.a.jwt", TokenKind::Access),
            Err(Error::TokenInvalid(_))
        ));
    }
}
