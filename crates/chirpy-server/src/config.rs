use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use chirpy_auth::tokens::{DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS, MAX_ACCESS_TTL_SECS};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

const MAX_REFRESH_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug)]
pub struct Config {
    pub jwt_secret: String,
    pub polka_key: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Argon2 t-cost; `None` keeps the library default.
    pub hash_cost: Option<u32>,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("JWT_SECRET is unset or still a placeholder");
        }

        let polka_key = var("POLKA_KEY").unwrap_or_default();
        if polka_key.is_empty() {
            bail!("POLKA_KEY is unset");
        }

        // Lifetimes must be positive and bounded; 0 would expire every token
        // on issue.
        let ttl = |key: &str, default: i64, max: i64| -> Result<i64> {
            let Some(raw) = var(key) else {
                return Ok(default);
            };
            let secs: i64 = raw
                .parse()
                .with_context(|| format!("{key} must be an integer"))?;
            if secs <= 0 || secs > max {
                bail!("{key} must be between 1 and {max} seconds, got {secs}");
            }
            Ok(secs)
        };

        Ok(Self {
            jwt_secret,
            polka_key,
            db_path: var("CHIRPY_DB_PATH").unwrap_or_else(|| "database.json".into()).into(),
            host: var("CHIRPY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: var("CHIRPY_PORT")
                .unwrap_or_else(|| "8080".into())
                .parse()
                .context("CHIRPY_PORT must be a port number")?,
            static_dir: var("CHIRPY_STATIC_DIR").unwrap_or_else(|| ".".into()).into(),
            hash_cost: var("CHIRPY_HASH_COST")
                .map(|v| v.parse().context("CHIRPY_HASH_COST must be a positive integer"))
                .transpose()?,
            access_ttl_secs: ttl(
                "CHIRPY_ACCESS_TTL_SECS",
                DEFAULT_ACCESS_TTL_SECS,
                MAX_ACCESS_TTL_SECS,
            )?,
            refresh_ttl_secs: ttl(
                "CHIRPY_REFRESH_TTL_SECS",
                DEFAULT_REFRESH_TTL_SECS,
                MAX_REFRESH_TTL_SECS,
            )?,
        })
    }
}
