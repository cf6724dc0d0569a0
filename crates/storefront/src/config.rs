//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORCHARD_BASE_URL` - Public URL for the storefront
//! - `ORCHARD_TOKEN_SECRET` - Credential token signing secret (min 32 chars, high entropy)
//! - `ORCHARD_ADMIN_USERNAME` - Back-office account name
//! - `ORCHARD_ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the back-office password
//!
//! ## Optional
//! - `ORCHARD_USER_ACCOUNTS` - Shopper accounts as `name:phc-hash;name:phc-hash`
//! - `ORCHARD_HOST` - Bind address (default: 127.0.0.1)
//! - `ORCHARD_PORT` - Listen port (default: 3000)
//! - `ORCHARD_CREDENTIAL_TTL_DAYS` - Credential cookie lifetime in days, 1 to 3650 (default: 7)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Password hashes can be generated with `orchard-cli hash-password`.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use argon2::password_hash::PasswordHash;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_CREDENTIAL_TTL_DAYS: i64 = 7;

/// Longest accepted credential lifetime (ten years).
const MAX_CREDENTIAL_TTL_DAYS: i64 = 3650;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Credential token signing secret
    pub token_secret: SecretString,
    /// Lifetime of issued credential cookies, in days
    pub credential_ttl_days: i64,
    /// Accounts allowed to sign in
    pub accounts: AccountsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// A configured account: name plus argon2 PHC password hash.
///
/// Implements `Debug` manually to redact the hash.
#[derive(Clone)]
pub struct AccountEntry {
    pub username: String,
    pub password_hash: SecretString,
}

impl std::fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountEntry")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Accounts per credential kind.
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Back-office account
    pub admin: AccountEntry,
    /// Shopper accounts
    pub users: Vec<AccountEntry>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ORCHARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORCHARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ORCHARD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORCHARD_PORT".to_string(), e.to_string()))?;
        let base_url = parse_base_url(&get_required_env("ORCHARD_BASE_URL")?)?;
        let token_secret = get_required_env("ORCHARD_TOKEN_SECRET")?;
        check_token_secret(&token_secret)?;
        let token_secret = SecretString::from(token_secret);
        let credential_ttl_days = parse_ttl_days(&get_env_or_default(
            "ORCHARD_CREDENTIAL_TTL_DAYS",
            &DEFAULT_CREDENTIAL_TTL_DAYS.to_string(),
        ))?;

        let accounts = AccountsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            token_secret,
            credential_ttl_days,
            accounts,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl AccountsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let admin = AccountEntry {
            username: get_required_env("ORCHARD_ADMIN_USERNAME")?,
            password_hash: parse_password_hash(
                "ORCHARD_ADMIN_PASSWORD_HASH",
                &get_required_env("ORCHARD_ADMIN_PASSWORD_HASH")?,
            )?,
        };
        let users = get_optional_env("ORCHARD_USER_ACCOUNTS")
            .map(|raw| parse_user_accounts(&raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self { admin, users })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("ORCHARD_BASE_URL".to_string(), e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "ORCHARD_BASE_URL".to_string(),
            "must include a host".to_string(),
        ));
    }
    Ok(url)
}

fn parse_ttl_days(raw: &str) -> Result<i64, ConfigError> {
    match raw.parse::<i64>() {
        Ok(days) if (1..=MAX_CREDENTIAL_TTL_DAYS).contains(&days) => Ok(days),
        Ok(_) => Err(ConfigError::InvalidEnvVar(
            "ORCHARD_CREDENTIAL_TTL_DAYS".to_string(),
            format!("must be between 1 and {MAX_CREDENTIAL_TTL_DAYS}"),
        )),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "ORCHARD_CREDENTIAL_TTL_DAYS".to_string(),
            e.to_string(),
        )),
    }
}

/// Check that a value is a PHC string before accepting it as a hash.
fn parse_password_hash(var_name: &str, raw: &str) -> Result<SecretString, ConfigError> {
    let raw = raw.trim();
    PasswordHash::new(raw).map_err(|e| {
        ConfigError::InvalidEnvVar(var_name.to_string(), format!("not a PHC hash: {e}"))
    })?;
    Ok(SecretString::from(raw.to_string()))
}

/// Parse `name:phc;name:phc`. PHC strings never contain `:` or `;`.
fn parse_user_accounts(raw: &str) -> Result<Vec<AccountEntry>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (username, hash) = entry.split_once(':').ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ORCHARD_USER_ACCOUNTS".to_string(),
                    format!("expected name:hash, got '{}'", entry.split('$').next().unwrap_or("")),
                )
            })?;
            let username = username.trim();
            if username.is_empty() {
                return Err(ConfigError::InvalidEnvVar(
                    "ORCHARD_USER_ACCOUNTS".to_string(),
                    "empty account name".to_string(),
                ));
            }
            Ok(AccountEntry {
                username: username.to_string(),
                password_hash: parse_password_hash("ORCHARD_USER_ACCOUNTS", hash)?,
            })
        })
        .collect()
}

/// Check a candidate `ORCHARD_TOKEN_SECRET` the way startup does: long
/// enough, not a placeholder, and with enough entropy.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` describing the first failed check.
pub fn check_token_secret(value: &str) -> Result<(), ConfigError> {
    validate_token_secret(value, "ORCHARD_TOKEN_SECRET")?;
    validate_secret_strength(value, "ORCHARD_TOKEN_SECRET")
}

/// Validate that a token secret meets minimum length requirements.
fn validate_token_secret(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use `orchard-cli gen-secret`."
            ),
        ));
    }

    Ok(())
}
