//! Authentication service.
//!
//! Checks submitted credentials and issues/verifies the signed tokens that
//! the request gate accepts.

mod cookie;
mod error;
mod token;

pub use cookie::{credential_cookie, read_cookie, revocation_cookie};
pub use error::{AuthError, TokenError};
pub use token::{TokenClaims, TokenSigner};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use orchard_core::{CredentialKind, Principal};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{AccountEntry, AccountsConfig};

/// Verifies a username/password pair for a credential kind.
pub trait CredentialVerifier: Send + Sync {
    /// Check the credentials and return the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown account or a
    /// wrong password.
    fn verify(
        &self,
        kind: CredentialKind,
        username: &str,
        password: &SecretString,
    ) -> Result<Principal, AuthError>;
}

/// Accounts loaded from configuration, checked against argon2 hashes.
#[derive(Debug, Clone)]
pub struct ConfiguredAccounts {
    admin: Vec<AccountEntry>,
    users: Vec<AccountEntry>,
}

impl ConfiguredAccounts {
    #[must_use]
    pub fn new(accounts: &AccountsConfig) -> Self {
        Self {
            admin: vec![accounts.admin.clone()],
            users: accounts.users.clone(),
        }
    }

    fn accounts(&self, kind: CredentialKind) -> &[AccountEntry] {
        match kind {
            CredentialKind::Admin => &self.admin,
            CredentialKind::User => &self.users,
        }
    }
}

impl CredentialVerifier for ConfiguredAccounts {
    fn verify(
        &self,
        kind: CredentialKind,
        username: &str,
        password: &SecretString,
    ) -> Result<Principal, AuthError> {
        let account = self
            .accounts(kind)
            .iter()
            .find(|account| account.username == username)
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.expose_secret(), account.password_hash.expose_secret())?;
        Ok(Principal::new(kind, account.username.clone()))
    }
}

/// Hash a password with argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::MalformedHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn accounts() -> ConfiguredAccounts {
        ConfiguredAccounts::new(&AccountsConfig {
            admin: AccountEntry {
                username: "ops".to_string(),
                password_hash: SecretString::from(hash_password("orchard-admin-pass").unwrap()),
            },
            users: vec![AccountEntry {
                username: "ada".to_string(),
                password_hash: SecretString::from(hash_password("ada-likes-mangoes").unwrap()),
            }],
        })
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_admin_login_accepted() {
        let principal = accounts()
            .verify(CredentialKind::Admin, "ops", &secret("orchard-admin-pass"))
            .unwrap();
        assert_eq!(principal, Principal::new(CredentialKind::Admin, "ops"));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let result = accounts().verify(CredentialKind::User, "ada", &secret("pears"));
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_account_of_other_kind_rejected() {
        let result = accounts().verify(CredentialKind::Admin, "ada", &secret("ada-likes-mangoes"));
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_unknown_user_rejected() {
        let result = accounts().verify(CredentialKind::User, "grace", &secret("anything"));
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("pw", "not-a-hash"),
            Err(AuthError::MalformedHash)
        ));
    }
}
