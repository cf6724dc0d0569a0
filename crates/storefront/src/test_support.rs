//! Fixtures shared by the in-crate router tests.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::{body::to_bytes, response::Response};
use orchard_core::{AccessPolicy, CredentialKind, Principal};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::{AccountEntry, AccountsConfig, StorefrontConfig};
use crate::services::auth::{AuthError, CredentialVerifier};
use crate::state::AppState;

/// Never verified; only has to look like a PHC string.
const PLACEHOLDER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$9QYr5nXxq2kY8r1s9m2n4Yc0vG3cW3q4o6jvXbq0mHk";

pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: Url::parse("https://shop.orchard.test").unwrap_or_else(|e| panic!("{e}")),
        token_secret: SecretString::from("k3Yq!9vLp#2mXz@8rTn$4wBc^7hJd&1s"),
        credential_ttl_days: 7,
        accounts: AccountsConfig {
            admin: AccountEntry {
                username: "ops".to_string(),
                password_hash: SecretString::from(PLACEHOLDER_HASH),
            },
            users: Vec::new(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Plaintext accounts, so router tests skip argon2.
pub struct PlaintextAccounts {
    accounts: Vec<(CredentialKind, &'static str, &'static str)>,
}

impl Default for PlaintextAccounts {
    fn default() -> Self {
        Self {
            accounts: vec![
                (CredentialKind::Admin, "ops", "orchard-admin-pass"),
                (CredentialKind::User, "ada", "ada-likes-mangoes"),
                (CredentialKind::User, "grace", "grace-picks-plums"),
            ],
        }
    }
}

impl CredentialVerifier for PlaintextAccounts {
    fn verify(
        &self,
        kind: CredentialKind,
        username: &str,
        password: &SecretString,
    ) -> Result<Principal, AuthError> {
        self.accounts
            .iter()
            .find(|(k, name, secret)| {
                *k == kind && *name == username && *secret == password.expose_secret()
            })
            .map(|(_, name, _)| Principal::new(kind, *name))
            .ok_or(AuthError::InvalidCredentials)
    }
}

pub fn test_state() -> AppState {
    AppState::with_verifier(
        test_config(),
        AccessPolicy::standard(),
        Arc::new(PlaintextAccounts::default()),
    )
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("{e}"))
}
