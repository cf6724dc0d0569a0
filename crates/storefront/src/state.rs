//! Application state shared across handlers.

use std::sync::Arc;

use orchard_core::AccessPolicy;

use crate::config::StorefrontConfig;
use crate::services::auth::{ConfiguredAccounts, CredentialVerifier, TokenSigner};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the access policy, and the credential services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    policy: AccessPolicy,
    tokens: TokenSigner,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Create application state with the configured accounts and the
    /// standard access policy.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let verifier = Arc::new(ConfiguredAccounts::new(&config.accounts));
        Self::with_verifier(config, AccessPolicy::standard(), verifier)
    }

    /// Create application state with an explicit policy and verifier.
    #[must_use]
    pub fn with_verifier(
        config: StorefrontConfig,
        policy: AccessPolicy,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let ttl = chrono::Duration::try_days(config.credential_ttl_days)
            .unwrap_or(chrono::Duration::MAX);
        let tokens = TokenSigner::new(config.token_secret.clone(), ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                policy,
                tokens,
                verifier,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the route access policy.
    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.inner.policy
    }

    /// Get the credential token signer.
    #[must_use]
    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }

    /// Get the credential verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.inner.verifier.as_ref()
    }
}
