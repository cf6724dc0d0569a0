//! Integration tests for Orchard.
//!
//! Each test spawns the full storefront router on an ephemeral port and
//! drives it over HTTP with a cookie-keeping client, the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p orchard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gate` - Request gate and credential issuance/revocation
//! - `stores` - Selection stores, wishlist, cart and checkout across requests

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use orchard_storefront::app::router;
use orchard_storefront::config::{AccountEntry, AccountsConfig, StorefrontConfig};
use orchard_storefront::state::AppState;
use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

pub const ADMIN_USERNAME: &str = "ops";
pub const ADMIN_PASSWORD: &str = "orchard-admin-pass";
pub const USER_USERNAME: &str = "ada";
pub const USER_PASSWORD: &str = "ada-likes-mangoes";
pub const OTHER_USER_USERNAME: &str = "grace";
pub const OTHER_USER_PASSWORD: &str = "grace-picks-plums";

/// A storefront running on a local port plus a client bound to it.
pub struct TestApp {
    pub base_url: Url,
    pub client: Client,
}

impl TestApp {
    /// Start the storefront with one admin and two user accounts.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind(SocketAddr::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            0,
        ))
        .await
        .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = Url::parse(&format!("http://{addr}")).expect("Invalid base URL");

        let state = AppState::new(test_config(addr, base_url.clone()));
        let app = router(state);
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        Self {
            base_url,
            client: new_client(),
        }
    }

    /// Absolute URL for `path` on this app.
    ///
    /// # Panics
    ///
    /// Panics if `path` cannot be joined onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .expect("Invalid test path")
            .to_string()
    }

    /// A second client with an empty cookie jar, against the same app.
    #[must_use]
    pub fn fresh_client(&self) -> Client {
        new_client()
    }

    /// POST credentials to a login endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, endpoint: &str, username: &str, password: &str) -> Response {
        self.client
            .post(self.url(endpoint))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// Log in as the configured shopper.
    pub async fn login_user(&self) -> Response {
        self.login("/api/login", USER_USERNAME, USER_PASSWORD).await
    }

    /// Log in as the second configured shopper.
    pub async fn login_other_user(&self) -> Response {
        self.login("/api/login", OTHER_USER_USERNAME, OTHER_USER_PASSWORD)
            .await
    }

    /// Log in as the configured admin.
    pub async fn login_admin(&self) -> Response {
        self.login("/api/admin/login", ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// The `Location` header of a redirect response.
    #[must_use]
    pub fn location(response: &Response) -> Option<String> {
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn test_config(addr: SocketAddr, base_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url,
        token_secret: SecretString::from("k3Yq!9vLp#2mXz@8rTn$4wBc^7hJd&1s"),
        credential_ttl_days: 7,
        accounts: AccountsConfig {
            admin: account(ADMIN_USERNAME, ADMIN_PASSWORD),
            users: vec![
                account(USER_USERNAME, USER_PASSWORD),
                account(OTHER_USER_USERNAME, OTHER_USER_PASSWORD),
            ],
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn account(username: &str, password: &str) -> AccountEntry {
    AccountEntry {
        username: username.to_string(),
        password_hash: SecretString::from(light_hash(password)),
    }
}

/// Argon2id with minimal cost so logins stay fast in debug builds.
fn light_hash(password: &str) -> String {
    let params = Params::new(1024, 1, 1, None).expect("Valid argon2 params");
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash test password")
        .to_string()
}
