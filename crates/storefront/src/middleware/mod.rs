//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions over a bounded `moka` store)
//! 6. Request gate (credential check for protected prefixes)
//!
//! The login endpoints additionally sit behind a rate limiter.

pub mod auth;
pub mod gate;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{CredentialRejection, RequireAdmin, RequireUser, held_credentials};
pub use gate::request_gate;
pub use rate_limit::login_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{BoundedMemoryStore, create_session_layer};
