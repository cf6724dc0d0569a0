//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while checking credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown account or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A configured password hash could not be parsed.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}

/// Reasons a credential token is rejected.
///
/// Every variant is treated as "no credential" by the gate; the distinction
/// only shows up in debug logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not in payload.signature form")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token payload could not be decoded")]
    BadPayload,

    #[error("token was issued for a different credential kind")]
    WrongKind,

    #[error("token has expired")]
    Expired,

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("token secret was rejected as an HMAC key")]
    Key,
}
