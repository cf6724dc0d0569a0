//! CLI command implementations.

pub mod password;
pub mod route;
pub mod secret;

use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] orchard_storefront::services::auth::AuthError),

    #[error("No password given on stdin")]
    EmptyPassword,
}
