//! Password hashing for the account environment variables.
//!
//! # Usage
//!
//! ```bash
//! # Hash the admin password (read from stdin, first line)
//! echo -n 'correct horse battery staple' | orchard-cli hash-password
//! ```
//!
//! The output goes into `ORCHARD_ADMIN_PASSWORD_HASH`, or after `name:` in
//! `ORCHARD_USER_ACCOUNTS`.

use std::io::{BufRead, Write};

use orchard_storefront::services::auth::hash_password;
use secrecy::{ExposeSecret, SecretString};

use super::CliError;

/// Read a password from `input` and write its argon2 PHC hash to `output`.
///
/// Only the first line is used; a trailing newline is stripped.
pub fn run(input: impl BufRead, mut output: impl Write) -> Result<(), CliError> {
    let password = read_password(input)?;
    let hash = hash_password(password.expose_secret())?;
    writeln!(output, "{hash}")?;
    tracing::debug!("Password hashed");
    Ok(())
}

fn read_password(mut input: impl BufRead) -> Result<SecretString, CliError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::EmptyPassword);
    }
    Ok(SecretString::from(password))
}
