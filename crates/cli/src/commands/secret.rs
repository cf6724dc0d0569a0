//! Token secret generation.

use std::io::Write;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use orchard_storefront::config::check_token_secret;
use rand::RngCore;

use super::CliError;

/// Random bytes per generated secret.
const SECRET_BYTES: usize = 48;

/// Generate a URL-safe secret for `ORCHARD_TOKEN_SECRET`.
///
/// Random output occasionally spells a placeholder word such as `todo`;
/// those draws are discarded so the server always accepts the result.
#[must_use]
pub fn generate() -> String {
    first_acceptable(std::iter::repeat_with(random_secret))
}

fn random_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// First candidate that passes the server's token secret checks, or an empty
/// string if `candidates` runs out first.
fn first_acceptable(candidates: impl IntoIterator<Item = String>) -> String {
    candidates
        .into_iter()
        .find(|candidate| check_token_secret(candidate).is_ok())
        .unwrap_or_default()
}

pub fn run(mut output: impl Write) -> Result<(), CliError> {
    writeln!(output, "{}", generate())?;
    Ok(())
}
