//! Signed credential tokens.
//!
//! A token is `base64url(json claims) "." hex(hmac_sha256(secret, payload))`.
//! The claims carry the credential kind, so a token copied into the other
//! kind's cookie does not verify.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use orchard_core::{CredentialKind, Principal};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried inside a credential token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub kind: CredentialKind,
    pub sub: String,
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
}

impl TokenClaims {
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::new(self.kind, self.sub.clone())
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Issues and verifies credential tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub const fn new(secret: SecretString, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `principal`, valid for the configured TTL from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ExpiryOutOfRange`] if `now + ttl` is not a
    /// representable time, or [`TokenError::Key`] if the secret is unusable.
    pub fn issue(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<(String, TokenClaims), TokenError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = TokenClaims {
            kind: principal.kind,
            sub: principal.subject.clone(),
            exp: expires.timestamp(),
        };
        let json = serde_json::to_vec(&claims).map_err(|_| TokenError::BadPayload)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = hex::encode(self.mac(payload.as_bytes())?.finalize().into_bytes());
        Ok((format!("{payload}.{signature}"), claims))
    }

    /// Verify a token presented in `kind`'s cookie.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if the token is malformed, tampered with,
    /// issued for another kind, or expired at `now`.
    pub fn verify(
        &self,
        token: &str,
        kind: CredentialKind,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        self.mac(payload.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::BadPayload)?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|_| TokenError::BadPayload)?;

        if claims.kind != kind {
            return Err(TokenError::WrongKind);
        }
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, TokenError> {
        let Ok(mut mac) =
            <HmacSha256 as Mac>::new_from_slice(self.secret.expose_secret().as_bytes())
        else {
            return Err(TokenError::Key);
        };
        mac.update(payload);
        Ok(mac)
    }
}
