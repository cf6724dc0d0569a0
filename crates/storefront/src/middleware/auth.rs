//! Credential extractors.
//!
//! The gate already redirects requests that lack a credential; these
//! extractors give handlers the verified identity and reject on their own if
//! a handler is ever mounted outside the gated prefixes.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use orchard_core::{CredentialKind, HeldCredentials};

use super::gate::login_url;
use crate::services::auth::{TokenClaims, TokenSigner, read_cookie};
use crate::state::AppState;

/// Verify the token in `kind`'s cookie, if any.
#[must_use]
pub fn verified_claims(
    headers: &HeaderMap,
    tokens: &TokenSigner,
    kind: CredentialKind,
    now: DateTime<Utc>,
) -> Option<TokenClaims> {
    let token = read_cookie(headers, kind.cookie_name())?;
    match tokens.verify(&token, kind, now) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(credential = %kind, reason = %e, "Ignoring credential cookie");
            None
        }
    }
}

/// Which credential kinds the request holds valid tokens for.
#[must_use]
pub fn held_credentials(
    headers: &HeaderMap,
    tokens: &TokenSigner,
    now: DateTime<Utc>,
) -> HeldCredentials {
    CredentialKind::ALL
        .into_iter()
        .filter(|kind| verified_claims(headers, tokens, *kind, now).is_some())
        .fold(HeldCredentials::none(), HeldCredentials::with)
}

/// Extractor that requires a valid admin credential.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAdmin(claims): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
pub struct RequireAdmin(pub TokenClaims);

/// Extractor that requires a valid user credential.
pub struct RequireUser(pub TokenClaims);

/// Rejection when a required credential is missing or invalid.
pub enum CredentialRejection {
    /// Redirect to the kind's login page (for page requests).
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for CredentialRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(target) => Redirect::temporary(&target).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

fn require(
    parts: &Parts,
    state: &AppState,
    kind: CredentialKind,
) -> Result<TokenClaims, CredentialRejection> {
    verified_claims(&parts.headers, state.tokens(), kind, Utc::now()).ok_or_else(|| {
        if parts.uri.path().starts_with("/api/") {
            CredentialRejection::Unauthorized
        } else {
            let target = login_url(
                &parts.headers,
                &parts.uri,
                &state.config().base_url,
                kind.login_path(),
            );
            CredentialRejection::RedirectToLogin(target.into())
        }
    })
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = CredentialRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, CredentialKind::Admin).map(Self)
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = CredentialRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, CredentialKind::User).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderValue, header::COOKIE};
    use orchard_core::Principal;

    use super::*;
    use crate::test_support::test_state;

    #[test]
    fn test_held_credentials_reports_each_kind() {
        let state = test_state();
        let now = Utc::now();
        let (admin, _) = state
            .tokens()
            .issue(&Principal::new(CredentialKind::Admin, "ops"), now)
            .unwrap();
        let (user, _) = state
            .tokens()
            .issue(&Principal::new(CredentialKind::User, "ada"), now)
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("orchard_admin={admin}; orchard_user={user}")).unwrap(),
        );
        let held = held_credentials(&headers, state.tokens(), now);
        assert!(held.holds(CredentialKind::Admin));
        assert!(held.holds(CredentialKind::User));

        assert_eq!(
            held_credentials(&HeaderMap::new(), state.tokens(), now),
            HeldCredentials::none()
        );
    }

    #[test]
    fn test_verified_claims_ignores_tampered_cookie() {
        let state = test_state();
        let now = Utc::now();
        let (token, _) = state
            .tokens()
            .issue(&Principal::new(CredentialKind::User, "ada"), now)
            .unwrap();
        let tampered = format!("{token}00");

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("orchard_user={tampered}")).unwrap(),
        );
        assert!(verified_claims(&headers, state.tokens(), CredentialKind::User, now).is_none());
    }
}
