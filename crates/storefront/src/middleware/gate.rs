//! Request gate.
//!
//! Runs before every handler. Paths outside the access policy's prefixes pass
//! straight through; for the rest, the request's credential cookies are
//! verified and the policy decides between forwarding and a `307` redirect to
//! the login page of the missing credential kind. The redirect target is an
//! absolute URL on the request's own origin.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri, header::HOST},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use orchard_core::GateDecision;
use url::Url;

use super::auth::held_credentials;
use crate::state::AppState;

/// Forward or redirect the request according to the access policy.
pub async fn request_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let policy = state.policy();
    let path = request.uri().path();

    if !policy.applies_to(path) {
        return next.run(request).await;
    }

    let held = held_credentials(request.headers(), state.tokens(), Utc::now());

    match policy.decide(path, &held) {
        GateDecision::Forward => next.run(request).await,
        GateDecision::Redirect { kind, login_path } => {
            let target = login_url(
                request.headers(),
                request.uri(),
                &state.config().base_url,
                login_path,
            );
            tracing::info!(
                path = %path,
                credential = %kind,
                target = %target,
                "Missing credential, redirecting to login"
            );
            Redirect::temporary(target.as_str()).into_response()
        }
    }
}

/// Absolute URL of `login_path` on the request's origin.
#[must_use]
pub fn login_url(headers: &HeaderMap, uri: &Uri, fallback: &Url, login_path: &str) -> Url {
    let mut url = request_origin(headers, uri, fallback);
    url.set_path(login_path);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Work out the origin the client used for this request.
///
/// Order: absolute-form request URI, then the `Host` header with the scheme
/// from `X-Forwarded-Proto` (or the configured base URL's scheme), then the
/// configured base URL.
#[must_use]
pub fn request_origin(headers: &HeaderMap, uri: &Uri, fallback: &Url) -> Url {
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        if let Ok(url) = Url::parse(&format!("{scheme}://{authority}")) {
            return url;
        }
    }

    let Some(host) = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
    else {
        return fallback.clone();
    };

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| matches!(*s, "http" | "https"))
        .unwrap_or_else(|| fallback.scheme());

    match Url::parse(&format!("{scheme}://{host}")) {
        Ok(url) if url.path() == "/" && url.host_str().is_some() => url,
        _ => fallback.clone(),
    }
}
