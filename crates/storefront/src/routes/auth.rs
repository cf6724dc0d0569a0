//! Credential issuance and revocation.
//!
//! Login checks the submitted account against the credential verifier and
//! sets the kind's signed cookie. Logout overwrites the cookie with an
//! immediately expiring one, whether or not a credential was held.
//!
//! The shopper session follows the user credential: user login rotates the
//! session id and drops stores left by a different subject, and user logout
//! flushes the session.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use orchard_core::CredentialKind;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tower_sessions::cookie::time::Duration as CookieDuration;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::session_keys;
use crate::services::auth::{AuthError, credential_cookie, revocation_cookie};
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub kind: CredentialKind,
    pub subject: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// What a login page tells the client.
#[derive(Debug, Serialize)]
pub struct LoginDescriptor {
    pub kind: CredentialKind,
    pub method: &'static str,
    pub endpoint: &'static str,
}

impl LoginDescriptor {
    const fn for_kind(kind: CredentialKind) -> Self {
        Self {
            kind,
            method: "POST",
            endpoint: kind.login_endpoint(),
        }
    }
}

/// GET /admin/login
pub async fn admin_login_page() -> Json<LoginDescriptor> {
    Json(LoginDescriptor::for_kind(CredentialKind::Admin))
}

/// GET /login
pub async fn user_login_page() -> Json<LoginDescriptor> {
    Json(LoginDescriptor::for_kind(CredentialKind::User))
}

/// POST /api/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    login(state, CredentialKind::Admin, body, None).await
}

/// POST /api/login
pub async fn user_login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    login(state, CredentialKind::User, body, Some(session)).await
}

/// POST /api/admin/logout
pub async fn admin_logout(State(state): State<AppState>) -> Response {
    logout(&state, CredentialKind::Admin)
}

/// POST /api/logout
pub async fn user_logout(State(state): State<AppState>, session: Session) -> Result<Response> {
    session.flush().await?;
    Ok(logout(&state, CredentialKind::User))
}

/// Bind the shopper session to `subject`.
///
/// Stores written under another subject are discarded; stores from an
/// anonymous session carry over. The id is rotated either way.
async fn claim_session(session: &Session, subject: &str) -> Result<()> {
    let owner: Option<String> = session.get(session_keys::OWNER).await?;
    match owner {
        Some(owner) if owner != subject => {
            tracing::debug!("Discarding stores from previous session owner");
            session.flush().await?;
        }
        _ => session.cycle_id().await?,
    }
    session.insert(session_keys::OWNER, subject).await?;
    Ok(())
}

#[instrument(skip(state, body, session), fields(username = %body.username))]
async fn login(
    state: AppState,
    kind: CredentialKind,
    body: LoginRequest,
    session: Option<Session>,
) -> Result<Response> {
    let LoginRequest { username, password } = body;
    let password = SecretString::from(password);

    // Argon2 verification is CPU-bound.
    let verifier_state = state.clone();
    let verified = tokio::task::spawn_blocking(move || {
        verifier_state
            .verifier()
            .verify(kind, &username, &password)
    })
    .await
    .map_err(|e| AppError::Internal(format!("credential check panicked: {e}")))?;

    let principal = match verified {
        Ok(principal) => principal,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(credential = %kind, "Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    let (token, claims) = state.tokens().issue(&principal, Utc::now())?;
    if let Some(session) = session {
        claim_session(&session, &principal.subject).await?;
    }
    let cookie = credential_cookie(
        kind,
        token,
        CookieDuration::seconds(state.tokens().ttl().num_seconds()),
        state.config().secure_cookies(),
    );

    set_sentry_user(&principal.subject, kind.as_str());
    tracing::info!(credential = %kind, subject = %principal.subject, "Credential issued");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Json(LoginResponse {
            kind,
            subject: principal.subject,
            expires_at: claims.expires_at(),
        }),
    )
        .into_response())
}

fn logout(state: &AppState, kind: CredentialKind) -> Response {
    let cookie = revocation_cookie(kind, state.config().secure_cookies());
    clear_sentry_user();
    tracing::info!(credential = %kind, "Credential revoked");

    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header::CONTENT_TYPE},
    };
    use std::sync::Arc;

    use axum::{Router, http::header::COOKIE};
    use orchard_core::AccessPolicy;
    use tower::ServiceExt;

    use crate::app::router;
    use crate::test_support::{PlaintextAccounts, body_json, test_config, test_state};

    use super::*;

    fn login_request(path: &str, username: &str, password: &str) -> Request<Body> {
        Request::post(path)
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::from(
                serde_json::json!({ "username": username, "password": password }).to_string(),
            ))
            .unwrap()
    }

    fn set_cookie(response: &Response) -> String {
        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_admin_login_sets_admin_cookie() {
        let response = router(test_state())
            .oneshot(login_request("/api/admin/login", "ops", "orchard-admin-pass"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("orchard_admin="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));

        let body = body_json(response).await;
        assert_eq!(body["kind"], "admin");
        assert_eq!(body["subject"], "ops");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let response = router(test_state())
            .oneshot(login_request("/api/login", "ada", "pears"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_user_account_cannot_log_in_as_admin() {
        let response = router(test_state())
            .oneshot(login_request("/api/admin/login", "ada", "ada-likes-mangoes"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_expires_cookie_unconditionally() {
        let request = Request::post("/api/logout").body(Body::empty()).unwrap();
        let response = router(test_state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("orchard_user=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    /// `name=value` of the named cookie among the response's `Set-Cookie` headers.
    fn cookie_pair(response: &Response, name: &str) -> Option<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.strip_prefix(name).is_some_and(|rest| rest.starts_with('=')))
            .map(str::to_string)
    }

    async fn log_in(app: &Router, username: &str, password: &str, session: &str) -> Response {
        let mut request = login_request("/api/login", username, password);
        if !session.is_empty() {
            request
                .headers_mut()
                .insert(COOKIE, session.parse().unwrap());
        }
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
    }

    async fn cart_body(app: &Router, cookie: &str) -> serde_json::Value {
        let request = Request::get("/cart")
            .header(COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        body_json(app.clone().oneshot(request).await.unwrap()).await
    }

    async fn add_mango(app: &Router, cookie: &str) {
        let request = Request::post("/cart/items")
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "handle": "mango", "label": "Mango", "unit_price": 3 })
                    .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_as_other_user_starts_empty_cart() {
        let app = router(test_state());

        let response = log_in(&app, "ada", "ada-likes-mangoes", "").await;
        let ada = cookie_pair(&response, "orchard_user").unwrap();
        let ada_session = cookie_pair(&response, "orchard_session").unwrap();
        add_mango(&app, &format!("{ada}; {ada_session}")).await;

        let response = log_in(&app, "grace", "grace-picks-plums", &ada_session).await;
        let grace = cookie_pair(&response, "orchard_user").unwrap();
        let grace_session = cookie_pair(&response, "orchard_session").unwrap();
        assert_ne!(grace_session, ada_session);

        let body = cart_body(&app, &format!("{grace}; {grace_session}")).await;
        assert_eq!(body["item_count"], 0);

        // The replaced session id no longer resolves either.
        let body = cart_body(&app, &format!("{ada}; {ada_session}")).await;
        assert_eq!(body["item_count"], 0);
    }

    #[tokio::test]
    async fn test_relogin_as_same_user_keeps_cart_under_new_id() {
        let app = router(test_state());

        let response = log_in(&app, "ada", "ada-likes-mangoes", "").await;
        let first_session = cookie_pair(&response, "orchard_session").unwrap();
        let ada = cookie_pair(&response, "orchard_user").unwrap();
        add_mango(&app, &format!("{ada}; {first_session}")).await;

        let response = log_in(&app, "ada", "ada-likes-mangoes", &first_session).await;
        let second_session = cookie_pair(&response, "orchard_session").unwrap();
        assert_ne!(second_session, first_session);

        let body = cart_body(&app, &format!("{ada}; {second_session}")).await;
        assert_eq!(body["item_count"], 1);
    }

    #[tokio::test]
    async fn test_user_logout_flushes_session() {
        let app = router(test_state());

        let response = log_in(&app, "ada", "ada-likes-mangoes", "").await;
        let ada = cookie_pair(&response, "orchard_user").unwrap();
        let session = cookie_pair(&response, "orchard_session").unwrap();
        let cookie = format!("{ada}; {session}");
        add_mango(&app, &cookie).await;

        let request = Request::post("/api/logout")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = cart_body(&app, &cookie).await;
        assert_eq!(body["item_count"], 0);
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_fails_login_without_panicking() {
        let mut config = test_config();
        config.credential_ttl_days = i64::MAX;
        let state = AppState::with_verifier(
            config,
            AccessPolicy::standard(),
            Arc::new(PlaintextAccounts::default()),
        );

        let response = router(state)
            .oneshot(login_request("/api/login", "ada", "ada-likes-mangoes"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(cookie_pair(&response, "orchard_user").is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_login_page_describes_endpoint() {
        let request = Request::get("/admin/login").body(Body::empty()).unwrap();
        let response = router(test_state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["endpoint"], "/api/admin/login");
        assert_eq!(body["method"], "POST");
    }
}
