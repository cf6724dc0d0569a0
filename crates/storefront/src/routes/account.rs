//! Shopper account route.

use axum::Json;
use chrono::{DateTime, Utc};
use orchard_core::CredentialKind;
use serde::Serialize;
use tracing::instrument;

use crate::middleware::RequireUser;

/// The signed-in shopper.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub kind: CredentialKind,
    pub subject: String,
    pub credential_expires_at: Option<DateTime<Utc>>,
}

/// GET /account
#[instrument(skip_all, fields(subject = %claims.sub))]
pub async fn show(RequireUser(claims): RequireUser) -> Json<AccountView> {
    Json(AccountView {
        kind: claims.kind,
        credential_expires_at: claims.expires_at(),
        subject: claims.sub,
    })
}
