//! Admin dashboard.
//!
//! The back office itself is out of scope for the storefront; the dashboard
//! reports who is signed in and which prefixes the gate protects.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use orchard_core::CredentialKind;
use serde::Serialize;
use tracing::instrument;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// One row of the policy table, as shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct PolicyRow {
    pub prefix: &'static str,
    pub exempt: &'static [&'static str],
    pub kind: CredentialKind,
    pub login_path: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub admin: String,
    pub credential_expires_at: Option<DateTime<Utc>>,
    pub policy: Vec<PolicyRow>,
}

/// GET /admin
#[instrument(skip_all, fields(subject = %claims.sub))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
) -> Json<DashboardView> {
    let policy = state
        .policy()
        .rules()
        .iter()
        .map(|rule| PolicyRow {
            prefix: rule.prefix,
            exempt: rule.exempt,
            kind: rule.kind,
            login_path: rule.kind.login_path(),
        })
        .collect();

    Json(DashboardView {
        credential_expires_at: claims.expires_at(),
        admin: claims.sub,
        policy,
    })
}
