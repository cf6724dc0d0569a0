//! Selection store routes.
//!
//! Each domain (`delivery`, `customization`) is a separate store in the
//! shopper's session. Every response carries the full store and its derived
//! total so clients never compute prices themselves.

use axum::{
    Json,
    extract::Path,
};
use orchard_core::{Price, SelectionDomain, SelectionOption, SelectionStore};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{ensure_price_in_range, ensure_room};
use crate::error::Result;
use crate::models::{selection_key, session as session_store};

/// A selection store with its derived total.
#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub domain: SelectionDomain,
    pub selections: SelectionStore,
    pub total_price: Price,
}

impl SelectionView {
    fn new(domain: SelectionDomain, selections: SelectionStore) -> Self {
        Self {
            domain,
            total_price: selections.total_price(),
            selections,
        }
    }
}

/// GET /api/selections/{domain}
#[instrument(skip(session))]
pub async fn show(
    session: Session,
    Path(domain): Path<SelectionDomain>,
) -> Result<Json<SelectionView>> {
    let store: SelectionStore = session_store::load(&session, selection_key(domain)).await?;
    Ok(Json(SelectionView::new(domain, store)))
}

/// PUT /api/selections/{domain}/{type}
///
/// Replaces whatever option was chosen for the type. Prices beyond
/// [`Price::LIMIT`] and new types past the store cap are rejected with 400.
#[instrument(skip(session, option), fields(label = %option.label))]
pub async fn select(
    session: Session,
    Path((domain, selection_type)): Path<(SelectionDomain, String)>,
    Json(option): Json<SelectionOption>,
) -> Result<Json<SelectionView>> {
    if let Some(price) = option.price {
        ensure_price_in_range(price)?;
    }

    let key = selection_key(domain);
    let mut store: SelectionStore = session_store::load(&session, key).await?;
    ensure_room(store.len(), store.get(&selection_type).is_none())?;
    store.set_selected(selection_type, option);
    session_store::save(&session, key, &store).await?;

    tracing::debug!(total = %store.total_price(), "Selection updated");
    Ok(Json(SelectionView::new(domain, store)))
}

/// DELETE /api/selections/{domain}
#[instrument(skip(session))]
pub async fn reset(
    session: Session,
    Path(domain): Path<SelectionDomain>,
) -> Result<Json<SelectionView>> {
    let key = selection_key(domain);
    let mut store: SelectionStore = session_store::load(&session, key).await?;
    store.reset();
    session_store::save(&session, key, &store).await?;

    Ok(Json(SelectionView::new(domain, store)))
}
