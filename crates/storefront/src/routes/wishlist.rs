//! Wishlist routes.

use axum::{
    Json,
    extract::Path,
};
use orchard_core::{Price, Wishlist, WishlistItem};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::{ensure_price_in_range, ensure_room};
use crate::error::{AppError, Result};
use crate::models::{session as session_store, session_keys};

/// Wishlist contents with derived totals.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Wishlist,
    pub count: usize,
    pub total_price: Price,
}

impl From<Wishlist> for WishlistView {
    fn from(items: Wishlist) -> Self {
        Self {
            count: items.len(),
            total_price: items.total_price(),
            items,
        }
    }
}

/// Body for add and toggle.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub handle: String,
    pub label: String,
    #[serde(default)]
    pub price: Option<Price>,
}

impl WishlistRequest {
    fn into_parts(self) -> Result<(String, WishlistItem)> {
        let handle = self.handle.trim().to_string();
        if handle.is_empty() {
            return Err(AppError::BadRequest("handle must not be empty".to_string()));
        }
        if let Some(price) = self.price {
            ensure_price_in_range(price)?;
        }
        Ok((
            handle,
            WishlistItem {
                label: self.label,
                price: self.price,
            },
        ))
    }
}

/// Result of a toggle: the new membership plus the wishlist.
#[derive(Debug, Serialize)]
pub struct ToggleView {
    pub handle: String,
    pub saved: bool,
    #[serde(flatten)]
    pub wishlist: WishlistView,
}

async fn load(session: &Session) -> Result<Wishlist> {
    Ok(session_store::load(session, session_keys::WISHLIST).await?)
}

async fn save(session: &Session, wishlist: &Wishlist) -> Result<()> {
    Ok(session_store::save(session, session_keys::WISHLIST, wishlist).await?)
}

/// GET /api/wishlist
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<WishlistView>> {
    Ok(Json(load(&session).await?.into()))
}

/// POST /api/wishlist
#[instrument(skip(session, body), fields(handle = %body.handle))]
pub async fn add(
    session: Session,
    Json(body): Json<WishlistRequest>,
) -> Result<Json<WishlistView>> {
    let (handle, item) = body.into_parts()?;
    let mut wishlist = load(&session).await?;
    ensure_room(wishlist.len(), !wishlist.contains(&handle))?;
    wishlist.add(handle, item);
    save(&session, &wishlist).await?;

    Ok(Json(wishlist.into()))
}

/// POST /api/wishlist/toggle
#[instrument(skip(session, body), fields(handle = %body.handle))]
pub async fn toggle(
    session: Session,
    Json(body): Json<WishlistRequest>,
) -> Result<Json<ToggleView>> {
    let (handle, item) = body.into_parts()?;
    let mut wishlist = load(&session).await?;
    ensure_room(wishlist.len(), !wishlist.contains(&handle))?;
    let saved = wishlist.toggle(handle.clone(), item);
    save(&session, &wishlist).await?;

    tracing::debug!(saved, "Wishlist toggled");
    Ok(Json(ToggleView {
        handle,
        saved,
        wishlist: wishlist.into(),
    }))
}

/// DELETE /api/wishlist/{handle}
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Path(handle): Path<String>,
) -> Result<Json<WishlistView>> {
    let mut wishlist = load(&session).await?;
    if !wishlist.remove(&handle) {
        return Err(AppError::NotFound(format!("wishlist item {handle}")));
    }
    save(&session, &wishlist).await?;

    Ok(Json(wishlist.into()))
}
