//! Cart routes.
//!
//! All paths here sit under `/cart`, so the gate has already required a user
//! credential before any handler runs.

use axum::{
    Json,
    extract::Path,
};
use orchard_core::{Cart, CheckoutSummary, Price, SelectionDomain, SelectionStore};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::{ensure_price_in_range, ensure_room};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{selection_key, session as session_store, session_keys};

/// A cart line as returned to clients.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub handle: String,
    pub label: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_price: Price,
}

/// Cart contents with derived totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: Price,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .map(|(handle, line)| CartLineView {
                    handle: handle.to_string(),
                    label: line.label.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_price: line.line_price(),
                })
                .collect(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub handle: String,
    pub label: String,
    pub unit_price: Price,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Quantity update body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: u32,
}

async fn load(session: &Session) -> Result<Cart> {
    Ok(session_store::load(session, session_keys::CART).await?)
}

async fn save(session: &Session, cart: &Cart) -> Result<()> {
    Ok(session_store::save(session, session_keys::CART, cart).await?)
}

/// GET /cart
#[instrument(skip_all, fields(subject = %claims.sub))]
pub async fn show(RequireUser(claims): RequireUser, session: Session) -> Result<Json<CartView>> {
    let cart = load(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// POST /cart/items
#[instrument(skip_all, fields(handle = %body.handle, quantity = body.quantity))]
pub async fn add(session: Session, Json(body): Json<AddToCart>) -> Result<Json<CartView>> {
    let handle = body.handle.trim();
    if handle.is_empty() {
        return Err(AppError::BadRequest("handle must not be empty".to_string()));
    }
    if body.quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    ensure_price_in_range(body.unit_price)?;

    let mut cart = load(&session).await?;
    ensure_room(cart.len(), cart.get(handle).is_none())?;
    cart.add(handle, body.label, body.unit_price, body.quantity);
    save(&session, &cart).await?;

    tracing::debug!(subtotal = %cart.subtotal(), "Added to cart");
    Ok(Json(CartView::from(&cart)))
}

/// PATCH /cart/items/{handle}
///
/// A quantity of zero removes the line.
#[instrument(skip(session, body), fields(quantity = body.quantity))]
pub async fn update(
    session: Session,
    Path(handle): Path<String>,
    Json(body): Json<UpdateQuantity>,
) -> Result<Json<CartView>> {
    let mut cart = load(&session).await?;
    if !cart.set_quantity(&handle, body.quantity) {
        return Err(AppError::NotFound(format!("cart line {handle}")));
    }
    save(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// DELETE /cart/items/{handle}
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(handle): Path<String>) -> Result<Json<CartView>> {
    let mut cart = load(&session).await?;
    if !cart.remove(&handle) {
        return Err(AppError::NotFound(format!("cart line {handle}")));
    }
    save(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// DELETE /cart
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load(&session).await?;
    cart.clear();
    save(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// GET /cart/checkout
#[instrument(skip(session))]
pub async fn checkout(session: Session) -> Result<Json<CheckoutSummary>> {
    let cart = load(&session).await?;
    let delivery: SelectionStore =
        session_store::load(&session, selection_key(SelectionDomain::Delivery)).await?;
    let customization: SelectionStore =
        session_store::load(&session, selection_key(SelectionDomain::Customization)).await?;

    Ok(Json(CheckoutSummary::compute(&cart, &delivery, &customization)))
}
