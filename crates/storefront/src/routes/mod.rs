//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Health check
//!
//! # Credentials
//! GET    /login                          - User login descriptor
//! GET    /admin/login                    - Admin login descriptor
//! POST   /api/login                      - Issue user credential (rate limited)
//! POST   /api/admin/login                - Issue admin credential (rate limited)
//! POST   /api/logout                     - Revoke user credential
//! POST   /api/admin/logout               - Revoke admin credential
//!
//! # Gated (see the access policy)
//! GET    /account                        - Signed-in shopper (user)
//! GET    /admin                          - Dashboard (admin)
//! GET    /cart                           - Cart view (user)
//! POST   /cart/items                     - Add to cart (user)
//! PATCH  /cart/items/{handle}            - Set quantity, 0 removes (user)
//! DELETE /cart/items/{handle}            - Remove line (user)
//! DELETE /cart                           - Clear cart (user)
//! GET    /cart/checkout                  - Checkout summary (user)
//!
//! # Session stores
//! GET    /api/selections/{domain}        - Selection store view
//! PUT    /api/selections/{domain}/{type} - Choose an option
//! DELETE /api/selections/{domain}        - Reset the store
//! GET    /api/wishlist                   - Wishlist view
//! POST   /api/wishlist                   - Save a product
//! POST   /api/wishlist/toggle            - Flip membership
//! DELETE /api/wishlist/{handle}          - Remove a product
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod selections;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use orchard_core::Price;

use crate::error::{AppError, Result};
use crate::middleware::login_rate_limiter;
use crate::models::MAX_STORE_ENTRIES;
use crate::state::AppState;

/// Reject client prices outside `-Price::LIMIT..=Price::LIMIT`.
pub(crate) fn ensure_price_in_range(price: Price) -> Result<()> {
    if price.within_limit() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "price must not exceed {} in magnitude",
            Price::LIMIT
        )))
    }
}

/// Reject adding a new entry to a store that is already full.
pub(crate) fn ensure_room(len: usize, is_new_entry: bool) -> Result<()> {
    if is_new_entry && len >= MAX_STORE_ENTRIES {
        Err(AppError::BadRequest(format!(
            "store is limited to {MAX_STORE_ENTRIES} entries"
        )))
    } else {
        Ok(())
    }
}

/// Login and logout endpoints.
pub fn auth_routes() -> Router<AppState> {
    let login = Router::new()
        .route("/api/login", post(auth::user_login))
        .route("/api/admin/login", post(auth::admin_login))
        .layer(login_rate_limiter());

    Router::new()
        .route("/login", get(auth::user_login_page))
        .route("/admin/login", get(auth::admin_login_page))
        .route("/api/logout", post(auth::user_logout))
        .route("/api/admin/logout", post(auth::admin_logout))
        .merge(login)
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{handle}", patch(cart::update).delete(cart::remove))
        .route("/checkout", get(cart::checkout))
}

/// Selection store and wishlist routes.
pub fn store_api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/selections/{domain}",
            get(selections::show).delete(selections::reset),
        )
        .route("/selections/{domain}/{selection_type}", put(selections::select))
        .route("/wishlist", get(wishlist::show).post(wishlist::add))
        .route("/wishlist/toggle", post(wishlist::toggle))
        .route("/wishlist/{handle}", delete(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .route("/account", get(account::show))
        .route("/admin", get(admin::dashboard))
        .nest("/cart", cart_routes())
        .nest("/api", store_api_routes())
}
