//! Session-scoped stores.
//!
//! Each shopper session carries its own cart, wishlist and selection stores.
//! Handlers load a store, mutate it, and write it back.

use orchard_core::SelectionDomain;
use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

/// Most entries a single store may hold.
pub const MAX_STORE_ENTRIES: usize = 100;

/// Session keys for the stores.
pub mod keys {
    /// Subject of the user credential that last signed in on this session.
    pub const OWNER: &str = "owner";

    /// Key for the cart.
    pub const CART: &str = "cart";

    /// Key for the wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the delivery selection store.
    pub const DELIVERY: &str = "selection.delivery";

    /// Key for the customization selection store.
    pub const CUSTOMIZATION: &str = "selection.customization";
}

/// Session key holding a selection domain's store.
#[must_use]
pub const fn selection_key(domain: SelectionDomain) -> &'static str {
    match domain {
        SelectionDomain::Delivery => keys::DELIVERY,
        SelectionDomain::Customization => keys::CUSTOMIZATION,
    }
}

/// Load a store from the session, starting empty if it was never written.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load<T>(session: &Session, key: &str) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}

/// Write a store back to the session.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save<T>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + Send + Sync,
{
    session.insert(key, value).await
}
