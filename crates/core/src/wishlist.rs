//! Wishlist.
//!
//! Unlike the other stores the wishlist has no reset: entries only leave it
//! through [`Wishlist::remove`] or [`Wishlist::toggle`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: BTreeMap<String, WishlistItem>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a product, replacing any earlier entry for the handle.
    pub fn add(&mut self, handle: impl Into<String>, item: WishlistItem) {
        self.items.insert(handle.into(), item);
    }

    /// Remove a product. Returns whether it was saved.
    pub fn remove(&mut self, handle: &str) -> bool {
        self.items.remove(handle).is_some()
    }

    /// Flip membership and return whether the product is now saved.
    pub fn toggle(&mut self, handle: impl Into<String>, item: WishlistItem) -> bool {
        let handle = handle.into();
        if self.items.remove(&handle).is_some() {
            false
        } else {
            self.items.insert(handle, item);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, handle: &str) -> bool {
        self.items.contains_key(handle)
    }

    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items
            .values()
            .map(|item| item.price.unwrap_or(Price::ZERO))
            .sum()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &WishlistItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
