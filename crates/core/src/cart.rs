//! Shopping cart.
//!
//! Lines are keyed by product handle. Adding a handle that is already in the
//! cart increases its quantity; a quantity of zero removes the line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub label: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<String, CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product.
    ///
    /// The label and unit price are refreshed from the latest add. Adding a
    /// quantity of zero is a no-op.
    pub fn add(
        &mut self,
        handle: impl Into<String>,
        label: impl Into<String>,
        unit_price: Price,
        quantity: u32,
    ) {
        if quantity == 0 {
            return;
        }
        let label = label.into();
        self.lines
            .entry(handle.into())
            .and_modify(|line| {
                line.quantity = line.quantity.saturating_add(quantity);
                line.label.clone_from(&label);
                line.unit_price = unit_price;
            })
            .or_insert_with(|| CartLine {
                label: label.clone(),
                unit_price,
                quantity,
            });
    }

    /// Set the quantity for a line already in the cart.
    ///
    /// Returns `false` if the handle is not in the cart.
    pub fn set_quantity(&mut self, handle: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.lines.remove(handle).is_some();
        }
        match self.lines.get_mut(handle) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove(&mut self, handle: &str) -> bool {
        self.lines.remove(handle).is_some()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.values().map(CartLine::line_price).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn get(&self, handle: &str) -> Option<&CartLine> {
        self.lines.get(handle)
    }

    pub fn lines(&self) -> impl Iterator<Item = (&str, &CartLine)> {
        self.lines.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
