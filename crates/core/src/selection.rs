//! Selection stores.
//!
//! A [`SelectionStore`] holds at most one chosen option per selection type
//! (e.g. `"speed"` → Express). The total price is always derived from the
//! current entries; nothing caches it.

use std::collections::BTreeMap;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// A chosen option within one selection type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub label: String,
    /// Absent prices count as zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl SelectionOption {
    #[must_use]
    pub fn new(label: impl Into<String>, price: Option<Price>) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }

    #[must_use]
    pub fn priced(label: impl Into<String>, price: Price) -> Self {
        Self::new(label, Some(price))
    }

    /// Price with the zero default applied.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.price.unwrap_or(Price::ZERO)
    }
}

/// Current selections, keyed by selection type.
///
/// Any string is accepted as a type key and any price (including negative)
/// is accepted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionStore {
    entries: BTreeMap<String, SelectionOption>,
}

impl SelectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `option` for `selection_type`, replacing any earlier choice.
    pub fn set_selected(&mut self, selection_type: impl Into<String>, option: SelectionOption) {
        self.entries.insert(selection_type.into(), option);
    }

    /// Sum of the selected options' prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.entries
            .values()
            .map(SelectionOption::effective_price)
            .sum()
    }

    /// Drop every selection.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn get(&self, selection_type: &str) -> Option<&SelectionOption> {
        self.entries.get(selection_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectionOption)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The storefront's selection domains, each backed by its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionDomain {
    /// Delivery method and related options.
    Delivery,
    /// Product customization (engraving, gift wrap, ...).
    Customization,
}

impl SelectionDomain {
    pub const ALL: [Self; 2] = [Self::Delivery, Self::Customization];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Customization => "customization",
        }
    }
}

impl fmt::Display for SelectionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "customization" => Ok(Self::Customization),
            _ => Err(format!("unknown selection domain: {s}")),
        }
    }
}
