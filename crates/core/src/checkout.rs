//! Checkout summary.

use serde::Serialize;

use crate::cart::Cart;
use crate::selection::SelectionStore;
use crate::types::Price;

/// Totals shown on the checkout summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub cart_subtotal: Price,
    pub delivery_total: Price,
    pub customization_total: Price,
    pub total: Price,
}

impl CheckoutSummary {
    /// Combine the cart with the delivery and customization selections.
    #[must_use]
    pub fn compute(cart: &Cart, delivery: &SelectionStore, customization: &SelectionStore) -> Self {
        let cart_subtotal = cart.subtotal();
        let delivery_total = delivery.total_price();
        let customization_total = customization.total_price();

        Self {
            item_count: cart.item_count(),
            cart_subtotal,
            delivery_total,
            customization_total,
            total: cart_subtotal + delivery_total + customization_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionOption;

    #[test]
    fn test_total_combines_all_stores() {
        let mut cart = Cart::new();
        cart.add("pineapple", "Pineapple", Price::from_units(4000), 2);

        let mut delivery = SelectionStore::new();
        delivery.set_selected("speed", SelectionOption::priced("Express", Price::from_units(1500)));

        let mut customization = SelectionStore::new();
        customization.set_selected(
            "wrap",
            SelectionOption::priced("Gift wrap", Price::from_units(500)),
        );
        customization.set_selected("note", SelectionOption::new("Card", None));

        let summary = CheckoutSummary::compute(&cart, &delivery, &customization);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.cart_subtotal, Price::from_units(8000));
        assert_eq!(summary.delivery_total, Price::from_units(1500));
        assert_eq!(summary.customization_total, Price::from_units(500));
        assert_eq!(summary.total, Price::from_units(10000));
    }

    #[test]
    fn test_empty_checkout_is_zero() {
        let summary =
            CheckoutSummary::compute(&Cart::new(), &SelectionStore::new(), &SelectionStore::new());
        assert_eq!(summary.total, Price::ZERO);
        assert_eq!(summary.item_count, 0);
    }
}
