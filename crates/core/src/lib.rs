//! Orchard Core - Shared types library.
//!
//! This crate provides the storefront's domain logic without any I/O:
//! - [`policy`] - Route classification and the request gate decision
//! - [`selection`] - Keyed selection stores with derived totals
//! - [`cart`] and [`wishlist`] - The shopper's other session stores
//! - [`checkout`] - Checkout summary over the stores
//!
//! The HTTP layer (cookies, sessions, redirects) lives in `orchard-storefront`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod policy;
pub mod selection;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartLine};
pub use checkout::CheckoutSummary;
pub use policy::{AccessPolicy, GateDecision, RouteClass, RouteRule};
pub use selection::{SelectionDomain, SelectionOption, SelectionStore};
pub use types::*;
pub use wishlist::{Wishlist, WishlistItem};
