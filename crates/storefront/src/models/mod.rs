//! Domain models for storefront.

pub mod session;

pub use session::{MAX_STORE_ENTRIES, keys as session_keys, selection_key};
