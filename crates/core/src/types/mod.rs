//! Core value types for Orchard.

pub mod credential;
pub mod price;

pub use credential::{CredentialKind, HeldCredentials, Principal, UnknownCredentialKind};
pub use price::Price;
