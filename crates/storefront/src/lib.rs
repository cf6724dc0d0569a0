//! Orchard storefront library.
//!
//! The server binary is a thin wrapper around [`app::router`]; everything is
//! exposed here so the integration tests can run the same stack in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
