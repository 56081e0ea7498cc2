//! Stackboard core - session, authenticated gateway and catalog client.
//!
//! The `SessionStore` keeps the bearer token and user profile, the
//! `Gateway` sends every protected request with that token and ends the
//! session on a 401, and the `CatalogClient` reads products and categories
//! through the gateway.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;
