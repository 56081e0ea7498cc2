//! REST API access for the storefront.
//!
//! This module provides the `Gateway`, the single path for requests to
//! protected endpoints, and the `CatalogClient` built on top of it for
//! logging in and reading products and categories.
//!
//! The API uses bearer token authentication obtained from `/auth/login`.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::{CatalogClient, Loaded};
pub use error::ApiError;
pub use gateway::{Fetched, Gateway};
