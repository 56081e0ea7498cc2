//! Data models for storefront entities.
//!
//! This module contains the data structures returned by the product API:
//!
//! - `Product`, `Review`, `ProductsResponse`: the catalog and its listings
//! - `Category`: navigation entries for browsing by category
//! - `LoginRequest`, `LoginResponse`: the `/auth/login` exchange

pub mod category;
pub mod product;
pub mod user;

pub use category::Category;
pub use product::{Dimensions, Product, ProductMeta, ProductsResponse, Review};
pub use user::{LoginRequest, LoginResponse};
