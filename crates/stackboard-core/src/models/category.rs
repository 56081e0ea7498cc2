use serde::{Deserialize, Serialize};

/// A product category as listed by `/products/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub url: String,
}
