use serde::{Deserialize, Serialize};

/// Paged product listing from `/products` and `/products/category/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(rename = "discountPercentage", default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,
    #[serde(rename = "warrantyInformation")]
    pub warranty_information: Option<String>,
    #[serde(rename = "shippingInformation")]
    pub shipping_information: Option<String>,
    #[serde(rename = "availabilityStatus")]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(rename = "returnPolicy")]
    pub return_policy: Option<String>,
    #[serde(rename = "minimumOrderQuantity")]
    pub minimum_order_quantity: Option<i64>,
    pub meta: Option<ProductMeta>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
}

impl Product {
    /// Price after the listed discount
    pub fn discounted_price(&self) -> f64 {
        self.price - (self.price * self.discount_percentage) / 100.0
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn stock_display(&self) -> String {
        if self.in_stock() {
            format!("{} in stock", self.stock)
        } else {
            "Out of stock".to_string()
        }
    }

    /// Mean of the review ratings, or the listed rating when there are none
    pub fn average_review_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return self.rating;
        }
        let sum: f64 = self.reviews.iter().map(|r| r.rating as f64).sum();
        sum / self.reviews.len() as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMeta {
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    pub barcode: Option<String>,
    #[serde(rename = "qrCode")]
    pub qr_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "reviewerName", default)]
    pub reviewer_name: String,
    #[serde(rename = "reviewerEmail", default)]
    pub reviewer_email: String,
}
