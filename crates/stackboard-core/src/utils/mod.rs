//! Utility functions for formatting catalog values.

pub mod format;

pub use format::{format_date, format_price, format_rating, truncate_string};
