/// Format a price in dollars with two decimals
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Rating as one decimal plus a five-star bar, e.g. `4.5 ★★★★☆`
pub fn format_rating(rating: f64) -> String {
    let clamped = rating.clamp(0.0, 5.0);
    let filled = clamped.round() as usize;
    format!("{:.1} {}{}", clamped, "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        // Keep the YYYY-MM-DD prefix
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}
