use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Consider catalog reads stale after 5 minutes.
const CACHE_STALE_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        Utc::now() - self.cached_at > Duration::minutes(CACHE_STALE_MINUTES)
    }
}

/// In-memory cache of catalog reads, keyed by query
/// (`products`, `product/{id}`, `categories`, ...).
///
/// Lives as long as its `CatalogClient`, so it pays off for long-lived
/// library consumers. The one-shot `stackboard` CLI starts empty on every
/// run and never reads the same key twice.
#[derive(Default)]
pub struct CatalogCache {
    entries: Mutex<HashMap<String, CachedData<Value>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh entry for `key`, if one exists and still parses as `T`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().ok()?;
        let cached = entries.get(key)?;
        if cached.is_stale() {
            debug!(key = key, age = %cached.age_display(), "Cache entry stale");
            return None;
        }
        serde_json::from_value(cached.data.clone()).ok()
    }

    pub fn put<T: Serialize>(&self, key: &str, data: &T) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to cache value");
                return;
            }
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), CachedData::new(value));
        }
    }

    /// Age of an entry for display, fresh or not
    pub fn age_display(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).map(CachedData::age_display)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_units() {
        let mut cached = CachedData::new(vec![1]);
        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");
        cached.cached_at = Utc::now() - Duration::minutes(150);
        assert_eq!(cached.age_display(), "2h ago");
        cached.cached_at = Utc::now() - Duration::days(3);
        assert_eq!(cached.age_display(), "3d ago");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(6);
        assert!(old.is_stale());
    }

    #[test]
    fn test_catalog_cache_get_put_clear() {
        let cache = CatalogCache::new();
        assert_eq!(cache.get::<Vec<String>>("categories"), None);

        cache.put("categories", &vec!["beauty".to_string()]);
        assert_eq!(cache.get::<Vec<String>>("categories"), Some(vec!["beauty".to_string()]));
        assert_eq!(cache.age_display("categories").as_deref(), Some("just now"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_catalog_cache_skips_stale_entries() {
        let cache = CatalogCache::new();
        cache.put("products", &vec![1, 2]);
        {
            let mut entries = cache.entries.lock().unwrap();
            let entry = entries.get_mut("products").unwrap();
            entry.cached_at = Utc::now() - Duration::minutes(10);
        }
        assert_eq!(cache.get::<Vec<i32>>("products"), None);
        assert_eq!(cache.len(), 1);
    }
}
