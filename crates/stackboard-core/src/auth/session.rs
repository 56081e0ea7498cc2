use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::storage::KeyValueStore;

/// Storage key holding the raw bearer token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key holding the serialized user profile
pub const USER_KEY: &str = "user";

/// Snapshot of the stored session.
///
/// The token and profile are stored independently; either may be present
/// without the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub user: Option<Value>,
}

impl SessionState {
    /// Display name from the profile, if it carries one
    pub fn display_name(&self) -> Option<String> {
        let user = self.user.as_ref()?;
        let first = user.get("firstName").and_then(Value::as_str);
        let last = user.get("lastName").and_then(Value::as_str);
        match (first, last) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => user
                .get("username")
                .or_else(|| user.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// The single shared authentication session.
///
/// Share it with `Arc<SessionStore>` between the gateway, guards and
/// anything else that needs the token.
pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Read the current session. Unreadable or malformed entries read as absent.
    pub fn get_state(&self) -> SessionState {
        let access_token = self.read(ACCESS_TOKEN_KEY).and_then(|token| {
            if is_header_safe(&token) {
                Some(token)
            } else {
                warn!("Stored access token cannot be sent as a header, ignoring");
                None
            }
        });
        let user = self.read(USER_KEY).and_then(|raw| {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(error = %e, "Stored user profile is not valid JSON, ignoring");
                    None
                }
            }
        });

        SessionState { access_token, user }
    }

    /// True iff a non-empty token is stored
    pub fn is_authenticated(&self) -> bool {
        self.get_state()
            .access_token
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    /// Replace the stored session after a successful login
    pub fn set_session(&self, access_token: &str, user: &Value) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        self.storage.set_item(ACCESS_TOKEN_KEY, access_token)?;
        self.storage.set_item(USER_KEY, &serialized)?;
        info!("Session stored");
        Ok(())
    }

    /// Remove the token and profile. Safe to call with no session.
    pub fn clear_session(&self) -> Result<()> {
        self.storage.remove_item(ACCESS_TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read session storage, treating as absent");
                None
            }
        }
    }
}

/// Whether `Bearer <token>` is a legal header value: visible ASCII,
/// spaces and tabs only.
fn is_header_safe(token: &str) -> bool {
    token
        .bytes()
        .all(|b| b == b'\t' || (b' '..=b'~').contains(&b))
}
