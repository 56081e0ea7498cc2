//! Authentication module for the storefront session.
//!
//! This module provides:
//! - `SessionStore`: the persisted bearer token and user profile
//! - `KeyValueStore`: string storage backends (`FileStore`, `MemoryStore`)
//! - `require_auth`: the route guard run before protected views
//! - `CredentialStore`: optional OS-level password storage via keyring
//!
//! Sessions have no expiry timer. A token is only found to be stale when
//! the API rejects it with a 401.

pub mod credentials;
pub mod guard;
pub mod session;
pub mod storage;

pub use credentials::CredentialStore;
pub use guard::{require_auth, Guard, LoginNavigator, RecordingNavigator};
pub use session::{SessionState, SessionStore, ACCESS_TOKEN_KEY, USER_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
