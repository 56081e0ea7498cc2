use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::SessionStore;

/// Sends the user back to the login entry point.
///
/// Called when a view is opened without a session and when the API
/// rejects the stored token.
pub trait LoginNavigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator that only counts redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn was_redirected(&self) -> bool {
        self.redirect_count() > 0
    }
}

impl LoginNavigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Outcome of a route guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allowed,
    AuthRequired,
}

impl Guard {
    pub fn is_allowed(self) -> bool {
        self == Guard::Allowed
    }
}

/// Pre-render check for protected views. Never touches the network.
pub fn require_auth(store: &SessionStore, navigator: &dyn LoginNavigator) -> Guard {
    if store.is_authenticated() {
        Guard::Allowed
    } else {
        debug!("No session, redirecting to login");
        navigator.redirect_to_login();
        Guard::AuthRequired
    }
}
