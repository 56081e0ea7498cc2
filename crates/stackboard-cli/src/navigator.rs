use std::sync::atomic::{AtomicBool, Ordering};

use stackboard_core::auth::LoginNavigator;

/// Points the user at the `login` command. Only the first redirect of a
/// run prints the notice.
#[derive(Debug, Default)]
pub struct CliNavigator {
    redirected: AtomicBool,
}

impl CliNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }
}

impl LoginNavigator for CliNavigator {
    fn redirect_to_login(&self) {
        if !self.redirected.swap(true, Ordering::SeqCst) {
            eprintln!("You are not logged in or your session has expired.");
            eprintln!("Run `stackboard login` to sign in.");
        }
    }
}
