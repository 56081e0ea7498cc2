use serde::{Deserialize, Serialize};

/// Token lifetime requested at login, in minutes
pub const DEFAULT_EXPIRES_IN_MINS: u32 = 30;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "expiresInMins", skip_serializing_if = "Option::is_none")]
    pub expires_in_mins: Option<u32>,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            expires_in_mins: Some(DEFAULT_EXPIRES_IN_MINS),
        }
    }
}

/// Successful login: the issued token plus whatever profile fields the
/// server sent.
///
/// Only `accessToken` is required. The full JSON body is what gets stored
/// as the session's user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl LoginResponse {
    /// A response carrying nothing but the token
    pub fn from_token(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Full name, else username, else the name used to sign in
    pub fn display_name(&self, fallback: &str) -> String {
        let name = self.full_name();
        if !name.is_empty() {
            name
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            fallback.to_string()
        }
    }
}
