//! Typed client for the storefront product API.
//!
//! `CatalogClient` logs in, then reads products and categories through the
//! authenticated `Gateway`. Reads are guarded: without a stored token they
//! return `Loaded::AuthRequired` and never touch the network.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{require_auth, Guard, LoginNavigator, SessionStore};
use crate::cache::CatalogCache;
use crate::config::Config;
use crate::models::{Category, LoginRequest, LoginResponse, Product, ProductsResponse};

use super::gateway::{Fetched, Gateway};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Outcome of a guarded catalog read
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Data(T),
    /// No session, or the API rejected it. The navigator was already
    /// sent to login.
    AuthRequired,
}

impl<T> Loaded<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Loaded::Data(data) => Some(data),
            Loaded::AuthRequired => None,
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Loaded::AuthRequired)
    }
}

pub struct CatalogClient {
    gateway: Gateway,
    base_url: String,
    cache: CatalogCache,
    expires_in_mins: Option<u32>,
    initial_backoff: Duration,
}

impl CatalogClient {
    pub fn new(gateway: Gateway, base_url: &str) -> Self {
        Self {
            gateway,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: CatalogCache::new(),
            expires_in_mins: None,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }

    /// Build the HTTP client, gateway and catalog client from configuration
    pub fn from_config(
        config: &Config,
        session: Arc<SessionStore>,
        navigator: Arc<dyn LoginNavigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;
        let gateway = Gateway::new(client, session, navigator);

        let mut catalog = Self::new(gateway, &config.api_base_url());
        catalog.expires_in_mins = config.session_expires_in_mins;
        Ok(catalog)
    }

    /// Override the token lifetime requested at login
    pub fn with_expires_in_mins(mut self, minutes: u32) -> Self {
        self.expires_in_mins = Some(minutes);
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.gateway.session()
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ===== Session =====

    /// Exchange credentials for a token and store the session.
    ///
    /// The login call itself carries no bearer credential.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let mut body = LoginRequest::new(username, password);
        if let Some(minutes) = self.expires_in_mins {
            body.expires_in_mins = Some(minutes);
        }

        let response = self
            .gateway
            .client()
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Login rejected");
            return Err(ApiError::LoginFailed(Self::login_failure_message(status, &text)).into());
        }

        let profile: Value = response.json().await.context("Failed to parse login response")?;
        let token = profile
            .get("accessToken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("Login response has no accessToken".to_string()))?
            .to_string();

        // Profile fields are informational; odd shapes never block the login
        let login = serde_json::from_value::<LoginResponse>(profile.clone()).unwrap_or_else(|e| {
            debug!(error = %e, "Login profile does not match the expected shape");
            LoginResponse::from_token(&token)
        });

        self.cache.clear();
        self.session().set_session(&token, &profile)?;
        info!(username = %username, "Login successful");

        Ok(login)
    }

    fn login_failure_message(status: reqwest::StatusCode, body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("status {}", status))
    }

    /// End the session and drop cached catalog data
    pub fn logout(&self) -> Result<()> {
        self.cache.clear();
        self.session().clear_session()?;
        info!("Logged out");
        Ok(())
    }

    // ===== Catalog =====

    pub async fn products(&self) -> Result<Loaded<ProductsResponse>> {
        self.get_json("products", "/products").await
    }

    pub async fn products_by_category(&self, slug: &str) -> Result<Loaded<ProductsResponse>> {
        let path = format!("/products/category/{}", slug);
        self.get_json(&path[1..], &path).await
    }

    pub async fn product(&self, id: i64) -> Result<Loaded<Product>> {
        self.get_json(&format!("product/{}", id), &format!("/products/{}", id))
            .await
    }

    pub async fn categories(&self) -> Result<Loaded<Vec<Category>>> {
        self.get_json("categories", "/products/categories").await
    }

    async fn get_json<T: DeserializeOwned + Serialize>(&self, key: &str, path: &str) -> Result<Loaded<T>> {
        if require_auth(self.session(), self.gateway.navigator()) == Guard::AuthRequired {
            return Ok(Loaded::AuthRequired);
        }

        if let Some(cached) = self.cache.get::<T>(key) {
            debug!(key = key, "Serving from cache");
            return Ok(Loaded::Data(cached));
        }

        let url = format!("{}{}", self.base_url, path);
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        let response = loop {
            let response = match self.gateway.get(&url).await? {
                Fetched::Response(response) => response,
                Fetched::AuthRequired => {
                    self.cache.clear();
                    return Ok(Loaded::AuthRequired);
                }
            };

            if response.status().as_u16() != 429 {
                break response;
            }

            retries += 1;
            if retries > MAX_RATE_LIMIT_RETRIES {
                return Err(ApiError::RateLimited.into());
            }
            warn!(url = %url, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        };

        let response = Self::check_response(response).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        let data: T = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        self.cache.put(key, &data);
        Ok(Loaded::Data(data))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}
