//! The authenticated request gateway.
//!
//! Every call to a protected endpoint goes through `Gateway::fetch`, which
//! attaches the stored bearer token and ends the session when the API
//! answers 401.

use std::sync::Arc;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, error, warn};

use crate::auth::{LoginNavigator, SessionStore};

use super::ApiError;

/// Result of a gateway call that reached the server
#[derive(Debug)]
pub enum Fetched {
    /// Any status other than 401, untouched
    Response(Response),
    /// The server rejected the token; the session is gone and the
    /// navigator has been sent to login
    AuthRequired,
}

impl Fetched {
    pub fn into_response(self) -> Option<Response> {
        match self {
            Fetched::Response(response) => Some(response),
            Fetched::AuthRequired => None,
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Fetched::AuthRequired)
    }
}

/// Clone is cheap - the HTTP client and session are shared.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    session: Arc<SessionStore>,
    navigator: Arc<dyn LoginNavigator>,
}

impl Gateway {
    pub fn new(client: Client, session: Arc<SessionStore>, navigator: Arc<dyn LoginNavigator>) -> Self {
        Self {
            client,
            session,
            navigator,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &dyn LoginNavigator {
        self.navigator.as_ref()
    }

    /// Start a request on the shared client, to be sent with `fetch`
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a caller-built request with the session's bearer credential.
    ///
    /// A caller-supplied Authorization header is replaced when a token is
    /// stored. Transport failures are returned as `ApiError::Network`.
    pub async fn fetch(&self, request: RequestBuilder) -> Result<Fetched, ApiError> {
        let state = self.session.get_state();

        let (client, request) = request.build_split();
        let mut request = request?;

        if let Some(token) = state.access_token.filter(|t| !t.is_empty()) {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers_mut().insert(header::AUTHORIZATION, value);
                }
                // Unusable token counts as no token
                Err(_) => warn!("Stored token is not a valid header value, sending without credentials"),
            }
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(method = %method, url = %url, "Sending request");

        let response = client.execute(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(method = %method, url = %url, "Unauthorized, ending session");
            if let Err(e) = self.session.clear_session() {
                error!(error = %e, "Failed to clear session");
            }
            self.navigator.redirect_to_login();
            return Ok(Fetched::AuthRequired);
        }

        Ok(Fetched::Response(response))
    }

    pub async fn get(&self, url: &str) -> Result<Fetched, ApiError> {
        self.fetch(self.request(Method::GET, url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{KeyValueStore, MemoryStore, RecordingNavigator, ACCESS_TOKEN_KEY};
    use serde_json::json;
    use wiremock::matchers::{header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway() -> (Gateway, Arc<SessionStore>, Arc<RecordingNavigator>) {
        let session = Arc::new(SessionStore::new(MemoryStore::new()));
        let navigator = Arc::new(RecordingNavigator::new());
        let gateway = Gateway::new(Client::new(), session.clone(), navigator.clone());
        (gateway, session, navigator)
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header_is("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, session, _) = gateway();
        session.set_session("abc123", &json!({"id": 1, "name": "Sam"})).unwrap();
        assert!(session.is_authenticated());

        let fetched = gateway.get(&format!("{}/products", server.uri())).await.unwrap();
        let response = fetched.into_response().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_token_sends_no_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _, _) = gateway();
        gateway.get(&format!("{}/products", server.uri())).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_success_returns_body_and_keeps_session() {
        let server = MockServer::start().await;
        let body = r#"{"products":[],"total":0}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let (gateway, session, navigator) = gateway();
        session.set_session("abc123", &json!({"id": 1})).unwrap();
        let before = session.get_state();

        let response = gateway
            .get(&format!("{}/products", server.uri()))
            .await
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.text().await.unwrap(), body);
        assert_eq!(session.get_state(), before);
        assert!(!navigator.was_redirected());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_redirects_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Token Expired!"}"#))
            .mount(&server)
            .await;

        let (gateway, session, navigator) = gateway();
        session.set_session("abc123", &json!({"id": 1})).unwrap();

        let fetched = gateway.get(&format!("{}/products", server.uri())).await.unwrap();
        assert!(fetched.is_auth_required());
        assert!(!session.is_authenticated());
        assert_eq!(session.get_state().access_token, None);
        assert_eq!(session.get_state().user, None);
        assert_eq!(navigator.redirect_count(), 1);

        // A second rejected call redirects again, clearing is a no-op
        gateway.get(&format!("{}/products", server.uri())).await.unwrap();
        assert_eq!(navigator.redirect_count(), 2);
    }

    #[tokio::test]
    async fn test_other_errors_are_returned_as_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let (gateway, session, navigator) = gateway();
        session.set_session("abc123", &json!({"id": 1})).unwrap();

        let response = gateway
            .get(&format!("{}/products/1", server.uri()))
            .await
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(session.is_authenticated());
        assert!(!navigator.was_redirected());
    }

    #[tokio::test]
    async fn test_caller_options_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/carts/add"))
            .and(header_is("x-client", "cli"))
            .and(header_is("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, session, _) = gateway();
        session.set_session("abc123", &json!({"id": 1})).unwrap();

        let request = gateway
            .request(Method::POST, &format!("{}/carts/add", server.uri()))
            .header("x-client", "cli")
            .header(header::AUTHORIZATION, "Bearer stale")
            .json(&json!({"userId": 1}));
        let response = gateway.fetch(request).await.unwrap().into_response().unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, json!({"userId": 1}));
    }

    #[tokio::test]
    async fn test_malformed_stored_token_is_sent_as_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let storage = MemoryStore::new();
        storage.set_item(ACCESS_TOKEN_KEY, "abc\n123").unwrap();
        let session = Arc::new(SessionStore::new(storage));
        let navigator = Arc::new(RecordingNavigator::new());
        let gateway = Gateway::new(Client::new(), session.clone(), navigator.clone());

        assert!(!session.is_authenticated());
        let fetched = gateway.get(&format!("{}/products", server.uri())).await.unwrap();
        assert_eq!(fetched.into_response().unwrap().status(), StatusCode::OK);

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
        assert!(!navigator.was_redirected());
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let (gateway, session, navigator) = gateway();
        session.set_session("abc123", &json!({"id": 1})).unwrap();

        // Nothing listens on port 1
        let result = gateway.get("http://127.0.0.1:1/products").await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert!(session.is_authenticated());
        assert!(!navigator.was_redirected());
    }
}
