//! REST API test harness.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::{TestResponse, TestServer};
use devcamper_persistence::backends::sqlite::SqliteBackend;
use devcamper_rest::geocoder::{GeocodeError, Geocoder};
use devcamper_rest::models::Location;
use devcamper_rest::{AppState, ServerConfig, bootstrap, create_app_with_state};
use serde_json::{Value, json};

/// Prefix of every API route.
pub const API: &str = "/api/v1";

/// Password used for every account the harness registers.
pub const PASSWORD: &str = "123456";

/// Admin credentials used by [`TestApp::with_admin`].
pub const ADMIN_EMAIL: &str = "admin@devcamper.io";
pub const ADMIN_PASSWORD: &str = "admin-secret";

/// Geocoder resolving every address to the same Boston location.
///
/// Addresses containing `nowhere` have no match.
pub struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        if address.contains("nowhere") {
            return Err(GeocodeError::NoMatch(address.to_string()));
        }
        Ok(Location::point(
            42.35,
            -71.06,
            "233 Bay State Rd",
            "Boston",
            "MA",
            "02215",
            "US",
        ))
    }
}

/// A running test server and the backend behind it.
pub struct TestApp {
    pub server: TestServer,
    pub backend: Arc<SqliteBackend>,
}

impl TestApp {
    /// Server with test configuration and the fixed geocoder.
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::for_testing()).await
    }

    /// Server with a bootstrap admin account.
    pub async fn with_admin() -> Self {
        Self::with_config(ServerConfig {
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            ..ServerConfig::for_testing()
        })
        .await
    }

    /// Server with custom configuration and the fixed geocoder.
    pub async fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        let backend = Arc::new(backend);

        let state =
            AppState::new(Arc::clone(&backend), config).with_geocoder(Arc::new(FixedGeocoder));
        bootstrap::ensure_indexes(&state)
            .await
            .expect("Failed to install unique indexes");
        bootstrap::ensure_admin(&state)
            .await
            .expect("Failed to create bootstrap admin");

        let server = TestServer::new(create_app_with_state(state)).expect("Failed to create test server");
        Self { server, backend }
    }

    /// Registers an account and returns its session token.
    pub async fn register(&self, name: &str, email: &str, role: &str) -> String {
        let response = self
            .server
            .post(&format!("{API}/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": PASSWORD,
                "role": role
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        token_of(&response)
    }

    /// Logs in and returns the session token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post(&format!("{API}/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .await;
        response.assert_status_ok();
        token_of(&response)
    }

    /// Logs in as the bootstrap admin.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Returns the id of the account behind `token`.
    pub async fn user_id(&self, token: &str) -> String {
        let (name, value) = bearer(token);
        let response = self
            .server
            .get(&format!("{API}/auth/me"))
            .add_header(name, value)
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["id"]
            .as_str()
            .expect("user id")
            .to_string()
    }

    /// Creates a bootcamp and returns its data.
    pub async fn create_bootcamp(&self, token: &str, body: Value) -> Value {
        let (name, value) = bearer(token);
        let response = self
            .server
            .post(&format!("{API}/bootcamps"))
            .add_header(name, value)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    /// Adds a course to a bootcamp and returns its data.
    pub async fn create_course(&self, token: &str, bootcamp_id: &str, body: Value) -> Value {
        let (name, value) = bearer(token);
        let response = self
            .server
            .post(&format!("{API}/bootcamps/{bootcamp_id}/courses"))
            .add_header(name, value)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    /// Adds a review to a bootcamp and returns its data.
    pub async fn create_review(&self, token: &str, bootcamp_id: &str, body: Value) -> Value {
        let (name, value) = bearer(token);
        let response = self
            .server
            .post(&format!("{API}/bootcamps/{bootcamp_id}/reviews"))
            .add_header(name, value)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    /// Fetches a bootcamp's current data.
    pub async fn bootcamp(&self, id: &str) -> Value {
        let response = self.server.get(&format!("{API}/bootcamps/{id}")).await;
        response.assert_status_ok();
        response.json::<Value>()["data"].clone()
    }
}

/// `Authorization: Bearer <token>` header.
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    )
}

/// Extracts the token from a token response body.
pub fn token_of(response: &TestResponse) -> String {
    response.json::<Value>()["token"]
        .as_str()
        .expect("token in response")
        .to_string()
}

/// Asserts a failure envelope with `status` and `message`.
pub fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], message);
    assert_eq!(body["data"], Value::Null);
}

/// Returns the `data` array of a list response.
pub fn list_data(response: &TestResponse) -> Vec<Value> {
    response.assert_status_ok();
    response.json::<Value>()["data"]
        .as_array()
        .expect("data array")
        .clone()
}
