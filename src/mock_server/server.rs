//! Mock Pterodactyl panel server.
//!
//! Provides an axum-based HTTP server that simulates the panel API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Pterodactyl panel for testing.
///
/// The server runs in the background and can be used to test both scopes
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(mut state: MockState) -> Self {
        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");
        let url = format!("http://{}", addr);

        state.base_url = url.clone();
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url,
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a scope for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new().with_account(scenario.account);

        for user in scenario.users {
            state = state.with_user(user);
        }

        for location in scenario.locations {
            state = state.with_location(location);
        }

        for server in scenario.servers {
            state = state.with_server(server);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Application: users
            .route(
                "/api/application/users",
                get(handlers::list_users).post(handlers::create_user),
            )
            .route(
                "/api/application/users/:id",
                get(handlers::get_user)
                    .patch(handlers::update_user)
                    .delete(handlers::delete_user),
            )
            .route(
                "/api/application/users/external/:external_id",
                get(handlers::get_user_by_external_id),
            )
            // Application: locations
            .route(
                "/api/application/locations",
                get(handlers::list_locations).post(handlers::create_location),
            )
            .route(
                "/api/application/locations/:id",
                get(handlers::get_location)
                    .patch(handlers::update_location)
                    .delete(handlers::delete_location),
            )
            // Application: servers
            .route("/api/application/servers", get(handlers::list_servers))
            .route(
                "/api/application/servers/:id",
                get(handlers::get_server).delete(handlers::delete_server),
            )
            .route(
                "/api/application/servers/:id/suspend",
                post(handlers::suspend_server),
            )
            .route(
                "/api/application/servers/:id/unsuspend",
                post(handlers::unsuspend_server),
            )
            // Client
            .route("/api/client", get(handlers::list_client_servers))
            .route("/api/client/", get(handlers::list_client_servers))
            .route("/api/client/account", get(handlers::get_account))
            .route(
                "/api/client/servers/:identifier",
                get(handlers::get_client_server),
            )
            .route(
                "/api/client/servers/:identifier/utilization",
                get(handlers::server_utilization),
            )
            .route(
                "/api/client/servers/:identifier/power",
                post(handlers::send_power),
            )
            .route(
                "/api/client/servers/:identifier/command",
                post(handlers::send_command),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApplicationScope, ClientScope, Get, List, PteroError, User};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_user_with_application_scope() {
        let server = MockServer::start().await;
        let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

        let user = User::get(&admin, 2).await.expect("Failed to get user");

        assert_eq!(user.username, "alice");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_account_with_client_scope() {
        let server = MockServer::start().await;
        let client = ClientScope::new(server.url(), "test-token").unwrap();

        let account = client.account().await.expect("Failed to get account");

        assert_eq!(account.username, "admin");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

        let result = User::get(&admin, 1).await;

        assert!(matches!(result, Err(ref e) if e.is_not_found()));

        let users = User::list(&admin, &()).await.unwrap();
        assert!(users.is_empty());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_token_required() {
        let state = MockState::new()
            .with_token("right")
            .with_user(Fixtures::user(1, "alice"));
        let server = MockServer::with_state(state).await;
        let admin = ApplicationScope::new(server.url(), "wrong").unwrap();

        let err = User::get(&admin, 1).await.unwrap_err();

        match err {
            PteroError::Api { status_code, error } => {
                assert_eq!(status_code, 401);
                assert_eq!(error.code, "AuthenticationException");
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        server.shutdown().await;
    }
}
