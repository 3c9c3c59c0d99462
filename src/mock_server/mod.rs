//! Mock Pterodactyl panel for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the panel
//! for integration and end-to-end testing. Unlike wiremock which mocks at the
//! HTTP level per-test, this server maintains state across requests and
//! serves collections in pages linked by absolute `next` URLs, enabling
//! realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use pteroapi::mock_server::MockServer;
//! use pteroapi::{ApplicationScope, List, User};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let admin = ApplicationScope::new(server.url(), "test-token").unwrap();
//!
//!     // Server comes with default fixtures
//!     let users = User::list(&admin, &()).await.unwrap();
//!     assert_eq!(users[0].username, "admin");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, DEFAULT_PER_PAGE};
