//! HTTP request handlers for the mock server.

pub mod account;
pub mod locations;
pub mod servers;
pub mod users;

pub use account::*;
pub use locations::*;
pub use servers::*;
pub use users::*;

use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::Wrapped;

/// State handle shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Query parameters accepted by collection and resource endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    /// Comma separated relationships to load.
    pub include: Option<String>,
}

impl PageQuery {
    /// Page number, defaulting to the first.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Whether `relationship` was requested with `include`.
    pub fn includes(&self, relationship: &str) -> bool {
        self.include
            .as_deref()
            .is_some_and(|inc| inc.split(',').any(|r| r.trim() == relationship))
    }
}

/// Build a panel error envelope with a single entry.
pub fn error_response(status: StatusCode, code: &str, detail: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "errors": [{
                "code": code,
                "status": status.as_u16().to_string(),
                "detail": detail,
            }]
        })),
    )
        .into_response()
}

/// 404 in the panel's error format.
pub fn not_found(what: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NotFoundHttpException",
        &format!("The requested {what} could not be found on the server."),
    )
}

/// Reject requests whose bearer token does not match the configured one.
pub fn check_token(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if state.authorized(header) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            "AuthenticationException",
            "Unauthenticated.",
        ))
    }
}

/// Wrap a single resource in its `attributes` envelope.
pub fn wrapped<T: Serialize>(object: &str, attributes: T) -> Response {
    (
        StatusCode::OK,
        Json(Wrapped {
            object: Some(object.to_string()),
            attributes,
        }),
    )
        .into_response()
}

/// A successful response with no body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_includes() {
        let query = PageQuery {
            page: None,
            include: Some("allocations, user".to_string()),
        };
        assert!(query.includes("allocations"));
        assert!(query.includes("user"));
        assert!(!query.includes("node"));
        assert_eq!(query.page(), 1);

        assert!(!PageQuery::default().includes("allocations"));
    }
}
