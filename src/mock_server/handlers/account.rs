//! Account endpoint handlers.

use axum::{extract::State, http::HeaderMap, response::Response};

use super::{check_token, not_found, wrapped, SharedState};

/// GET /api/client/account
pub async fn get_account(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match &state.account {
        Some(account) => wrapped("user", account),
        None => not_found("account"),
    }
}
