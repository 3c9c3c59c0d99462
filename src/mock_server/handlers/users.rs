//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{check_token, error_response, no_content, not_found, wrapped, PageQuery, SharedState};
use crate::mock_server::state::MockState;
use crate::User;

/// Fields accepted when creating or updating a user.
#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub external_id: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[allow(dead_code)] // Accepted by the panel but never echoed back
    pub password: Option<String>,
    #[serde(default)]
    pub root_admin: bool,
    pub language: Option<String>,
}

impl UserBody {
    fn apply(self, user: &mut User) {
        user.external_id = self.external_id;
        user.username = self.username;
        user.email = self.email;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.root_admin = self.root_admin;
        if let Some(language) = self.language {
            user.language = language;
        }
    }
}

/// GET /api/application/users
pub async fn list_users(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let users: Vec<User> = state.users.values().cloned().collect();
    let page = state.paginate(users, query.page(), "/api/application/users");
    (StatusCode::OK, Json(page)).into_response()
}

/// GET /api/application/users/{id}
pub async fn get_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.users.get(&id) {
        Some(user) => wrapped("user", user),
        None => not_found("user"),
    }
}

/// GET /api/application/users/external/{external_id}
pub async fn get_user_by_external_id(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(external_id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state
        .users
        .values()
        .find(|u| u.external_id.as_deref() == Some(external_id.as_str()))
    {
        Some(user) => wrapped("user", user),
        None => not_found("user"),
    }
}

/// POST /api/application/users
pub async fn create_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<UserBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    if state.users.values().any(|u| u.username == body.username) {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "ValidationException",
            "The username has already been taken.",
        );
    }

    let id = MockState::next_id(&state.users);
    let mut user = User {
        id,
        external_id: None,
        uuid: format!("00000000-0000-4000-8000-{id:012}"),
        username: String::new(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        language: "en".to_string(),
        root_admin: false,
        two_factor: false,
        created_at: None,
        updated_at: None,
    };
    body.apply(&mut user);
    state.users.insert(id, user.clone());

    wrapped("user", user)
}

/// PATCH /api/application/users/{id}
pub async fn update_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<UserBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.users.get_mut(&id) {
        Some(user) => {
            body.apply(user);
            wrapped("user", user.clone())
        }
        None => not_found("user"),
    }
}

/// DELETE /api/application/users/{id}
pub async fn delete_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.users.remove(&id) {
        Some(_) => no_content(),
        None => not_found("user"),
    }
}
