//! Location endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{check_token, no_content, not_found, wrapped, PageQuery, SharedState};
use crate::mock_server::state::MockState;
use crate::{Location, LocationParams};

/// GET /api/application/locations
pub async fn list_locations(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let locations: Vec<Location> = state.locations.values().cloned().collect();
    let page = state.paginate(locations, query.page(), "/api/application/locations");
    (StatusCode::OK, Json(page)).into_response()
}

/// GET /api/application/locations/{id}
pub async fn get_location(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.locations.get(&id) {
        Some(location) => wrapped("location", location),
        None => not_found("location"),
    }
}

/// POST /api/application/locations
pub async fn create_location(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(params): Json<LocationParams>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let id = MockState::next_id(&state.locations);
    let location = Location {
        id,
        short: params.short,
        long: Some(params.long),
        updated_at: None,
        created_at: None,
    };
    state.locations.insert(id, location.clone());

    wrapped("location", location)
}

/// PATCH /api/application/locations/{id}
pub async fn update_location(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(params): Json<LocationParams>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.locations.get_mut(&id) {
        Some(location) => {
            location.short = params.short;
            location.long = Some(params.long);
            wrapped("location", location.clone())
        }
        None => not_found("location"),
    }
}

/// DELETE /api/application/locations/{id}
pub async fn delete_location(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.locations.remove(&id) {
        Some(_) => no_content(),
        None => not_found("location"),
    }
}
