//! Server endpoint handlers for both namespaces.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{
    check_token, error_response, no_content, not_found, wrapped, PageQuery, SharedState,
};
use crate::{PowerSignal, ServerAttributes};

/// Body of a power request.
#[derive(Debug, Deserialize)]
pub struct PowerBody {
    pub signal: PowerSignal,
}

/// Body of a console command request.
#[derive(Debug, Deserialize)]
pub struct CommandBody {
    pub command: String,
}

/// Drop relationships unless they were asked for.
fn project(mut server: ServerAttributes, query: &PageQuery) -> ServerAttributes {
    if !query.includes("allocations") {
        server.relationships.allocations = None;
    }
    server
}

fn suspended() -> Response {
    error_response(
        StatusCode::CONFLICT,
        "ServerStateConflictException",
        "This server is currently suspended and the functionality requested is unavailable.",
    )
}

// =============================================================================
// Application namespace
// =============================================================================

/// GET /api/application/servers
pub async fn list_servers(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let servers: Vec<ServerAttributes> = state
        .servers
        .values()
        .cloned()
        .map(|s| project(s, &query))
        .collect();
    let page = state.paginate(servers, query.page(), "/api/application/servers");
    (StatusCode::OK, Json(page)).into_response()
}

/// GET /api/application/servers/{id}
pub async fn get_server(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.servers.get(&id) {
        Some(server) => wrapped("server", project(server.clone(), &query)),
        None => not_found("server"),
    }
}

/// POST /api/application/servers/{id}/suspend
pub async fn suspend_server(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    set_suspended(state, headers, id, true).await
}

/// POST /api/application/servers/{id}/unsuspend
pub async fn unsuspend_server(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    set_suspended(state, headers, id, false).await
}

async fn set_suspended(state: SharedState, headers: HeaderMap, id: u64, suspended: bool) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.servers.get_mut(&id) {
        Some(server) => {
            server.suspended = suspended;
            no_content()
        }
        None => not_found("server"),
    }
}

/// DELETE /api/application/servers/{id}
pub async fn delete_server(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.servers.remove(&id) {
        Some(_) => no_content(),
        None => not_found("server"),
    }
}

// =============================================================================
// Client namespace
// =============================================================================

/// GET /api/client
pub async fn list_client_servers(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let owner = state.account.as_ref().map(|a| a.id);
    let servers: Vec<ServerAttributes> = state
        .servers
        .values()
        .cloned()
        .map(|mut s| {
            s.server_owner = owner == Some(s.user);
            project(s, &query)
        })
        .collect();
    let page = state.paginate(servers, query.page(), "/api/client");
    (StatusCode::OK, Json(page)).into_response()
}

/// GET /api/client/servers/{identifier}
pub async fn get_client_server(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.server_by_identifier(&identifier) {
        Some(server) => wrapped("server", project(server.clone(), &query)),
        None => not_found("server"),
    }
}

/// GET /api/client/servers/{identifier}/utilization
pub async fn server_utilization(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let Some(server) = state.server_by_identifier(&identifier) else {
        return not_found("server");
    };
    let running = matches!(
        state.power.get(&identifier),
        Some(PowerSignal::Start | PowerSignal::Restart)
    );
    let (current_state, memory) = if running { ("on", 512) } else { ("off", 0) };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "object": "stats",
            "attributes": {
                "state": current_state,
                "memory": {"current": memory, "limit": server.limits.memory},
                "cpu": {"current": 0.0, "cores": [], "limit": server.limits.cpu},
                "disk": {"current": 0, "limit": server.limits.disk},
            }
        })),
    )
        .into_response()
}

/// POST /api/client/servers/{identifier}/power
pub async fn send_power(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
    Json(body): Json<PowerBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.server_by_identifier(&identifier).map(|s| s.suspended) {
        None => not_found("server"),
        Some(true) => suspended(),
        Some(false) => {
            state.power.insert(identifier, body.signal);
            no_content()
        }
    }
}

/// POST /api/client/servers/{identifier}/command
pub async fn send_command(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
    Json(body): Json<CommandBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.server_by_identifier(&identifier).map(|s| s.suspended) {
        None => not_found("server"),
        Some(true) => suspended(),
        Some(false) => {
            state.commands.push((identifier, body.command));
            no_content()
        }
    }
}
