//! E2E tests using the mock Pterodactyl panel.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use pteroapi::mock_server::{Fixtures, MockServer, MockState};
use pteroapi::{
    ApplicationScope, ApplicationServer, ClientScope, ClientServer, Get, List, Location,
    LocationParams, PowerSignal, PteroError, Update, User, UserParams,
};

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Pagination Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_list_users_across_pages() {
    let mut state = MockState::new().with_per_page(2);
    for (id, name) in ["admin", "alice", "bob", "carol", "dave"].iter().enumerate() {
        state = state.with_user(Fixtures::user(id as u64 + 1, name));
    }
    let server = MockServer::with_state(state).await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

    let users = User::list(&admin, &()).await.expect("Failed to list users");

    let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_list_servers_keeps_allocations_on_every_page() {
    let state = MockState::new()
        .with_per_page(1)
        .with_server(Fixtures::server(1, "Survival", 1))
        .with_server(Fixtures::server(2, "Creative", 1))
        .with_server(Fixtures::server(3, "Lobby", 1));
    let server = MockServer::with_state(state).await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

    let servers = ApplicationServer::list(&admin, &())
        .await
        .expect("Failed to list servers");

    assert_eq!(servers.len(), 3);
    for s in &servers {
        assert_eq!(s.allocations.len(), 1, "{} lost its allocations", s.name);
        assert_eq!(s.allocations[0].id, s.allocation);
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_client_lists_servers_across_pages() {
    let user = Fixtures::user(1, "alice");
    let state = MockState::new()
        .with_per_page(2)
        .with_account(Fixtures::account(&user))
        .with_user(user)
        .with_server(Fixtures::server(1, "Survival", 1))
        .with_server(Fixtures::server(2, "Creative", 1))
        .with_server(Fixtures::server(3, "Lobby", 9));
    let server = MockServer::with_state(state).await;
    let client = ClientScope::new(server.url(), "test-token").unwrap();

    let servers = ClientServer::list(&client, &())
        .await
        .expect("Failed to list servers");

    assert_eq!(servers.len(), 3);
    assert!(servers[0].is_owner);
    assert!(!servers[2].is_owner);
    assert!(servers.iter().all(|s| !s.allocations.is_empty()));

    server.shutdown().await;
}

// =============================================================================
// User Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_create_update_delete_user_workflow() {
    let server = MockServer::start_empty().await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

    // Step 1: Create
    let params = UserParams {
        external_id: Some("crm-42".to_string()),
        username: "erin".to_string(),
        email: "erin@example.com".to_string(),
        first_name: "Erin".to_string(),
        last_name: "Example".to_string(),
        ..Default::default()
    }
    .with_password("correct horse");
    let created = admin.create_user(&params).await.expect("Failed to create user");
    assert_eq!(created.full_name(), "Erin Example");

    // Step 2: Find by external ID
    let found = admin.user_by_external_id("crm-42").await.unwrap();
    assert_eq!(found.id, created.id);

    // Step 3: Update
    let mut params = UserParams::from(&found);
    params.last_name = "Renamed".to_string();
    let updated = User::update(&admin, found.id, params).await.unwrap();
    assert_eq!(updated.last_name, "Renamed");

    // Step 4: Delete and confirm it is gone
    admin.delete_user(found.id).await.unwrap();
    let err = User::get(&admin, found.id).await.unwrap_err();
    assert!(err.is_not_found());

    server.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let server = MockServer::start().await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

    let params = UserParams {
        username: "alice".to_string(),
        email: "other@example.com".to_string(),
        ..Default::default()
    };
    let err = admin.create_user(&params).await.unwrap_err();

    match err {
        PteroError::Api { status_code, error } => {
            assert_eq!(status_code, 422);
            assert_eq!(error.code, "ValidationException");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    server.shutdown().await;
}

// =============================================================================
// Location Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_location_workflow() {
    let server = MockServer::start_empty().await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

    let location = admin.create_location("ap-south", "Mumbai").await.unwrap();

    let params = LocationParams {
        short: "ap-south".to_string(),
        long: "Mumbai 2".to_string(),
    };
    Location::update(&admin, location.id, params).await.unwrap();

    let locations = Location::list(&admin, &()).await.unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].long.as_deref(), Some("Mumbai 2"));

    admin.delete_location(location.id).await.unwrap();
    assert!(Location::list(&admin, &()).await.unwrap().is_empty());

    server.shutdown().await;
}

// =============================================================================
// Server Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_power_and_status_workflow() {
    let server = MockServer::start().await;
    let client = ClientScope::new(server.url(), "test-token").unwrap();

    let servers = ClientServer::list(&client, &()).await.unwrap();
    let id = servers[0].id.clone();

    let status = client.server_status(&id).await.unwrap();
    assert_eq!(status.state, "off");

    client.set_power_state(&id, PowerSignal::Start).await.unwrap();
    client.send_command(&id, "say hello").await.unwrap();

    let status = client.server_status(&id).await.unwrap();
    assert_eq!(status.state, "on");

    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.commands, vec![(id, "say hello".to_string())]);

    drop(state);
    server.shutdown().await;
}

#[tokio::test]
async fn test_suspended_server_rejects_power() {
    let server = MockServer::start().await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();
    let client = ClientScope::new(server.url(), "test-token").unwrap();

    admin.suspend_server(1).await.unwrap();
    let suspended = ApplicationServer::get(&admin, 1).await.unwrap();
    assert!(suspended.suspended);

    let err = client
        .set_power_state(&suspended.identifier, PowerSignal::Start)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(409));

    admin.unsuspend_server(1).await.unwrap();
    client
        .set_power_state(&suspended.identifier, PowerSignal::Start)
        .await
        .unwrap();

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_changes_are_visible() {
    let server = MockServer::start_empty().await;
    let admin = ApplicationScope::new(server.url(), "test-token").unwrap();

    assert!(User::list(&admin, &()).await.unwrap().is_empty());

    {
        let state = server.state();
        let mut state = state.write().await;
        state.users.insert(9, Fixtures::user(9, "late"));
    }

    let user = User::get(&admin, 9).await.unwrap();
    assert_eq!(user.username, "late");

    server.shutdown().await;
}
