//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::BTreeMap;

use crate::{
    Account, Allocation, Container, FeatureLimits, Limits, Location, Page, Pagination,
    ServerAttributes, ServerRelationships, User,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user with the given ID and username.
    pub fn user(id: u64, username: &str) -> User {
        User {
            id,
            external_id: None,
            uuid: format!("00000000-0000-4000-8000-{id:012}"),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            language: "en".to_string(),
            root_admin: false,
            two_factor: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Create an administrator.
    pub fn admin(id: u64, username: &str) -> User {
        let mut user = Self::user(id, username);
        user.root_admin = true;
        user
    }

    /// Create the account a client token belongs to.
    pub fn account(user: &User) -> Account {
        Account {
            id: user.id,
            admin: user.root_admin,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            language: user.language.clone(),
        }
    }

    // =========================================================================
    // Location Fixtures
    // =========================================================================

    /// Create a location.
    pub fn location(id: u64, short: &str) -> Location {
        Location {
            id,
            short: short.to_string(),
            long: Some(format!("Datacenter {short}")),
            updated_at: None,
            created_at: None,
        }
    }

    // =========================================================================
    // Server Fixtures
    // =========================================================================

    /// Create a server owned by `owner` with a single primary allocation.
    pub fn server(id: u64, name: &str, owner: u64) -> ServerAttributes {
        let allocation_id = id * 10;
        ServerAttributes {
            id,
            external_id: None,
            uuid: format!("{id:08x}-0000-4000-8000-000000000000"),
            identifier: format!("{id:08x}"),
            name: name.to_string(),
            description: Some(String::new()),
            suspended: false,
            server_owner: true,
            limits: Limits {
                memory: 1024,
                swap: 0,
                disk: 5120,
                io: 500,
                cpu: 100,
                ..Default::default()
            },
            feature_limits: FeatureLimits {
                databases: 2,
                allocations: 1,
            },
            user: owner,
            node: 1,
            allocation: allocation_id,
            nest: 1,
            egg: 4,
            pack: None,
            container: Container {
                startup_command: "java -jar server.jar".to_string(),
                image: "quay.io/pterodactyl/core:java".to_string(),
                installed: true,
                environment: BTreeMap::from([(
                    "SERVER_JARFILE".to_string(),
                    "server.jar".to_string(),
                )]),
            },
            updated_at: None,
            created_at: None,
            relationships: ServerRelationships {
                allocations: Some(Page::new(
                    vec![Self::allocation(allocation_id, 25565 + id as u16, true)],
                    Pagination::default(),
                )),
            },
        }
    }

    /// Create an allocation on the loopback address.
    pub fn allocation(id: u64, port: u16, primary: bool) -> Allocation {
        Allocation {
            id,
            primary,
            ip: "127.0.0.1".to_string(),
            alias: None,
            port,
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Create the default scenario with common test data.
    pub fn default_scenario() -> DefaultScenario {
        let admin = Self::admin(1, "admin");
        let account = Self::account(&admin);

        DefaultScenario {
            users: vec![
                admin,
                Self::user(2, "alice"),
                Self::user(3, "bob"),
                Self::user(4, "carol"),
                Self::user(5, "dave"),
            ],
            locations: vec![Self::location(1, "us-east"), Self::location(2, "eu-west")],
            servers: vec![
                Self::server(1, "Survival", 2),
                Self::server(2, "Creative", 2),
                Self::server(3, "Lobby", 3),
            ],
            account,
        }
    }
}

/// Default test scenario data.
pub struct DefaultScenario {
    pub users: Vec<User>,
    pub locations: Vec<Location>,
    pub servers: Vec<ServerAttributes>,
    pub account: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_fixture_has_primary_allocation() {
        let server = Fixtures::server(3, "Lobby", 1);
        let allocations = server.relationships.allocations.as_ref().unwrap();

        assert_eq!(allocations.len(), 1);
        let allocation = allocations.records().next().unwrap();
        assert!(allocation.primary);
        assert_eq!(allocation.id, server.allocation);
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();

        assert_eq!(scenario.users.len(), 5);
        assert!(scenario.users[0].root_admin);
        assert_eq!(scenario.account.username, "admin");
        assert!(!scenario.servers.is_empty());
    }
}
