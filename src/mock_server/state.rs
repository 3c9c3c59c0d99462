//! Mock server state management.
//!
//! Provides the in-memory data store for the mock panel.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Account, Location, Page, Pagination, PowerSignal, ServerAttributes, User};

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: usize = 50;

/// Shared state for the mock server.
///
/// Collections are keyed by ID so listings come back in ID order.
#[derive(Debug)]
pub struct MockState {
    /// Users indexed by ID.
    pub users: BTreeMap<u64, User>,

    /// Locations indexed by ID.
    pub locations: BTreeMap<u64, Location>,

    /// Servers indexed by internal ID.
    pub servers: BTreeMap<u64, ServerAttributes>,

    /// The account behind the client token.
    pub account: Option<Account>,

    /// Number of records per collection page.
    pub per_page: usize,

    /// Bearer token every request must carry. `None` accepts any token.
    pub token: Option<String>,

    /// Last power signal received, by server identifier.
    pub power: BTreeMap<String, PowerSignal>,

    /// Console commands received, in order, as (identifier, command).
    pub commands: Vec<(String, String)>,

    /// Base URL the server is reachable at; used to build next links.
    pub base_url: String,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            locations: BTreeMap::new(),
            servers: BTreeMap::new(),
            account: None,
            per_page: DEFAULT_PER_PAGE,
            token: None,
            power: BTreeMap::new(),
            commands: Vec::new(),
            base_url: String::new(),
        }
    }
}

impl MockState {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in `Arc<RwLock<_>>` for sharing with handlers.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user (builder pattern).
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add a location (builder pattern).
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.insert(location.id, location);
        self
    }

    /// Add a server (builder pattern).
    pub fn with_server(mut self, server: ServerAttributes) -> Self {
        self.servers.insert(server.id, server);
        self
    }

    /// Set the client account (builder pattern).
    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// Set the page size (builder pattern).
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Require a bearer token (builder pattern).
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Check an `Authorization` header value against the configured token.
    pub fn authorized(&self, header: Option<&str>) -> bool {
        match &self.token {
            None => true,
            Some(token) => header
                .and_then(|h| h.strip_prefix("Bearer "))
                .is_some_and(|given| given == token),
        }
    }

    /// Slice `items` into page `page` (1-indexed), linking to the next one.
    ///
    /// `path` is the collection path after the base URL, e.g.
    /// `/api/application/users`.
    pub fn paginate<T>(&self, items: Vec<T>, page: usize, path: &str) -> Page<T> {
        let total = items.len();
        let per_page = self.per_page;
        let total_pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);

        let records: Vec<T> = items
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        let mut pagination = Pagination {
            total: total as u64,
            count: records.len() as u64,
            per_page: per_page as u64,
            current_page: page as u64,
            total_pages: total_pages as u64,
            ..Default::default()
        };
        if page > 1 {
            pagination.links.previous = Some(format!("{}{}?page={}", self.base_url, path, page - 1));
        }
        if page < total_pages {
            pagination.links.next = Some(format!("{}{}?page={}", self.base_url, path, page + 1));
        }

        Page::new(records, pagination)
    }

    /// Find a server by its short client identifier.
    pub fn server_by_identifier(&self, identifier: &str) -> Option<&ServerAttributes> {
        self.servers.values().find(|s| s.identifier == identifier)
    }

    /// Next free ID in `map`.
    pub fn next_id<T>(map: &BTreeMap<u64, T>) -> u64 {
        map.keys().next_back().map_or(1, |id| id + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_add_and_get_user() {
        let state = MockState::new().with_user(Fixtures::user(7, "alice"));

        let user = state.users.get(&7);
        assert!(user.is_some());
        assert_eq!(user.unwrap().username, "alice");
    }

    #[test]
    fn test_paginate_links() {
        let mut state = MockState::new().with_per_page(2);
        state.base_url = "http://mock".to_string();

        let first = state.paginate(vec![1, 2, 3, 4, 5], 1, "/api/application/users");
        assert_eq!(first.len(), 2);
        assert_eq!(first.pagination().total_pages, 3);
        assert_eq!(
            first.next_link(),
            Some("http://mock/api/application/users?page=2")
        );

        let last = state.paginate(vec![1, 2, 3, 4, 5], 3, "/api/application/users");
        assert_eq!(last.into_records(), vec![5]);
    }

    #[test]
    fn test_paginate_empty_collection() {
        let state = MockState::new();
        let page = state.paginate(Vec::<u64>::new(), 1, "/api/application/users");
        assert!(page.is_empty());
        assert_eq!(page.next_link(), None);
        assert_eq!(page.pagination().total_pages, 1);
    }

    #[test]
    fn test_authorized() {
        let open = MockState::new();
        assert!(open.authorized(None));

        let locked = MockState::new().with_token("secret");
        assert!(locked.authorized(Some("Bearer secret")));
        assert!(!locked.authorized(Some("Bearer wrong")));
        assert!(!locked.authorized(None));
    }

    #[test]
    fn test_next_id() {
        let state = MockState::new()
            .with_user(Fixtures::user(1, "a"))
            .with_user(Fixtures::user(4, "b"));
        assert_eq!(MockState::next_id(&state.users), 5);
        assert_eq!(MockState::next_id(&MockState::new().users), 1);
    }
}
