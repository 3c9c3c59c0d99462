//! Pterodactyl panel API client library.
//!
//! A Rust library for the Pterodactyl REST API. Requests are issued through
//! one of two credential scopes:
//!
//! - [`ClientScope`] - an account's client API key, under `/api/client`
//! - [`ApplicationScope`] - an administrator's application API key, under
//!   `/api/application`
//!
//! The two are distinct types, so an operation that needs administrator
//! rights cannot be called with account credentials.
//!
//! # Quick Start
//!
//! ```no_run
//! use pteroapi::{ApplicationScope, ClientScope, ClientServer, List, PowerSignal, User};
//!
//! #[tokio::main]
//! async fn main() -> pteroapi::Result<()> {
//!     let client = ClientScope::from_env()?;
//!
//!     // Every server this account can see, across all pages
//!     let servers = ClientServer::list(&client, &()).await?;
//!     if let Some(server) = servers.first() {
//!         client.set_power_state(&server.id, PowerSignal::Restart).await?;
//!     }
//!
//!     let admin = ApplicationScope::from_env()?;
//!     let users = User::list(&admin, &()).await?;
//!     println!("Found {} users", users.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Transport`] performs one HTTP round trip and decodes panel errors.
//!   [`HttpTransport`] is the `reqwest` implementation; tests inject their own.
//! - [`Scope`] prefixes endpoints with its namespace and forwards to the
//!   transport.
//! - [`fetch_all_pages`] follows `meta.pagination.links.next` until the
//!   collection is exhausted.
//! - Entity types implement [`Get`], [`List`] and [`Update`]; other
//!   operations are methods on the scope that may perform them.
//!
//! # Configuration
//!
//! [`Scope::from_env`] reads:
//!
//! - `PTERODACTYL_URL` (required) - Panel base URL
//! - `PTERODACTYL_CLIENT_KEY` - Token for [`ClientScope`]
//! - `PTERODACTYL_APPLICATION_KEY` - Token for [`ApplicationScope`]

mod error;
mod models;
mod pagination;
mod scope;
mod traits;
mod transport;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use error::{decode_error, ApiErrorDetail, ErrorDecodeError, PteroError, Result};
pub use pagination::{fetch_all_pages, Links, Meta, Page, Pagination, Record, Wrapped};
pub use scope::{Application, ApplicationScope, Client, ClientScope, Namespace, Scope, URL_ENV};
pub use transport::{is_success, HttpTransport, Request, Transport, ACCEPT_MEDIA_TYPE};

// Re-export traits
pub use traits::{Get, List, Update};

// Re-export models
pub use models::{
    // Account types
    Account,
    ApiKey,
    // Database types
    ClientDatabase,
    Database,
    DatabaseHost,
    DatabaseParams,
    // Location types
    Location,
    LocationParams,
    // Nest types
    Egg,
    EggConfig,
    EggScript,
    EggStartup,
    Nest,
    // Server types
    Allocation,
    ApplicationServer,
    ClientServer,
    Container,
    CpuUsage,
    FeatureLimits,
    Limits,
    PowerSignal,
    ServerAttributes,
    ServerRelationships,
    ServerStatus,
    Usage,
    // User types
    User,
    UserParams,
};

pub use reqwest::Method;
