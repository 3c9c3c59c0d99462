//! Server models and trait implementations.
//!
//! The panel describes a server with one JSON shape in both namespaces.
//! [`ServerAttributes`] decodes that shape once; [`ClientServer`] and
//! [`ApplicationServer`] are projections of it.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Page, Record, Wrapped};
use crate::scope::{ApplicationScope, ClientScope};
use crate::traits::{Get, List};

/// Resource limits of a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Memory in MiB.
    #[serde(default)]
    pub memory: i64,
    /// Swap in MiB. `-1` means unlimited.
    #[serde(default)]
    pub swap: i64,
    /// Disk in MiB.
    #[serde(default)]
    pub disk: i64,
    /// Block IO weight.
    #[serde(default)]
    pub io: i64,
    /// CPU in percent of one core.
    #[serde(default)]
    pub cpu: i64,
    /// Maximum number of databases. Sent by the panel as a feature limit.
    #[serde(skip)]
    pub databases: i64,
    /// Maximum number of allocations. Sent by the panel as a feature limit.
    #[serde(skip)]
    pub allocations: i64,
}

/// Feature limits as the panel sends them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLimits {
    #[serde(default)]
    pub databases: i64,
    #[serde(default)]
    pub allocations: i64,
}

/// Docker settings of a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub startup_command: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// An IP and port assigned to a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(default)]
    pub id: u64,
    /// Whether this is the server's primary allocation.
    #[serde(default, alias = "is_default")]
    pub primary: bool,
    pub ip: String,
    #[serde(default, alias = "ip_alias")]
    pub alias: Option<String>,
    pub port: u16,
}

/// Relationships loaded with `include=allocations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocations: Option<Page<Allocation>>,
}

/// A server exactly as the panel sends it, in either namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerAttributes {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub server_owner: bool,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub feature_limits: FeatureLimits,
    #[serde(default)]
    pub user: u64,
    #[serde(default)]
    pub node: u64,
    #[serde(default)]
    pub allocation: u64,
    #[serde(default)]
    pub nest: u64,
    #[serde(default)]
    pub egg: u64,
    #[serde(default)]
    pub pack: Option<u64>,
    #[serde(default)]
    pub container: Container,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub relationships: ServerRelationships,
}

impl Record for ServerAttributes {
    // Server pages only carry allocations when asked for on every request.
    const NEXT_LINK_QUERY: Option<&'static str> = Some("include=allocations");
}

impl ServerAttributes {
    fn limits(&self) -> Limits {
        Limits {
            databases: self.feature_limits.databases,
            allocations: self.feature_limits.allocations,
            ..self.limits.clone()
        }
    }

    fn allocations(&self) -> Vec<Allocation> {
        self.relationships
            .allocations
            .as_ref()
            .map(|page| page.records().cloned().collect())
            .unwrap_or_default()
    }
}

/// A server as its owner or a subuser sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientServer {
    /// Short identifier used in client endpoints (e.g. `d3aac109`).
    pub id: String,
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub limits: Limits,
    pub allocations: Vec<Allocation>,
    /// Whether the token's account owns the server.
    pub is_owner: bool,
}

impl From<ServerAttributes> for ClientServer {
    fn from(s: ServerAttributes) -> Self {
        Self {
            limits: s.limits(),
            allocations: s.allocations(),
            id: s.identifier,
            uuid: s.uuid,
            name: s.name,
            description: s.description.unwrap_or_default(),
            is_owner: s.server_owner,
        }
    }
}

impl fmt::Display for ClientServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A server as an administrator sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationServer {
    /// Internal numeric ID used in application endpoints.
    pub id: u64,
    pub external_id: Option<String>,
    pub uuid: String,
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub limits: Limits,
    pub suspended: bool,
    /// Owner user ID.
    pub user: u64,
    pub node: u64,
    pub nest: u64,
    pub egg: u64,
    pub pack: Option<u64>,
    /// ID of the primary allocation.
    pub allocation: u64,
    pub allocations: Vec<Allocation>,
    pub container: Container,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ServerAttributes> for ApplicationServer {
    fn from(s: ServerAttributes) -> Self {
        Self {
            limits: s.limits(),
            allocations: s.allocations(),
            id: s.id,
            external_id: s.external_id,
            uuid: s.uuid,
            identifier: s.identifier,
            name: s.name,
            description: s.description.unwrap_or_default(),
            suspended: s.suspended,
            user: s.user,
            node: s.node,
            nest: s.nest,
            egg: s.egg,
            pack: s.pack,
            allocation: s.allocation,
            container: s.container,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl fmt::Display for ApplicationServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Power action sent to a running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSignal {
    Start,
    Stop,
    Restart,
    Kill,
}

impl PowerSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Kill => "kill",
        }
    }
}

impl fmt::Display for PowerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live usage of a server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerStatus {
    #[serde(default, alias = "current_state")]
    pub state: String,
    #[serde(default)]
    pub memory: Usage,
    #[serde(default)]
    pub cpu: CpuUsage,
    #[serde(default)]
    pub disk: Usage,
    /// Not every panel flavour reports players.
    #[serde(default)]
    pub players: Usage,
}

/// Current value against its limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default, rename = "current")]
    pub used: u64,
    #[serde(default)]
    pub limit: u64,
}

/// CPU usage, total and per core.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CpuUsage {
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub cores: Vec<f64>,
    #[serde(default)]
    pub limit: u64,
}

// Request bodies

#[derive(Debug, Serialize)]
struct AllocationRequest {
    default: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional: Vec<u64>,
}

#[derive(Debug, Serialize)]
struct ServerCreate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    name: &'a str,
    description: &'a str,
    user: u64,
    node: u64,
    nest: u64,
    egg: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    docker_image: &'a str,
    startup: &'a str,
    environment: &'a BTreeMap<String, String>,
    skip_scripts: bool,
    limits: &'a Limits,
    feature_limits: FeatureLimits,
    allocation: AllocationRequest,
}

impl<'a> From<&'a ApplicationServer> for ServerCreate<'a> {
    fn from(s: &'a ApplicationServer) -> Self {
        Self {
            external_id: s.external_id.as_deref(),
            name: &s.name,
            description: &s.description,
            user: s.user,
            node: s.node,
            nest: s.nest,
            egg: s.egg,
            docker_image: &s.container.image,
            startup: &s.container.startup_command,
            environment: &s.container.environment,
            skip_scripts: false,
            limits: &s.limits,
            feature_limits: FeatureLimits {
                databases: s.limits.databases,
                allocations: s.limits.allocations,
            },
            allocation: AllocationRequest {
                default: s.allocation,
                additional: s
                    .allocations
                    .iter()
                    .map(|a| a.id)
                    .filter(|id| *id != s.allocation)
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct DetailsUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    name: &'a str,
    user: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct BuildUpdate<'a> {
    allocation: u64,
    oom_disabled: bool,
    limits: &'a Limits,
    #[serde(skip_serializing_if = "<[u64]>::is_empty")]
    add_allocations: &'a [u64],
    #[serde(skip_serializing_if = "<[u64]>::is_empty")]
    remove_allocations: &'a [u64],
    feature_limits: FeatureLimits,
}

#[derive(Debug, Serialize)]
struct StartupUpdate<'a> {
    startup: &'a str,
    environment: &'a BTreeMap<String, String>,
    egg: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pack: Option<u64>,
    image: &'a str,
    skip_scripts: bool,
}

// Client scope

#[async_trait]
impl Get for ClientServer {
    type Scope = ClientScope;
    type Id = String;

    #[tracing::instrument(skip(scope))]
    async fn get(scope: &Self::Scope, id: String) -> Result<Self> {
        let id = urlencoding::encode(&id);
        let wrapped: Wrapped<ServerAttributes> = scope
            .get_json(&format!("servers/{id}?include=allocations"))
            .await?;
        Ok(wrapped.attributes.into())
    }
}

#[async_trait]
impl List for ClientServer {
    type Scope = ClientScope;
    type Query = ();

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, _query: &()) -> Result<Vec<Self>> {
        let servers: Vec<ServerAttributes> = scope.list_all("?include=allocations").await?;
        Ok(servers.into_iter().map(Self::from).collect())
    }
}

impl ClientScope {
    /// Fetch live resource usage of a server.
    #[tracing::instrument(skip(self))]
    pub async fn server_status(&self, id: &str) -> Result<ServerStatus> {
        let id = urlencoding::encode(id);
        let wrapped: Wrapped<ServerStatus> = self
            .get_json(&format!("servers/{id}/utilization"))
            .await?;
        Ok(wrapped.attributes)
    }

    /// Run a console command on a server.
    #[tracing::instrument(skip(self))]
    pub async fn send_command(&self, id: &str, command: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            command: &'a str,
        }

        let id = urlencoding::encode(id);
        self.send_json(
            &format!("servers/{id}/command"),
            Method::POST,
            &Body { command },
        )
        .await?;
        Ok(())
    }

    /// Change the power state of a server.
    ///
    /// The panel rejects the request if the server is already in that
    /// state or cannot change.
    #[tracing::instrument(skip(self))]
    pub async fn set_power_state(&self, id: &str, signal: PowerSignal) -> Result<()> {
        #[derive(Serialize)]
        struct Body {
            signal: PowerSignal,
        }

        let id = urlencoding::encode(id);
        self.send_json(&format!("servers/{id}/power"), Method::POST, &Body { signal })
            .await?;
        Ok(())
    }
}

// Application scope

#[async_trait]
impl Get for ApplicationServer {
    type Scope = ApplicationScope;
    type Id = u64;

    #[tracing::instrument(skip(scope))]
    async fn get(scope: &Self::Scope, id: u64) -> Result<Self> {
        let wrapped: Wrapped<ServerAttributes> = scope
            .get_json(&format!("servers/{id}?include=allocations"))
            .await?;
        Ok(wrapped.attributes.into())
    }
}

#[async_trait]
impl List for ApplicationServer {
    type Scope = ApplicationScope;
    type Query = ();

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, _query: &()) -> Result<Vec<Self>> {
        let servers: Vec<ServerAttributes> = scope.list_all("servers?include=allocations").await?;
        Ok(servers.into_iter().map(Self::from).collect())
    }
}

impl ApplicationScope {
    /// Fetch a server by the external ID it was created with.
    #[tracing::instrument(skip(self))]
    pub async fn server_by_external_id(&self, external_id: &str) -> Result<ApplicationServer> {
        let external_id = urlencoding::encode(external_id);
        let wrapped: Wrapped<ServerAttributes> = self
            .get_json(&format!("servers/external/{external_id}?include=allocations"))
            .await?;
        Ok(wrapped.attributes.into())
    }

    /// Create a server from `server` and return it as the panel stored it.
    ///
    /// `server.allocation` becomes the default allocation; every other
    /// entry of `server.allocations` is requested as an additional one.
    #[tracing::instrument(skip(self, server), fields(name = %server.name))]
    pub async fn create_server(&self, server: &ApplicationServer) -> Result<ApplicationServer> {
        let wrapped: Wrapped<ServerAttributes> = self
            .send_json_for("servers", Method::POST, &ServerCreate::from(server))
            .await?;
        Ok(wrapped.attributes.into())
    }

    /// Change the name, owner, external ID and description of a server.
    #[tracing::instrument(skip(self, server), fields(id = server.id))]
    pub async fn update_server_details(&self, server: &ApplicationServer) -> Result<()> {
        let body = DetailsUpdate {
            external_id: server.external_id.as_deref(),
            name: &server.name,
            user: server.user,
            description: &server.description,
        };
        self.send_json(&format!("servers/{}/details", server.id), Method::PATCH, &body)
            .await?;
        Ok(())
    }

    /// Change the limits and allocations of a server.
    #[tracing::instrument(skip(self, server), fields(id = server.id))]
    pub async fn update_server_build(
        &self,
        server: &ApplicationServer,
        add_allocations: &[u64],
        remove_allocations: &[u64],
    ) -> Result<()> {
        let body = BuildUpdate {
            allocation: server.allocation,
            oom_disabled: true,
            limits: &server.limits,
            add_allocations,
            remove_allocations,
            feature_limits: FeatureLimits {
                databases: server.limits.databases,
                allocations: server.limits.allocations,
            },
        };
        self.send_json(&format!("servers/{}/build", server.id), Method::PATCH, &body)
            .await?;
        Ok(())
    }

    /// Change the startup command, environment, egg and image of a server.
    #[tracing::instrument(skip(self, server), fields(id = server.id))]
    pub async fn update_server_startup(&self, server: &ApplicationServer) -> Result<()> {
        let body = StartupUpdate {
            startup: &server.container.startup_command,
            environment: &server.container.environment,
            egg: server.egg,
            pack: server.pack,
            image: &server.container.image,
            skip_scripts: false,
        };
        self.send_json(&format!("servers/{}/startup", server.id), Method::PATCH, &body)
            .await?;
        Ok(())
    }

    /// Mark a server as suspended.
    #[tracing::instrument(skip(self))]
    pub async fn suspend_server(&self, id: u64) -> Result<()> {
        self.query(&format!("servers/{id}/suspend"), Method::POST, None)
            .await?;
        Ok(())
    }

    /// Mark a server as active again.
    #[tracing::instrument(skip(self))]
    pub async fn unsuspend_server(&self, id: u64) -> Result<()> {
        self.query(&format!("servers/{id}/unsuspend"), Method::POST, None)
            .await?;
        Ok(())
    }

    /// Rebuild a server's container.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_server(&self, id: u64) -> Result<()> {
        self.query(&format!("servers/{id}/rebuild"), Method::POST, None)
            .await?;
        Ok(())
    }

    /// Run the install script of a server again.
    #[tracing::instrument(skip(self))]
    pub async fn reinstall_server(&self, id: u64) -> Result<()> {
        self.query(&format!("servers/{id}/reinstall"), Method::POST, None)
            .await?;
        Ok(())
    }

    /// Delete a server.
    #[tracing::instrument(skip(self))]
    pub async fn delete_server(&self, id: u64) -> Result<()> {
        self.query(&format!("servers/{id}"), Method::DELETE, None)
            .await?;
        Ok(())
    }

    /// Delete a server even if its node cannot be reached.
    ///
    /// Prefer [`delete_server`](Self::delete_server) when possible.
    #[tracing::instrument(skip(self))]
    pub async fn force_delete_server(&self, id: u64) -> Result<()> {
        self.query(&format!("servers/{id}/force"), Method::DELETE, None)
            .await?;
        Ok(())
    }
}
