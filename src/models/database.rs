//! Server database models.
//!
//! Administrators and server owners see databases differently: the
//! application namespace uses numeric IDs and host IDs, the client
//! namespace uses hashed IDs and inlines the host address.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Record, Wrapped};
use crate::scope::{ApplicationScope, ClientScope};
use crate::traits::List;

/// A database as an administrator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub id: u64,
    /// ID of the owning server.
    pub server: u64,
    /// ID of the database host.
    pub host: u64,
    pub database: String,
    pub username: String,
    /// Hosts allowed to connect (`%` for any).
    pub remote: String,
    #[serde(default)]
    pub max_connections: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Database {}

/// Fields accepted when creating a database as an administrator.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseParams {
    pub database: String,
    pub remote: String,
    /// ID of the database host to create it on.
    pub host: u64,
}

/// A database as a server owner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientDatabase {
    pub id: String,
    pub host: DatabaseHost,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub connections_from: String,
    #[serde(default)]
    pub max_connections: u64,
}

impl Record for ClientDatabase {}

/// Address of a database host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseHost {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct CreatedClientDatabase {
    #[serde(flatten)]
    database: ClientDatabase,
    relationships: PasswordRelationship,
}

#[derive(Debug, Deserialize)]
struct PasswordRelationship {
    password: Wrapped<PasswordAttributes>,
}

#[derive(Debug, Deserialize)]
struct PasswordAttributes {
    password: String,
}

#[async_trait]
impl List for Database {
    type Scope = ApplicationScope;
    /// Server ID.
    type Query = u64;

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, server: &u64) -> Result<Vec<Self>> {
        scope.list_all(&format!("servers/{server}/databases")).await
    }
}

#[async_trait]
impl List for ClientDatabase {
    type Scope = ClientScope;
    /// Server identifier.
    type Query = String;

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, server: &String) -> Result<Vec<Self>> {
        let server = urlencoding::encode(server);
        scope.list_all(&format!("servers/{server}/databases")).await
    }
}

impl ApplicationScope {
    /// Fetch one database of a server.
    #[tracing::instrument(skip(self))]
    pub async fn database(&self, server: u64, id: u64) -> Result<Database> {
        let wrapped: Wrapped<Database> = self
            .get_json(&format!("servers/{server}/databases/{id}"))
            .await?;
        Ok(wrapped.attributes)
    }

    /// Create a database for a server.
    #[tracing::instrument(skip(self))]
    pub async fn create_database(&self, server: u64, params: &DatabaseParams) -> Result<Database> {
        let wrapped: Wrapped<Database> = self
            .send_json_for(&format!("servers/{server}/databases"), Method::POST, params)
            .await?;
        Ok(wrapped.attributes)
    }

    /// Generate a new password for a database.
    #[tracing::instrument(skip(self))]
    pub async fn reset_database_password(&self, server: u64, id: u64) -> Result<()> {
        self.query(
            &format!("servers/{server}/databases/{id}/reset-password"),
            Method::POST,
            None,
        )
        .await?;
        Ok(())
    }

    /// Delete a database of a server.
    #[tracing::instrument(skip(self))]
    pub async fn delete_database(&self, server: u64, id: u64) -> Result<()> {
        self.query(&format!("servers/{server}/databases/{id}"), Method::DELETE, None)
            .await?;
        Ok(())
    }
}

impl ClientScope {
    /// Create a database for a server.
    ///
    /// Returns the database and its generated password, which the panel
    /// only reveals here.
    #[tracing::instrument(skip(self))]
    pub async fn create_database(
        &self,
        server: &str,
        name: &str,
        remote: &str,
    ) -> Result<(ClientDatabase, String)> {
        #[derive(Serialize)]
        struct Body<'a> {
            database: &'a str,
            remote: &'a str,
        }

        let server = urlencoding::encode(server);
        let wrapped: Wrapped<CreatedClientDatabase> = self
            .send_json_for(
                &format!("servers/{server}/databases"),
                Method::POST,
                &Body {
                    database: name,
                    remote,
                },
            )
            .await?;

        let created = wrapped.attributes;
        Ok((
            created.database,
            created.relationships.password.attributes.password,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_client_database() {
        let json = r#"{
            "object": "server_database",
            "attributes": {
                "id": "y9YVxO4V",
                "host": {"address": "127.0.0.1", "port": 3306},
                "name": "s5punishments",
                "username": "u5aeZqbGdCM9",
                "connections_from": "%",
                "max_connections": 0,
                "relationships": {
                    "password": {
                        "object": "database_password",
                        "attributes": {"password": "=lR2orDOcwfKkM=BXb.BVF.C"}
                    }
                }
            }
        }"#;
        let wrapped: Wrapped<CreatedClientDatabase> = serde_json::from_str(json).unwrap();
        let created = wrapped.attributes;

        assert_eq!(created.database.id, "y9YVxO4V");
        assert_eq!(
            created.database.host,
            DatabaseHost {
                address: "127.0.0.1".to_string(),
                port: 3306,
            }
        );
        assert_eq!(
            created.relationships.password.attributes.password,
            "=lR2orDOcwfKkM=BXb.BVF.C"
        );
    }

    #[test]
    fn test_application_database_deserialize() {
        let json = r#"{
            "id": 1,
            "server": 5,
            "host": 4,
            "database": "s5_perms",
            "username": "u5_QsIAp1jhvS",
            "remote": "%",
            "created_at": "2020-06-12T20:00:44+00:00",
            "updated_at": "2020-06-12T20:00:44+00:00"
        }"#;
        let db: Database = serde_json::from_str(json).unwrap();
        assert_eq!(db.server, 5);
        assert_eq!(db.max_connections, None);
    }
}
