//! Nest and egg models.
//!
//! Nests group eggs; an egg describes how to install and run one kind of
//! game server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Record, Wrapped};
use crate::scope::ApplicationScope;
use crate::traits::{Get, List};

/// A collection of eggs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nest {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub author: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Nest {}

/// A server template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Egg {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    /// ID of the parent nest.
    pub nest: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub docker_image: String,
    #[serde(default)]
    pub config: EggConfig,
    #[serde(default)]
    pub startup: String,
    #[serde(default)]
    pub script: EggScript,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Egg {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggConfig {
    #[serde(default)]
    pub startup: EggStartup,
    /// Console command that stops the server.
    #[serde(default)]
    pub stop: String,
    /// Egg whose configuration this one inherits.
    #[serde(default)]
    pub extends: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggStartup {
    /// Console line that marks the server as started.
    #[serde(default)]
    pub done: String,
    #[serde(default, rename = "userInteraction")]
    pub user_interaction: Vec<String>,
}

/// Install script settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggScript {
    #[serde(default)]
    pub privileged: bool,
    #[serde(default)]
    pub install: String,
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub extends: Option<String>,
}

#[async_trait]
impl Get for Nest {
    type Scope = ApplicationScope;
    type Id = u64;

    #[tracing::instrument(skip(scope))]
    async fn get(scope: &Self::Scope, id: u64) -> Result<Self> {
        let wrapped: Wrapped<Nest> = scope.get_json(&format!("nests/{id}")).await?;
        Ok(wrapped.attributes)
    }
}

#[async_trait]
impl List for Nest {
    type Scope = ApplicationScope;
    type Query = ();

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, _query: &()) -> Result<Vec<Self>> {
        scope.list_all("nests").await
    }
}

#[async_trait]
impl List for Egg {
    type Scope = ApplicationScope;
    /// Parent nest ID.
    type Query = u64;

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, nest: &u64) -> Result<Vec<Self>> {
        scope.list_all(&format!("nests/{nest}/eggs")).await
    }
}

impl ApplicationScope {
    /// Fetch one egg of a nest.
    #[tracing::instrument(skip(self))]
    pub async fn egg(&self, nest: u64, egg: u64) -> Result<Egg> {
        let wrapped: Wrapped<Egg> = self
            .get_json(&format!("nests/{nest}/eggs/{egg}"))
            .await?;
        Ok(wrapped.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_egg_deserialize() {
        let json = r##"{
            "id": 4,
            "uuid": "9ac39f3d-0c34-4d93-8174-c52ab9e6c57b",
            "name": "Vanilla Minecraft",
            "nest": 1,
            "author": "support@pterodactyl.io",
            "description": "Minecraft is a game about placing blocks.",
            "docker_image": "quay.io/pterodactyl/core:java",
            "config": {
                "files": {},
                "startup": {"done": ")! For help, type ", "userInteraction": ["Go to eula.txt for more info."]},
                "stop": "stop",
                "logs": {},
                "extends": null
            },
            "startup": "java -Xms128M -Xmx{{SERVER_MEMORY}}M -jar {{SERVER_JARFILE}}",
            "script": {
                "privileged": true,
                "install": "#!/bin/ash",
                "entry": "ash",
                "container": "alpine:3.4",
                "extends": null
            },
            "created_at": "2017-11-03T22:15:07+00:00",
            "updated_at": "2018-06-19T07:46:06+00:00"
        }"##;
        let egg: Egg = serde_json::from_str(json).unwrap();

        assert_eq!(egg.nest, 1);
        assert_eq!(egg.config.stop, "stop");
        assert_eq!(egg.config.startup.user_interaction.len(), 1);
        assert!(egg.script.privileged);
        assert_eq!(egg.script.extends, None);
    }
}
