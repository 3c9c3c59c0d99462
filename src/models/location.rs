//! Location model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Record, Wrapped};
use crate::scope::ApplicationScope;
use crate::traits::{Get, List, Update};

/// A group of nodes, usually one datacenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    /// Short code (e.g. "us-east").
    pub short: String,
    /// Free-form description.
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Location {}

/// Names accepted when creating or renaming a location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationParams {
    pub short: String,
    pub long: String,
}

#[async_trait]
impl Get for Location {
    type Scope = ApplicationScope;
    type Id = u64;

    #[tracing::instrument(skip(scope))]
    async fn get(scope: &Self::Scope, id: u64) -> Result<Self> {
        let wrapped: Wrapped<Location> = scope.get_json(&format!("locations/{id}")).await?;
        Ok(wrapped.attributes)
    }
}

#[async_trait]
impl List for Location {
    type Scope = ApplicationScope;
    type Query = ();

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, _query: &()) -> Result<Vec<Self>> {
        scope.list_all("locations").await
    }
}

#[async_trait]
impl Update for Location {
    type Scope = ApplicationScope;
    type Id = u64;
    type Params = LocationParams;

    #[tracing::instrument(skip(scope))]
    async fn update(scope: &Self::Scope, id: u64, params: LocationParams) -> Result<Self> {
        let wrapped: Wrapped<Location> = scope
            .send_json_for(&format!("locations/{id}"), Method::PATCH, &params)
            .await?;
        Ok(wrapped.attributes)
    }
}

impl ApplicationScope {
    /// Create a location and return it as the panel stored it.
    #[tracing::instrument(skip(self))]
    pub async fn create_location(&self, short: &str, long: &str) -> Result<Location> {
        let params = LocationParams {
            short: short.to_string(),
            long: long.to_string(),
        };
        let wrapped: Wrapped<Location> = self
            .send_json_for("locations", Method::POST, &params)
            .await?;
        Ok(wrapped.attributes)
    }

    /// Delete a location. The panel refuses while nodes still use it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_location(&self, id: u64) -> Result<()> {
        self.query(&format!("locations/{id}"), Method::DELETE, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_deserialize() {
        let json = r#"{
            "id": 1,
            "short": "us.nyc.lvl3",
            "long": "New York",
            "updated_at": "2018-01-01T00:00:00+00:00",
            "created_at": "2018-01-01T00:00:00+00:00"
        }"#;
        let location: Location = serde_json::from_str(json).unwrap();

        assert_eq!(location.short, "us.nyc.lvl3");
        assert_eq!(location.long.as_deref(), Some("New York"));
    }

    #[test]
    fn test_location_without_description() {
        let location: Location =
            serde_json::from_str(r#"{"id": 2, "short": "eu", "long": null}"#).unwrap();
        assert_eq!(location.long, None);
        assert!(location.created_at.is_none());
    }
}
