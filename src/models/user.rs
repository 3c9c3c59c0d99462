//! User model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Record, Wrapped};
use crate::scope::ApplicationScope;
use crate::traits::{Get, List, Update};

/// A panel user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,

    /// ID in an external system, if one was set.
    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default)]
    pub uuid: String,

    pub username: String,

    pub email: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Interface language (e.g. "en").
    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub root_admin: bool,

    /// Whether two-factor authentication is enabled.
    #[serde(rename = "2fa", default)]
    pub two_factor: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for User {}

impl User {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Fields accepted when creating or updating a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Left out of the request when `None`; the panel keeps or emails one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub root_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl UserParams {
    /// Set the password sent with the request.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl From<&User> for UserParams {
    fn from(u: &User) -> Self {
        Self {
            external_id: u.external_id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            password: None,
            root_admin: u.root_admin,
            language: Some(u.language.clone()).filter(|l| !l.is_empty()),
        }
    }
}

#[async_trait]
impl Get for User {
    type Scope = ApplicationScope;
    type Id = u64;

    #[tracing::instrument(skip(scope))]
    async fn get(scope: &Self::Scope, id: u64) -> Result<Self> {
        let wrapped: Wrapped<User> = scope.get_json(&format!("users/{id}")).await?;
        Ok(wrapped.attributes)
    }
}

#[async_trait]
impl List for User {
    type Scope = ApplicationScope;
    type Query = ();

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, _query: &()) -> Result<Vec<Self>> {
        scope.list_all("users").await
    }
}

#[async_trait]
impl Update for User {
    type Scope = ApplicationScope;
    type Id = u64;
    type Params = UserParams;

    #[tracing::instrument(skip(scope, params))]
    async fn update(scope: &Self::Scope, id: u64, params: UserParams) -> Result<Self> {
        let wrapped: Wrapped<User> = scope
            .send_json_for(&format!("users/{id}"), Method::PATCH, &params)
            .await?;
        Ok(wrapped.attributes)
    }
}

impl ApplicationScope {
    /// Fetch a user by the external ID it was created with.
    #[tracing::instrument(skip(self))]
    pub async fn user_by_external_id(&self, external_id: &str) -> Result<User> {
        let external_id = urlencoding::encode(external_id);
        let wrapped: Wrapped<User> = self
            .get_json(&format!("users/external/{external_id}"))
            .await?;
        Ok(wrapped.attributes)
    }

    /// Create a user and return it as the panel stored it.
    #[tracing::instrument(skip(self, params), fields(username = %params.username))]
    pub async fn create_user(&self, params: &UserParams) -> Result<User> {
        let wrapped: Wrapped<User> = self.send_json_for("users", Method::POST, params).await?;
        Ok(wrapped.attributes)
    }

    /// Delete a user.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: u64) -> Result<()> {
        self.query(&format!("users/{id}"), Method::DELETE, None)
            .await?;
        Ok(())
    }
}
