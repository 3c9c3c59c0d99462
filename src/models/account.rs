//! Account settings for the client token's owner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{Record, Wrapped};
use crate::scope::ClientScope;
use crate::traits::List;

/// The account a client token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    /// Whether the account is a panel administrator.
    #[serde(default)]
    pub admin: bool,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub language: String,
}

/// A client API key. The secret is only returned when the key is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiKey {
    pub identifier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allowed_ips: Vec<String>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for ApiKey {}

#[derive(Debug, Deserialize)]
struct TwoFactorSetup {
    data: TwoFactorImage,
}

#[derive(Debug, Deserialize)]
struct TwoFactorImage {
    image_url_data: String,
}

#[derive(Debug, Deserialize)]
struct CreatedApiKey {
    attributes: ApiKey,
    meta: SecretMeta,
}

#[derive(Debug, Deserialize)]
struct SecretMeta {
    secret_token: String,
}

#[async_trait]
impl List for ApiKey {
    type Scope = ClientScope;
    type Query = ();

    #[tracing::instrument(skip(scope))]
    async fn list(scope: &Self::Scope, _query: &()) -> Result<Vec<Self>> {
        scope.list_all("account/api-keys").await
    }
}

impl ClientScope {
    /// Fetch the account that owns this token.
    #[tracing::instrument(skip(self))]
    pub async fn account(&self) -> Result<Account> {
        let wrapped: Wrapped<Account> = self.get_json("account").await?;
        Ok(wrapped.attributes)
    }

    /// Start two-factor setup and return the `otpauth://` URL to show as a
    /// QR code.
    #[tracing::instrument(skip(self))]
    pub async fn two_factor_image_url(&self) -> Result<String> {
        let setup: TwoFactorSetup = self.get_json("account/two-factor").await?;
        Ok(setup.data.image_url_data)
    }

    /// Finish two-factor setup with a code from the authenticator.
    #[tracing::instrument(skip(self, code))]
    pub async fn enable_two_factor(&self, code: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            code: &'a str,
        }

        self.send_json("account/two-factor", Method::POST, &Body { code })
            .await?;
        Ok(())
    }

    /// Turn two-factor authentication off.
    #[tracing::instrument(skip(self, password))]
    pub async fn disable_two_factor(&self, password: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
        }

        self.send_json("account/two-factor", Method::DELETE, &Body { password })
            .await?;
        Ok(())
    }

    /// Change the account email. The current password is required.
    #[tracing::instrument(skip(self, password))]
    pub async fn update_email(&self, email: &str, password: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        self.send_json("account/email", Method::PUT, &Body { email, password })
            .await?;
        Ok(())
    }

    /// Change the account password.
    #[tracing::instrument(skip_all)]
    pub async fn update_password(&self, current: &str, new: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            current_password: &'a str,
            password: &'a str,
            password_confirmation: &'a str,
        }

        let body = Body {
            current_password: current,
            password: new,
            password_confirmation: new,
        };
        self.send_json("account/password", Method::PUT, &body).await?;
        Ok(())
    }

    /// Create an API key and return it with its secret.
    ///
    /// An empty `allowed_ips` lets the key be used from anywhere.
    #[tracing::instrument(skip(self))]
    pub async fn create_api_key(
        &self,
        description: &str,
        allowed_ips: &[String],
    ) -> Result<(ApiKey, String)> {
        #[derive(Serialize)]
        struct Body<'a> {
            description: &'a str,
            #[serde(skip_serializing_if = "<[String]>::is_empty")]
            allowed_ips: &'a [String],
        }

        let created: CreatedApiKey = self
            .send_json_for(
                "account/api-keys",
                Method::POST,
                &Body {
                    description,
                    allowed_ips,
                },
            )
            .await?;
        Ok((created.attributes, created.meta.secret_token))
    }

    /// Revoke an API key.
    #[tracing::instrument(skip(self))]
    pub async fn delete_api_key(&self, identifier: &str) -> Result<()> {
        let identifier = urlencoding::encode(identifier);
        self.query(
            &format!("account/api-keys/{identifier}"),
            Method::DELETE,
            None,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserialize() {
        let json = r#"{
            "object": "user",
            "attributes": {
                "id": 1,
                "admin": true,
                "username": "admin",
                "email": "example@example.com",
                "first_name": "RootAdmin",
                "last_name": "User",
                "language": "en"
            }
        }"#;
        let wrapped: Wrapped<Account> = serde_json::from_str(json).unwrap();
        let account = wrapped.attributes;

        assert_eq!(account.id, 1);
        assert!(account.admin);
        assert_eq!(account.first_name, "RootAdmin");
    }

    #[test]
    fn test_created_api_key_deserialize() {
        let json = r#"{
            "object": "api_key",
            "attributes": {
                "identifier": "wWy0ta7ZyCBFXRwB",
                "description": "deploy bot",
                "allowed_ips": ["10.0.0.1"],
                "last_used_at": null,
                "created_at": "2020-06-12T20:00:44+00:00"
            },
            "meta": {"secret_token": "ptlc_secret"}
        }"#;
        let created: CreatedApiKey = serde_json::from_str(json).unwrap();

        assert_eq!(created.attributes.identifier, "wWy0ta7ZyCBFXRwB");
        assert_eq!(created.attributes.allowed_ips, vec!["10.0.0.1"]);
        assert!(created.attributes.last_used_at.is_none());
        assert_eq!(created.meta.secret_token, "ptlc_secret");
    }
}
