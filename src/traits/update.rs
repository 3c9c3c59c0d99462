//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::error::Result;

/// Update an existing entity.
///
/// # Example
///
/// ```ignore
/// use pteroapi::{ApplicationScope, Location, LocationParams, Update};
///
/// let admin = ApplicationScope::from_env()?;
/// let location = Location::update(
///     &admin,
///     3,
///     LocationParams {
///         short: "eu-west".to_string(),
///         long: "Amsterdam".to_string(),
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// Credentials required to modify this entity.
    type Scope: Sync;

    /// The ID type for this entity.
    type Id: Send;

    /// Parameters for the update.
    type Params: Send;

    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(scope: &Self::Scope, id: Self::Id, params: Self::Params) -> Result<Self>;
}
