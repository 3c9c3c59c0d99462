//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::error::Result;

/// Fetch a single entity by ID.
///
/// The scope type says which credentials can see the entity: a
/// [`ClientServer`](crate::ClientServer) is fetched with a
/// [`ClientScope`](crate::ClientScope), an
/// [`ApplicationServer`](crate::ApplicationServer) with an
/// [`ApplicationScope`](crate::ApplicationScope).
///
/// # Example
///
/// ```ignore
/// use pteroapi::{ApplicationScope, Get, User};
///
/// let admin = ApplicationScope::from_env()?;
/// let user = User::get(&admin, 1).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// Credentials required to fetch this entity.
    type Scope: Sync;

    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(scope: &Self::Scope, id: Self::Id) -> Result<Self>;
}
