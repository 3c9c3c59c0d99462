//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::error::Result;

/// Fetch a whole collection of entities.
///
/// Paginated collections are followed to their last page before this
/// returns; records keep the order the panel sent them in.
///
/// # Example
///
/// ```ignore
/// use pteroapi::{ApplicationScope, Egg, List, User};
///
/// let admin = ApplicationScope::from_env()?;
///
/// // Every user, across all pages
/// let users = User::list(&admin, &()).await?;
///
/// // Eggs of nest 1
/// let eggs = Egg::list(&admin, &1).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Credentials required to list this entity.
    type Scope: Sync;

    /// What the collection is scoped to (a parent ID, or `()`).
    type Query: Send + Sync;

    /// List every entity in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails. Nothing is returned
    /// for a partially fetched collection.
    async fn list(scope: &Self::Scope, query: &Self::Query) -> Result<Vec<Self>>;
}
