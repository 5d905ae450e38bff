/// User resolution seam for the feed
///
/// The feed never owns user accounts. It resolves owners and reactors through
/// this trait so the account store can be swapped (in-memory directory, a
/// remote identity service, a test double).
use crate::error::Result;
use crate::models::UserIdentity;
use async_trait::async_trait;

#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Resolve one user; `AppError::NotFound` when the id is unknown
    async fn get_by_id(&self, id: i64) -> Result<UserIdentity>;

    /// Resolve many users in one call; unknown ids are omitted and the result
    /// order is unspecified
    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<UserIdentity>>;
}
