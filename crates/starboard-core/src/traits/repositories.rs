//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::StarboardMapping;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Mapping Repository
// ============================================================================

/// Durable original-message -> mirrored-post association
///
/// Every operation is atomic per key. Failures are returned as
/// `DomainError::DatabaseError` and must not be swallowed by callers.
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Get the mirrored message id for an original message
    async fn get(&self, original_id: Snowflake) -> RepoResult<Option<Snowflake>>;

    /// Get the full mapping row for an original message
    async fn find(&self, original_id: Snowflake) -> RepoResult<Option<StarboardMapping>>;

    /// Insert or replace the row for `original_id` (last writer wins)
    async fn upsert(
        &self,
        original_id: Snowflake,
        mirrored_id: Snowflake,
        star_count: u32,
    ) -> RepoResult<()>;

    /// Delete the row if present; removing an absent key is not an error
    async fn remove(&self, original_id: Snowflake) -> RepoResult<()>;
}
