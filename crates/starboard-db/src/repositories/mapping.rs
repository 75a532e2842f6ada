//! PostgreSQL implementation of MappingRepository

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use starboard_core::{MappingRepository, MetricsSink, RepoResult, Snowflake, StarboardMapping};

use crate::mappers::MappingUpsert;
use crate::models::StarboardMappingModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MappingRepository
///
/// Each call checks a connection out of the pool only for its own query.
#[derive(Clone)]
pub struct PgMappingRepository {
    pool: PgPool,
    metrics: Arc<dyn MetricsSink>,
}

impl PgMappingRepository {
    /// Create a new PgMappingRepository
    pub fn new(pool: PgPool, metrics: Arc<dyn MetricsSink>) -> Self {
        Self { pool, metrics }
    }

    /// Run a store operation and report how long it took
    async fn timed<T, F>(&self, op: F) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let started = Instant::now();
        let result = op.await;
        self.metrics.record_store_operation(started.elapsed());
        result
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    #[instrument(skip(self))]
    async fn get(&self, original_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        let row = self
            .timed(
                sqlx::query_as::<_, (i64,)>(
                    r"
                    SELECT starboard_message_id
                    FROM starboard_mapping
                    WHERE message_id = $1
                    ",
                )
                .bind(original_id.into_inner())
                .fetch_optional(&self.pool),
            )
            .await
            .map_err(map_db_error)?;

        Ok(row.map(|(id,)| Snowflake::new(id)))
    }

    #[instrument(skip(self))]
    async fn find(&self, original_id: Snowflake) -> RepoResult<Option<StarboardMapping>> {
        let result = self
            .timed(
                sqlx::query_as::<_, StarboardMappingModel>(
                    r"
                    SELECT message_id, starboard_message_id, stars, updated_at
                    FROM starboard_mapping
                    WHERE message_id = $1
                    ",
                )
                .bind(original_id.into_inner())
                .fetch_optional(&self.pool),
            )
            .await
            .map_err(map_db_error)?;

        Ok(result.map(StarboardMapping::from))
    }

    #[instrument(skip(self))]
    async fn upsert(
        &self,
        original_id: Snowflake,
        mirrored_id: Snowflake,
        star_count: u32,
    ) -> RepoResult<()> {
        let row = MappingUpsert::new(original_id, mirrored_id, star_count);

        self.timed(
            sqlx::query(
                r"
                INSERT INTO starboard_mapping (message_id, starboard_message_id, stars, updated_at)
                VALUES ($1, $2, $3, CURRENT_TIMESTAMP)
                ON CONFLICT (message_id) DO UPDATE SET
                    starboard_message_id = EXCLUDED.starboard_message_id,
                    stars = EXCLUDED.stars,
                    updated_at = CURRENT_TIMESTAMP
                ",
            )
            .bind(row.message_id)
            .bind(row.starboard_message_id)
            .bind(row.stars)
            .execute(&self.pool),
        )
        .await
        .map_err(map_db_error)?;

        debug!(message_id = %original_id, mirrored_id = %mirrored_id, star_count, "Mapping upserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, original_id: Snowflake) -> RepoResult<()> {
        let result = self
            .timed(
                sqlx::query("DELETE FROM starboard_mapping WHERE message_id = $1")
                    .bind(original_id.into_inner())
                    .execute(&self.pool),
            )
            .await
            .map_err(map_db_error)?;

        debug!(
            message_id = %original_id,
            removed = result.rows_affected(),
            "Mapping removed"
        );
        Ok(())
    }
}
