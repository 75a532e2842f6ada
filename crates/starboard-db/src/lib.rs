//! # starboard-db
//!
//! Database layer implementing the mapping store with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema bootstrap
//! - The `starboard_mapping` row model with SQLx `FromRow`
//! - Model -> entity mapper
//! - `PgMappingRepository`, the `MappingRepository` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use starboard_common::DatabaseConfig;
//! use starboard_core::{MappingRepository, NoopMetrics};
//! use starboard_db::{create_pool, run_migrations, PgMappingRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let repo = PgMappingRepository::new(pool, Arc::new(NoopMetrics));
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool};
pub use repositories::PgMappingRepository;
