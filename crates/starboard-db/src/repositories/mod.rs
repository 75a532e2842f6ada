//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in starboard-core.

mod error;
mod mapping;

pub use mapping::PgMappingRepository;
