//! Database models - SQLx-compatible structs for PostgreSQL tables

mod mapping;

pub use mapping::StarboardMappingModel;
