//! Traits (ports) the starboard needs from its collaborators

mod collaborators;
mod repositories;

pub use collaborators::{MessageSource, MetricsSink, MirrorResult, MirrorSink, NoopMetrics};
pub use repositories::{MappingRepository, RepoResult};
