//! Collaborators that sit beside the coordinator.
//!
//! Nothing here is reachable from the scroll, snap or render paths; a failing
//! extension can never stall the stage.

#[cfg(feature = "remote-stats")]
pub mod github;
pub mod stats;

#[cfg(feature = "remote-stats")]
pub use github::GithubStatsSource;
pub use stats::{
    ReleaseSummary, RepoRef, RepoStats, RepositoryMeta, StatsSource, format_count,
    load_repo_stats, parse_releases_json, parse_repository_json,
};
