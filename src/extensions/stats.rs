use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StageError, StageResult};

/// `owner/name` pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = StageError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(StageError::InvalidData(format!(
                "repository must be `owner/name`, got `{input}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepositoryMeta {
    pub stars: u64,
    pub forks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub tag: String,
    pub name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub prerelease: bool,
}

/// Decorative counters shown next to the stage.
///
/// The default (all zero, no releases) is also what a failed fetch yields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub releases: usize,
    pub recent_releases: Vec<ReleaseSummary>,
}

/// Read-only source of repository metadata.
///
/// The two calls are independent: one failing never discards the other.
pub trait StatsSource {
    fn repository(&self, repo: &RepoRef) -> StageResult<RepositoryMeta>;
    fn releases(&self, repo: &RepoRef) -> StageResult<Vec<ReleaseSummary>>;
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    forks_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    prerelease: bool,
}

/// Parses a GitHub repository payload. Missing or null counters read as 0.
pub fn parse_repository_json(input: &str) -> StageResult<RepositoryMeta> {
    let raw: RawRepository = serde_json::from_str(input)
        .map_err(|e| StageError::Stats(format!("failed to parse repository payload: {e}")))?;
    Ok(RepositoryMeta {
        stars: raw.stargazers_count.unwrap_or(0),
        forks: raw.forks_count.unwrap_or(0),
    })
}

/// Parses a GitHub releases page, newest first.
///
/// A payload that is not an array (rate-limit or error bodies) is an error.
pub fn parse_releases_json(input: &str) -> StageResult<Vec<ReleaseSummary>> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| StageError::Stats(format!("failed to parse releases payload: {e}")))?;
    if !value.is_array() {
        return Err(StageError::Stats(
            "releases payload is not an array".to_owned(),
        ));
    }
    let raw: Vec<RawRelease> = serde_json::from_value(value)
        .map_err(|e| StageError::Stats(format!("failed to decode releases: {e}")))?;
    Ok(raw
        .into_iter()
        .map(|release| ReleaseSummary {
            tag: release.tag_name,
            name: release.name.filter(|name| !name.trim().is_empty()),
            published_at: release.published_at,
            prerelease: release.prerelease,
        })
        .collect())
}

/// Fetches both payloads, falling back to zero/empty per failed call.
///
/// Failures are logged and never surfaced.
pub fn load_repo_stats(
    source: &dyn StatsSource,
    repo: &RepoRef,
    recent_limit: usize,
) -> RepoStats {
    let meta = source.repository(repo).unwrap_or_else(|err| {
        warn!(repo = %repo, error = %err, "repository stats unavailable; using defaults");
        RepositoryMeta::default()
    });
    let releases = source.releases(repo).unwrap_or_else(|err| {
        warn!(repo = %repo, error = %err, "release list unavailable; using defaults");
        Vec::new()
    });

    let stats = RepoStats {
        stars: meta.stars,
        forks: meta.forks,
        releases: releases.len(),
        recent_releases: releases.into_iter().take(recent_limit).collect(),
    };
    debug!(
        repo = %repo,
        stars = stats.stars,
        forks = stats.forks,
        releases = stats.releases,
        "repository stats loaded"
    );
    stats
}

/// Formats a counter with `,` thousands separators (`12345` -> `12,345`).
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{RepoRef, format_count};

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn repo_ref_parses_owner_and_name() {
        let repo: RepoRef = "get-virgil/cracker-barrel".parse().expect("repo ref");
        assert_eq!(repo.owner, "get-virgil");
        assert_eq!(repo.name, "cracker-barrel");
        assert_eq!(repo.to_string(), "get-virgil/cracker-barrel");
        assert!("no-slash".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }
}
