use std::time::Duration;

use crate::error::{StageError, StageResult};

use super::stats::{
    ReleaseSummary, RepoRef, RepositoryMeta, StatsSource, parse_releases_json,
    parse_repository_json,
};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("scroll-stage/", env!("CARGO_PKG_VERSION"));

/// Blocking GitHub REST client for repository counters.
#[derive(Debug, Clone)]
pub struct GithubStatsSource {
    client: reqwest::blocking::Client,
    api_base: String,
}

impl GithubStatsSource {
    pub fn new() -> StageResult<Self> {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Points the client at another API root (mirrors, test servers).
    pub fn with_api_base(api_base: impl Into<String>) -> StageResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(12))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StageError::Stats(format!("reqwest client error: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
        })
    }

    fn get_text(&self, url: &str) -> StageResult<String> {
        self.client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| StageError::Stats(format!("github request error: {e}")))?
            .text()
            .map_err(|e| StageError::Stats(format!("github body error: {e}")))
    }
}

impl StatsSource for GithubStatsSource {
    fn repository(&self, repo: &RepoRef) -> StageResult<RepositoryMeta> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name);
        parse_repository_json(&self.get_text(&url)?)
    }

    fn releases(&self, repo: &RepoRef) -> StageResult<Vec<ReleaseSummary>> {
        let url = format!(
            "{}/repos/{}/{}/releases",
            self.api_base, repo.owner, repo.name
        );
        parse_releases_json(&self.get_text(&url)?)
    }
}
