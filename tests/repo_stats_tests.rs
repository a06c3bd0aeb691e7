use std::cell::Cell;

use scroll_stage::api::{SectionSpec, StageEngine, StageEngineConfig};
use scroll_stage::core::Viewport;
use scroll_stage::extensions::{
    ReleaseSummary, RepoRef, RepoStats, RepositoryMeta, StatsSource, format_count,
    load_repo_stats, parse_releases_json, parse_repository_json,
};
use scroll_stage::render::NullRenderer;
use scroll_stage::{StageError, StageResult};

struct FixtureSource {
    repository: Option<&'static str>,
    releases: Option<&'static str>,
    calls: Cell<usize>,
}

impl StatsSource for FixtureSource {
    fn repository(&self, _repo: &RepoRef) -> StageResult<RepositoryMeta> {
        self.calls.set(self.calls.get() + 1);
        match self.repository {
            Some(body) => parse_repository_json(body),
            None => Err(StageError::Stats("connection refused".to_owned())),
        }
    }

    fn releases(&self, _repo: &RepoRef) -> StageResult<Vec<ReleaseSummary>> {
        self.calls.set(self.calls.get() + 1);
        match self.releases {
            Some(body) => parse_releases_json(body),
            None => Err(StageError::Stats("connection refused".to_owned())),
        }
    }
}

const REPOSITORY: &str = r#"{"full_name":"get-virgil/cracker-barrel","stargazers_count":12345,"forks_count":678}"#;

const RELEASES: &str = r#"[
    {"tag_name":"v0.3.0","name":"Harvest","published_at":"2025-03-01T12:00:00Z","prerelease":false},
    {"tag_name":"v0.3.0-rc.1","name":"","published_at":"2025-02-20T08:30:00Z","prerelease":true},
    {"tag_name":"v0.2.0","name":null,"published_at":null}
]"#;

fn repo() -> RepoRef {
    RepoRef::new("get-virgil", "cracker-barrel")
}

#[test]
fn both_fetches_populate_the_counters() {
    let source = FixtureSource {
        repository: Some(REPOSITORY),
        releases: Some(RELEASES),
        calls: Cell::new(0),
    };
    let stats = load_repo_stats(&source, &repo(), 2);
    assert_eq!(stats.stars, 12_345);
    assert_eq!(stats.forks, 678);
    assert_eq!(stats.releases, 3);
    assert_eq!(stats.recent_releases.len(), 2);
    assert_eq!(stats.recent_releases[0].tag, "v0.3.0");
    assert_eq!(stats.recent_releases[0].name.as_deref(), Some("Harvest"));
    assert_eq!(stats.recent_releases[1].name, None);
    assert!(stats.recent_releases[1].prerelease);
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn total_failure_yields_zero_counters() {
    let source = FixtureSource {
        repository: None,
        releases: None,
        calls: Cell::new(0),
    };
    assert_eq!(load_repo_stats(&source, &repo(), 5), RepoStats::default());
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn one_failed_fetch_keeps_the_other() {
    let source = FixtureSource {
        repository: Some(REPOSITORY),
        releases: Some(r#"{"message":"API rate limit exceeded"}"#),
        calls: Cell::new(0),
    };
    let stats = load_repo_stats(&source, &repo(), 5);
    assert_eq!(stats.stars, 12_345);
    assert_eq!(stats.releases, 0);
    assert!(stats.recent_releases.is_empty());
}

#[test]
fn missing_counters_read_as_zero() {
    let meta = parse_repository_json(r#"{"stargazers_count":null}"#).expect("repository");
    assert_eq!(meta, RepositoryMeta::default());
    assert!(parse_repository_json("not json").is_err());
}

#[test]
fn release_dates_are_parsed() {
    let releases = parse_releases_json(RELEASES).expect("releases");
    let published = releases[0].published_at.expect("published date");
    assert_eq!(published.to_rfc3339(), "2025-03-01T12:00:00+00:00");
    assert!(releases[2].published_at.is_none());
    assert!(!releases[2].prerelease);
}

#[test]
fn counters_format_with_thousands_separators() {
    assert_eq!(format_count(12_345), "12,345");
    assert_eq!(format_count(678), "678");
}

#[test]
fn stats_failure_leaves_the_stage_intact() {
    let config = StageEngineConfig::new(Viewport::new(1000, 800));
    let mut engine = StageEngine::new(
        NullRenderer::default(),
        config,
        vec![SectionSpec::pinned("hero"), SectionSpec::reveal("community", 1.0)],
    )
    .expect("engine init");
    engine.mount().expect("mount");
    assert!(engine.layout_ready());

    let source = FixtureSource {
        repository: None,
        releases: None,
        calls: Cell::new(0),
    };
    let stats = load_repo_stats(&source, &repo(), 5);
    assert_eq!(stats, RepoStats::default());

    engine.scroll_to(200.0).expect("scroll");
    assert!(engine.has_snap_rule());
    let position = engine.normalized_scroll().expect("overflow");
    assert!(engine.compute_snap_target(position) > position);
}
