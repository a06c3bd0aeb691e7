use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PinRegistry, PinnedEntry};

/// Normalized view of one pinned range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinnedRangeSummary {
    pub normalized_start: f64,
    pub normalized_end: f64,
    pub normalized_center: f64,
}

impl PinnedRangeSummary {
    /// Divides absolute boundaries by the maximum scroll offset.
    #[must_use]
    pub fn from_entry(entry: &PinnedEntry, max_scroll: f64) -> Self {
        let normalize = |value: f64| (value / max_scroll).clamp(0.0, 1.0);
        Self {
            normalized_start: normalize(entry.range.start()),
            normalized_end: normalize(entry.range.end()),
            normalized_center: normalize(entry.range.center()),
        }
    }

    #[must_use]
    pub fn contains_with_tolerance(self, value: f64, tolerance: f64) -> bool {
        value >= self.normalized_start - tolerance && value <= self.normalized_end + tolerance
    }
}

/// Summaries in scroll order; empty when there is no scrollable overflow.
#[must_use]
pub fn summarize_pins(entries: &[PinnedEntry], max_scroll: f64) -> Vec<PinnedRangeSummary> {
    if !max_scroll.is_finite() || max_scroll <= 0.0 {
        return Vec::new();
    }
    entries
        .iter()
        .map(|entry| PinnedRangeSummary::from_entry(entry, max_scroll))
        .collect()
}

/// The single document-wide snapping function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapRule {
    summaries: Vec<PinnedRangeSummary>,
    tolerance: f64,
}

impl SnapRule {
    /// `summaries` must be in scroll order; ties resolve to the earlier one.
    #[must_use]
    pub fn new(summaries: Vec<PinnedRangeSummary>, tolerance: f64) -> Self {
        Self {
            summaries,
            tolerance,
        }
    }

    /// Returns `None` when nothing pins or the document cannot scroll.
    #[must_use]
    pub fn from_registry(registry: &PinRegistry, max_scroll: f64, tolerance: f64) -> Option<Self> {
        let summaries = summarize_pins(&registry.list(), max_scroll);
        if summaries.is_empty() {
            return None;
        }
        Some(Self::new(summaries, tolerance))
    }

    #[must_use]
    pub fn summaries(&self) -> &[PinnedRangeSummary] {
        &self.summaries
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Maps a normalized scroll position to its snap destination.
    ///
    /// Outside every tolerance-expanded range the input is returned as is.
    /// Once inside any band, the closest center across all pinned ranges
    /// wins; on equal distance the first range in scroll order is kept.
    #[must_use]
    pub fn compute_snap_target(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let in_band = self
            .summaries
            .iter()
            .any(|summary| summary.contains_with_tolerance(value, self.tolerance));
        if !in_band {
            return value;
        }
        let Some((first, rest)) = self.summaries.split_first() else {
            return value;
        };
        rest.iter()
            .fold(first.normalized_center, |closest, summary| {
                if (summary.normalized_center - value).abs() < (closest - value).abs() {
                    summary.normalized_center
                } else {
                    closest
                }
            })
    }
}

/// Owns the installed snap rule for one mount cycle.
#[derive(Debug, Clone, Default)]
pub struct SnapCoordinator {
    rule: Option<SnapRule>,
}

impl SnapCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the rule from the current registry snapshot.
    ///
    /// Any previous rule is replaced. Returns `false` and leaves the
    /// coordinator inert when nothing pins or there is no overflow.
    pub fn install(&mut self, registry: &PinRegistry, max_scroll: f64, tolerance: f64) -> bool {
        self.rule = SnapRule::from_registry(registry, max_scroll, tolerance);
        debug!(
            installed = self.rule.is_some(),
            pinned = registry.len(),
            generation = registry.generation(),
            max_scroll,
            "snap rule evaluated"
        );
        self.rule.is_some()
    }

    /// Drops the rule. Returns `true` when one was installed.
    pub fn teardown(&mut self) -> bool {
        self.rule.take().is_some()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.rule.is_some()
    }

    #[must_use]
    pub fn rule(&self) -> Option<&SnapRule> {
        self.rule.as_ref()
    }

    /// Without an installed rule the input is returned unchanged.
    #[must_use]
    pub fn compute_snap_target(&self, value: f64) -> f64 {
        self.rule
            .as_ref()
            .map_or(value, |rule| rule.compute_snap_target(value))
    }
}
