use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ScrollRange, SectionId};
use crate::error::{StageError, StageResult};

/// One registered pinned range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedEntry {
    pub section: SectionId,
    pub range: ScrollRange,
}

/// Registry of pinned sections and their absolute scroll ranges.
///
/// Single writes go through `register`/`unregister`. Re-measurement passes
/// stage their writes in a [`PinBatch`] and publish them with `commit`, so a
/// reader only ever sees the set before or after the whole pass.
#[derive(Debug, Clone, Default)]
pub struct PinRegistry {
    entries: IndexMap<SectionId, ScrollRange>,
    generation: u64,
}

impl PinRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every published change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, section: &SectionId) -> Option<ScrollRange> {
        self.entries.get(section).copied()
    }

    /// Stores or overwrites one section's range.
    pub fn register(&mut self, section: SectionId, range: ScrollRange) -> StageResult<()> {
        if let Some((other, _)) = self
            .entries
            .iter()
            .find(|(id, existing)| **id != section && existing.overlaps(range))
        {
            return Err(StageError::OverlappingRanges {
                first: other.clone(),
                second: section,
            });
        }
        trace!(section = %section, start = range.start(), end = range.end(), "register pin");
        self.entries.insert(section, range);
        self.generation += 1;
        Ok(())
    }

    /// Removes one section. Returns `true` when it was registered.
    pub fn unregister(&mut self, section: &SectionId) -> bool {
        let removed = self.entries.shift_remove(section).is_some();
        if removed {
            trace!(section = %section, "unregister pin");
            self.generation += 1;
        }
        removed
    }

    /// Drops every registration. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        if removed > 0 {
            self.entries.clear();
            self.generation += 1;
        }
        removed
    }

    /// Entries in scroll order.
    #[must_use]
    pub fn list(&self) -> Vec<PinnedEntry> {
        sorted_entries(&self.entries)
    }

    /// Opens a staging copy of the current set.
    #[must_use]
    pub fn begin_batch(&self) -> PinBatch {
        PinBatch {
            opened_at: self.generation,
            entries: self.entries.clone(),
        }
    }

    /// Publishes a batch as one consistent set.
    ///
    /// Fails without touching the registry when the batch is stale or its
    /// ranges overlap.
    pub fn commit(&mut self, batch: PinBatch) -> StageResult<()> {
        if batch.opened_at != self.generation {
            return Err(StageError::StaleBatch {
                opened: batch.opened_at,
                current: self.generation,
            });
        }
        let ordered = sorted_entries(&batch.entries);
        for pair in ordered.windows(2) {
            if pair[0].range.overlaps(pair[1].range) {
                return Err(StageError::OverlappingRanges {
                    first: pair[0].section.clone(),
                    second: pair[1].section.clone(),
                });
            }
        }

        self.entries = batch.entries;
        self.generation += 1;
        debug!(
            pinned = self.entries.len(),
            generation = self.generation,
            "pin batch committed"
        );
        Ok(())
    }
}

fn sorted_entries(entries: &IndexMap<SectionId, ScrollRange>) -> Vec<PinnedEntry> {
    let mut list: Vec<PinnedEntry> = entries
        .iter()
        .map(|(section, range)| PinnedEntry {
            section: section.clone(),
            range: *range,
        })
        .collect();
    list.sort_by_key(|entry| (OrderedFloat(entry.range.start()), OrderedFloat(entry.range.end())));
    list
}

/// Staged registry writes, published with [`PinRegistry::commit`].
#[derive(Debug, Clone)]
pub struct PinBatch {
    opened_at: u64,
    entries: IndexMap<SectionId, ScrollRange>,
}

impl PinBatch {
    pub fn register(&mut self, section: SectionId, range: ScrollRange) {
        self.entries.insert(section, range);
    }

    pub fn unregister(&mut self, section: &SectionId) -> bool {
        self.entries.shift_remove(section).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
