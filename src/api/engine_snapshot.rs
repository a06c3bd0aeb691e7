use serde::{Deserialize, Serialize};

use crate::core::{Phase, ScrollRange, SectionId, Viewport};
use crate::error::{StageError, StageResult};
use crate::interaction::GestureMode;
use crate::render::Renderer;

use super::{LifecyclePhase, PinnedRangeSummary, StageEngine};

pub const STAGE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub id: SectionId,
    pub pinned: bool,
    pub trigger: Option<ScrollRange>,
    pub progress: f64,
    pub displayed_progress: f64,
    pub phase: Phase,
}

/// Serializable deterministic state snapshot used by regression tests and
/// the trace tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub viewport: Viewport,
    pub lifecycle: LifecyclePhase,
    pub gesture: GestureMode,
    pub scroll_offset: f64,
    pub max_scroll: Option<f64>,
    pub normalized_scroll: Option<f64>,
    pub registry_generation: u64,
    pub sections: Vec<SectionSnapshot>,
    pub snap_summaries: Vec<PinnedRangeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: StageSnapshot,
}

impl<R: Renderer> StageEngine<R> {
    #[must_use]
    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            viewport: self.viewport,
            lifecycle: self.lifecycle,
            gesture: self.gesture.mode(),
            scroll_offset: self.scroll_offset,
            max_scroll: self.max_scroll(),
            normalized_scroll: self.normalized_scroll(),
            registry_generation: self.registry.generation(),
            sections: self
                .sections
                .iter()
                .map(|section| SectionSnapshot {
                    id: section.id.clone(),
                    pinned: section.kind.is_pinned(),
                    trigger: section.trigger,
                    progress: section.scrub.target(),
                    displayed_progress: section.scrub.current(),
                    phase: section.timeline.phase_at(section.scrub.current()),
                })
                .collect(),
            snap_summaries: self.snap_summaries().to_vec(),
        }
    }

    pub fn snapshot_json_pretty(&self) -> StageResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| StageError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}

impl StageSnapshot {
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&SectionSnapshot> {
        self.sections.iter().find(|section| &section.id == id)
    }

    pub fn to_json_contract_v1_pretty(&self) -> StageResult<String> {
        let payload = StageSnapshotJsonContractV1 {
            schema_version: STAGE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            StageError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned v1 contract.
    pub fn from_json_compat_str(input: &str) -> StageResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<StageSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: StageSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            StageError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != STAGE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(StageError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
