//! scroll-stage: scroll-to-timeline coordinator.
//!
//! Sections declare keyframed timelines driven by local scroll progress;
//! pinned sections register their scroll ranges and one global snap rule
//! pulls the viewport toward the nearest pinned center after a gesture.
//! The engine is host-agnostic: hosts feed offsets, resizes and frame ticks
//! and apply the resolved states through a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{StageEngine, StageEngineConfig, StageManifest};
pub use error::{StageError, StageResult};
