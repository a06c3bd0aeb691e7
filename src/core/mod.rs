pub mod ease;
pub mod keyframe;
pub mod layout;
pub mod phase;
pub mod progress;
pub mod scrub;
pub mod timeline;
pub mod types;

pub use ease::Ease;
pub use keyframe::{KeyframeBinding, Length, ProgressWindow, Property, PropertySet, VisualState};
pub use layout::{LayoutInput, SectionKind, SectionPlacement, StageLayout, measure_layout};
pub use phase::{Phase, PhaseTemplate};
pub use progress::{boundary_progress, denormalize_position, local_progress, normalize_offset};
pub use scrub::ScrubState;
pub use timeline::{SectionTimeline, TimelineBuilder, TimelineSample};
pub use types::{ScrollRange, SectionId, TargetId, Viewport};
