use thiserror::Error;

use crate::core::SectionId;

pub type StageResult<T> = Result<T, StageError>;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid progress window: start={start}, end={end}")]
    InvalidWindow { start: f64, end: f64 },

    #[error("invalid scroll range: start={start}, end={end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("pinned ranges overlap: `{first}` and `{second}`")]
    OverlappingRanges { first: SectionId, second: SectionId },

    #[error("section `{0}` is declared more than once")]
    DuplicateSection(SectionId),

    #[error("unknown section `{0}`")]
    UnknownSection(SectionId),

    #[error("stale pin batch: opened at generation {opened}, registry is at {current}")]
    StaleBatch { opened: u64, current: u64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("stats unavailable: {0}")]
    Stats(String),
}
