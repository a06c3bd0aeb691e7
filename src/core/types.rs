use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> StageResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(StageError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Viewport height in scroll units (`1vh * 100`).
    #[must_use]
    pub fn height_px(self) -> f64 {
        f64::from(self.height)
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        f64::from(self.width)
    }
}

/// Stable identity of a page section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity of one animated element inside a section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TargetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Absolute scroll range `[start, end]` in scroll units.
///
/// `start == end` is accepted and treated as a degenerate, zero-height range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScrollRange")]
pub struct ScrollRange {
    start: f64,
    end: f64,
}

#[derive(Deserialize)]
struct RawScrollRange {
    start: f64,
    end: f64,
}

impl TryFrom<RawScrollRange> for ScrollRange {
    type Error = StageError;

    fn try_from(raw: RawScrollRange) -> StageResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl ScrollRange {
    pub fn new(start: f64, end: f64) -> StageResult<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(StageError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.span() == 0.0
    }

    #[must_use]
    pub fn contains(self, offset: f64) -> bool {
        offset >= self.start && offset <= self.end
    }

    #[must_use]
    pub fn center(self) -> f64 {
        self.start + self.span() * 0.5
    }

    /// Strict overlap; ranges sharing only an endpoint are contiguous, not overlapping.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
