use crate::core::ScrollRange;

/// Maps a raw scroll offset onto a range's local progress.
///
/// The result is clamped to `[0, 1]`. A zero-height range yields `0`.
#[must_use]
pub fn local_progress(offset: f64, range: ScrollRange) -> f64 {
    let span = range.span();
    if span <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    ((offset - range.start()) / span).clamp(0.0, 1.0)
}

/// Converts an absolute offset into a normalized document position.
///
/// Returns `None` when the document has no scrollable overflow.
#[must_use]
pub fn normalize_offset(offset: f64, max_scroll: f64) -> Option<f64> {
    if !max_scroll.is_finite() || max_scroll <= 0.0 || !offset.is_finite() {
        return None;
    }
    Some((offset / max_scroll).clamp(0.0, 1.0))
}

/// Converts a normalized document position back into an absolute offset.
#[must_use]
pub fn denormalize_position(position: f64, max_scroll: f64) -> f64 {
    position.clamp(0.0, 1.0) * max_scroll.max(0.0)
}

/// Progress boundary a section settles on once the offset leaves its range.
#[must_use]
pub fn boundary_progress(offset: f64, range: ScrollRange) -> Option<f64> {
    if offset < range.start() {
        Some(0.0)
    } else if offset > range.end() {
        Some(1.0)
    } else {
        None
    }
}
