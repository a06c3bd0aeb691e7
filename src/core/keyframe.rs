use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Ease, TargetId, Viewport};
use crate::error::{StageError, StageResult};

/// Translation length, resolved against the viewport at sample time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Px(f64),
    /// Percent of viewport height.
    Vh(f64),
    /// Percent of viewport width.
    Vw(f64),
}

impl Length {
    #[must_use]
    pub fn resolve(self, viewport: Viewport) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Vh(vh) => vh * viewport.height_px() / 100.0,
            Self::Vw(vw) => vw * viewport.width_px() / 100.0,
        }
    }

    fn raw(self) -> f64 {
        match self {
            Self::Px(v) | Self::Vh(v) | Self::Vw(v) => v,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    X,
    Y,
    Scale,
    Rotate,
    Opacity,
}

impl Property {
    pub const ALL: [Self; 5] = [Self::X, Self::Y, Self::Scale, Self::Rotate, Self::Opacity];
}

/// Partial property snapshot; unset properties are left to other bindings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl PropertySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn x(mut self, x: Length) -> Self {
        self.x = Some(x);
        self
    }

    #[must_use]
    pub fn y(mut self, y: Length) -> Self {
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn has(&self, property: Property) -> bool {
        match property {
            Property::X => self.x.is_some(),
            Property::Y => self.y.is_some(),
            Property::Scale => self.scale.is_some(),
            Property::Rotate => self.rotate.is_some(),
            Property::Opacity => self.opacity.is_some(),
        }
    }

    #[must_use]
    pub fn properties(&self) -> SmallVec<[Property; 5]> {
        Property::ALL
            .into_iter()
            .filter(|property| self.has(*property))
            .collect()
    }

    #[must_use]
    pub fn resolve(&self, property: Property, viewport: Viewport) -> Option<f64> {
        match property {
            Property::X => self.x.map(|len| len.resolve(viewport)),
            Property::Y => self.y.map(|len| len.resolve(viewport)),
            Property::Scale => self.scale,
            Property::Rotate => self.rotate,
            Property::Opacity => self.opacity,
        }
    }

    fn raw_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.x
            .map(Length::raw)
            .into_iter()
            .chain(self.y.map(Length::raw))
            .chain(self.scale)
            .chain(self.rotate)
            .chain(self.opacity)
    }
}

/// Fully resolved visual state of one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub opacity: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            opacity: 1.0,
        }
    }
}

impl VisualState {
    pub fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Scale => self.scale = value,
            Property::Rotate => self.rotate = value,
            Property::Opacity => self.opacity = value,
        }
    }

    #[must_use]
    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::Scale => self.scale,
            Property::Rotate => self.rotate,
            Property::Opacity => self.opacity,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        Property::ALL
            .into_iter()
            .all(|property| self.get(property).is_finite())
    }
}

/// Slice of local progress over which a binding is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressWindow {
    start: f64,
    end: f64,
}

impl ProgressWindow {
    pub fn new(start: f64, end: f64) -> StageResult<Self> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(start) || !in_unit(end) || start > end {
            return Err(StageError::InvalidWindow { start, end });
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
    pub fn contains(self, progress: f64) -> bool {
        progress >= self.start && progress <= self.end
    }

    /// Linear fraction of the window reached at `progress`.
    ///
    /// Below the window this is `0`, above it `1`. A zero-width window jumps
    /// to `1` once reached.
    #[must_use]
    pub fn fraction(self, progress: f64) -> f64 {
        if progress < self.start {
            0.0
        } else if progress >= self.end {
            1.0
        } else {
            (progress - self.start) / (self.end - self.start)
        }
    }
}

/// One property transition inside a section timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeBinding {
    target: TargetId,
    from: PropertySet,
    to: PropertySet,
    window: ProgressWindow,
    ease: Ease,
}

impl KeyframeBinding {
    pub fn new(
        target: TargetId,
        from: PropertySet,
        to: PropertySet,
        window: ProgressWindow,
        ease: Ease,
    ) -> StageResult<Self> {
        let binding = Self {
            target,
            from,
            to,
            window,
            ease,
        };
        binding.validate()?;
        Ok(binding)
    }

    /// Re-checks invariants; used after deserialization.
    pub fn validate(&self) -> StageResult<()> {
        ProgressWindow::new(self.window.start, self.window.end)?;
        if self.from.properties() != self.to.properties() {
            return Err(StageError::InvalidData(format!(
                "binding for `{}` animates different properties in from/to states",
                self.target
            )));
        }
        if self.from.properties().is_empty() {
            return Err(StageError::InvalidData(format!(
                "binding for `{}` animates no properties",
                self.target
            )));
        }
        if !self
            .from
            .raw_values()
            .chain(self.to.raw_values())
            .all(f64::is_finite)
        {
            return Err(StageError::InvalidData(format!(
                "binding for `{}` has non-finite property values",
                self.target
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    #[must_use]
    pub fn from_state(&self) -> &PropertySet {
        &self.from
    }

    #[must_use]
    pub fn to_state(&self) -> &PropertySet {
        &self.to
    }

    #[must_use]
    pub fn window(&self) -> ProgressWindow {
        self.window
    }

    #[must_use]
    pub fn ease(&self) -> Ease {
        self.ease
    }

    #[must_use]
    pub fn has_started(&self, progress: f64) -> bool {
        progress >= self.window.start
    }

    /// Interpolated value of `property` at `progress`, if this binding animates it.
    #[must_use]
    pub fn value_at(&self, property: Property, progress: f64, viewport: Viewport) -> Option<f64> {
        let from = self.from.resolve(property, viewport)?;
        let to = self.to.resolve(property, viewport)?;
        let t = self.ease.apply(self.window.fraction(progress));
        Some(from + (to - from) * t)
    }
}
