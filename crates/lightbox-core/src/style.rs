#![forbid(unsafe_code)]

//! Inline style updates and animation targets.
//!
//! A [`StyleUpdate`] is a sparse patch: only `Some` fields are written to the
//! node, everything else is left as the host has it.

/// CSS `display` values the widget toggles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    None,
}

/// A 2D scale-then-translate transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Create a transform from a scale and a translation.
    #[inline]
    pub const fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Render as a CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.scale, self.translate_x, self.translate_y
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sparse inline-style patch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleUpdate {
    pub margin_top: Option<f64>,
    pub margin_left: Option<f64>,
    pub top: Option<f64>,
    pub display: Option<Display>,
    pub opacity: Option<f64>,
    pub transform: Option<Transform>,
}

impl StyleUpdate {
    /// An empty patch.
    pub const fn new() -> Self {
        Self {
            margin_top: None,
            margin_left: None,
            top: None,
            display: None,
            opacity: None,
            transform: None,
        }
    }

    /// Set `margin-top`.
    #[must_use]
    pub fn margin_top(mut self, value: f64) -> Self {
        self.margin_top = Some(value);
        self
    }

    /// Set `margin-left`.
    #[must_use]
    pub fn margin_left(mut self, value: f64) -> Self {
        self.margin_left = Some(value);
        self
    }

    /// Set `top`.
    #[must_use]
    pub fn top(mut self, value: f64) -> Self {
        self.top = Some(value);
        self
    }

    /// Set `display`.
    #[must_use]
    pub fn display(mut self, value: Display) -> Self {
        self.display = Some(value);
        self
    }

    /// Set `opacity`, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn opacity(mut self, value: f64) -> Self {
        self.opacity = Some(value.clamp(0.0, 1.0));
        self
    }

    /// Set `transform`.
    #[must_use]
    pub fn transform(mut self, value: Transform) -> Self {
        self.transform = Some(value);
        self
    }

    /// Whether the patch writes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }
}

/// Target values for an animated transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub opacity: f64,
    pub transform: Transform,
}

impl Transition {
    /// Fully opaque at the identity transform.
    pub const SETTLED: Self = Self {
        opacity: 1.0,
        transform: Transform::IDENTITY,
    };
}
