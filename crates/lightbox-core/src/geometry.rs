#![forbid(unsafe_code)]

//! Geometry value types measured from the host's visual tree.
//!
//! All values are CSS pixels as `f64`; hosts may report fractional sizes.

/// Width and height of a node or region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Half of each dimension.
    #[inline]
    pub fn half(self) -> Self {
        Self::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The visible window area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Layout measurements of a single node.
///
/// `width`/`height` are the content box; `outer_*` include padding and border.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Distance from the document top to the node's border edge.
    pub offset_top: f64,
    pub width: f64,
    pub height: f64,
    pub outer_width: f64,
    pub outer_height: f64,
}

impl Metrics {
    /// Outer (border-box) size.
    #[inline]
    pub fn outer_size(&self) -> Size {
        Size::new(self.outer_width, self.outer_height)
    }

    /// Bottom edge of the content box, relative to the document top.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.offset_top + self.height
    }
}
