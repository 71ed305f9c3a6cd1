#![forbid(unsafe_code)]

//! Page scroll clamping while the desktop lightbox is open.
//!
//! The band keeps the content container inside the viewport with a 50px
//! margin, without fighting scrolls that already stay inside it.
//!
//! # Invariants
//!
//! 1. `min >= 0`.
//! 2. `max >= min + 10`, so the band is never empty.
//! 3. [`ScrollBand::correct`] returns `None` for any offset in `[min, max]`.

/// Gap kept between the content edges and the viewport edges.
pub const SCROLL_MARGIN: f64 = 50.0;

/// Smallest allowed band width.
pub const MIN_BAND: f64 = 10.0;

/// Allowed page scroll range for the current content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBand {
    pub min: f64,
    pub max: f64,
}

impl ScrollBand {
    /// Compute the band for content at `content_top` with `content_height`.
    #[must_use]
    pub fn for_content(content_top: f64, content_height: f64, viewport_height: f64) -> Self {
        let top_anchor = content_top - SCROLL_MARGIN;
        let bottom_anchor = content_top + content_height + SCROLL_MARGIN - viewport_height;
        let min = top_anchor.min(bottom_anchor).max(0.0);
        let max = (min + MIN_BAND).max(bottom_anchor).max(top_anchor);
        Self { min, max }
    }

    /// The offset to scroll to, or `None` if `scroll_top` is already inside.
    #[must_use]
    pub fn correct(&self, scroll_top: f64) -> Option<f64> {
        if scroll_top < self.min {
            Some(self.min)
        } else if scroll_top > self.max {
            Some(self.max)
        } else {
            None
        }
    }
}
