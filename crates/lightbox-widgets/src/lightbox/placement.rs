#![forbid(unsafe_code)]

//! Desktop frame placement.
//!
//! The frame is positioned with `top` at the viewport's vertical middle and
//! pulled back by negative margins of half its size. `top` is clamped so the
//! frame's upper edge never sits closer than 40px to the document top.

use lightbox_core::{Display, Size, StyleUpdate, Transform};

/// Minimum gap above the frame.
pub const MIN_TOP_GAP: f64 = 40.0;

/// Starting transform for the desktop entrance.
pub const ENTRANCE_TRANSFORM: Transform = Transform::new(0.6, 0.0, 40.0);

/// Computed position of the desktop frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesktopPlacement {
    pub margin_top: f64,
    pub margin_left: f64,
    pub top: f64,
}

impl DesktopPlacement {
    /// Place a frame of `frame` outer size for the current scroll position.
    #[must_use]
    pub fn compute(frame: Size, scroll_top: f64, viewport_height: f64) -> Self {
        let half = frame.half();
        let top = (scroll_top + viewport_height / 2.0).max(half.height + MIN_TOP_GAP);
        Self {
            margin_top: -half.height,
            margin_left: -half.width,
            top,
        }
    }

    /// Style applied before the entrance animation starts.
    #[must_use]
    pub fn entrance_style(&self) -> StyleUpdate {
        StyleUpdate::new()
            .margin_top(self.margin_top)
            .margin_left(self.margin_left)
            .top(self.top)
            .display(Display::Block)
            .opacity(0.0)
            .transform(ENTRANCE_TRANSFORM)
    }
}
