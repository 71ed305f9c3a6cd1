#![forbid(unsafe_code)]

//! Visibility state machine values.

use lightbox_core::Viewport;

/// Widest viewport still presented as mobile.
pub const MOBILE_MAX_WIDTH: f64 = 767.0;

/// Whether the lightbox is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Device-class presentation, chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Centered, animated frame over the page.
    Desktop,
    /// Full-screen takeover: the page root is hidden.
    Mobile,
}

impl Presentation {
    /// Pick the presentation for a viewport. Desktop iff wider than 767px.
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        if viewport.width > MOBILE_MAX_WIDTH {
            Self::Desktop
        } else {
            Self::Mobile
        }
    }
}

/// Snapshot of the widget's mutable state.
///
/// `presentation` never changes after construction; viewport resizes are
/// not tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityState {
    pub visibility: Visibility,
    pub presentation: Presentation,
    /// Page scroll offset captured on the latest mobile open.
    pub last_scroll_offset: f64,
}

impl VisibilityState {
    /// Hidden state for a presentation.
    #[must_use]
    pub fn new(presentation: Presentation) -> Self {
        Self {
            visibility: Visibility::Hidden,
            presentation,
            last_scroll_offset: 0.0,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    #[inline]
    pub fn is_desktop(&self) -> bool {
        self.presentation == Presentation::Desktop
    }
}
