#![forbid(unsafe_code)]

//! Widgets built on the lightbox host capabilities.

pub mod lightbox;

pub use lightbox::{
    CLOSE_GRACE, ConfigError, DEFAULT_FADE, DEFAULT_INNER_FADE, DesktopPlacement, Lightbox,
    LightboxBuilder, LightboxConfig, LightboxEvent, Presentation, SHOWING_CLASS, ScrollBand,
    TransformDirective, TransformHandler, TransformMap, TransformRegistry, UnknownEvent,
    Visibility, VisibilityState, parse_directives,
};
