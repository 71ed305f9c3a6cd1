#![forbid(unsafe_code)]

//! Lightbox public facade.
//!
//! Re-exports the host capability traits, the runtime helpers a host needs
//! to implement them, and the widget itself. Most users only need the
//! [`prelude`].

pub use lightbox_core::{
    Content, FetchError, FetchRequest, Host, Key, KeyOutcome, RequestOptions, Surfaces, Viewport,
};
pub use lightbox_runtime::{EventHub, Keymap, Subscription, TimerQueue};
pub use lightbox_widgets::{
    ConfigError, Lightbox, LightboxBuilder, LightboxConfig, LightboxEvent, TransformMap,
    TransformRegistry, UnknownEvent,
};

/// The commonly used names in one import.
pub mod prelude {
    pub use lightbox_core::{
        Animate, Content, Dom, Fetch, FetchError, FetchRequest, Host, Key, KeyBindings,
        KeyOutcome, RequestOptions, Surfaces, Timers, Viewport,
    };
    pub use lightbox_runtime::{Keymap, Subscription, TimerQueue};
    pub use lightbox_widgets::{Lightbox, LightboxConfig, LightboxEvent, TransformRegistry};
}
