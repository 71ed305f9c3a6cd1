#![forbid(unsafe_code)]

//! Host capabilities and value types for the lightbox overlay widget.
//!
//! The widget never touches a concrete UI toolkit. Everything it needs from
//! the embedding page is expressed as a capability trait in [`host`]:
//!
//! - [`Dom`]: select, measure and mutate visual-tree nodes
//! - [`Animate`]: animate numeric style properties over a duration
//! - [`Fetch`]: asynchronous HTTP GET returning HTML text
//! - [`KeyBindings`]: register/unregister a callback for a named key
//! - [`Timers`]: schedule a deferred callback
//!
//! A type implementing all five is a [`Host`].

pub mod content;
pub mod event;
pub mod fetch;
pub mod geometry;
pub mod host;
pub mod style;

pub use content::{Content, Surfaces};
pub use event::{BindingId, Key, KeyCode, KeyOutcome, Modifiers};
pub use fetch::{FetchError, FetchRequest, RequestOptions, ResponseType};
pub use geometry::{Metrics, Size, Viewport};
pub use host::{Animate, Dom, Fetch, FetchCallback, Host, KeyBindings, KeyHandler, Task, Timers};
pub use style::{Display, StyleUpdate, Transform, Transition};
