#![forbid(unsafe_code)]

//! Capability traits the embedding page implements.
//!
//! # Invariants
//!
//! 1. Every method takes `&self`. Hosts own their interior mutability, the
//!    way browser bindings do, so one host can be shared by many widgets.
//! 2. A callback handed to a capability is never invoked from inside the
//!    call that received it. Hosts queue callbacks and dispatch them from
//!    their event loop. The widget relies on this to avoid re-entrant
//!    borrows of its own state.
//! 3. Everything runs on one thread; nothing here is `Send`.

use std::time::Duration;

use crate::content::Content;
use crate::event::{BindingId, Key, KeyOutcome};
use crate::fetch::{FetchError, FetchRequest};
use crate::geometry::{Metrics, Viewport};
use crate::style::{StyleUpdate, Transition};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Completion callback for [`Fetch::get`].
pub type FetchCallback = Box<dyn FnOnce(Result<String, FetchError>)>;

/// Handler registered with [`KeyBindings::bind`].
pub type KeyHandler = Box<dyn FnMut() -> KeyOutcome>;

/// Select, measure and mutate visual-tree nodes.
pub trait Dom {
    /// Opaque node handle.
    type Node: Clone + std::fmt::Debug + 'static;

    /// Current window size.
    fn viewport(&self) -> Viewport;

    /// Current vertical page scroll offset.
    fn scroll_top(&self) -> f64;

    /// Scroll the page to `y`.
    fn set_scroll_top(&self, y: f64);

    /// Make a node displayed.
    fn show(&self, node: &Self::Node);

    /// Make a node not displayed.
    fn hide(&self, node: &Self::Node);

    /// Replace a node's children with a single text node.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Remove all children of `node`, then append `content`.
    fn replace_children(&self, node: &Self::Node, content: &Content<Self::Node>);

    /// Serialized HTML of a node's children.
    fn inner_html(&self, node: &Self::Node) -> String;

    /// Measure a node's rendered layout.
    fn measure(&self, node: &Self::Node) -> Metrics;

    /// Write inline style properties.
    fn apply_style(&self, node: &Self::Node, style: &StyleUpdate);

    /// Add a class to the document body.
    fn add_root_class(&self, class: &str);

    /// Remove a class from the document body.
    fn remove_root_class(&self, class: &str);
}

/// Animate numeric style properties over a duration.
pub trait Animate: Dom {
    /// Stop animations running on `node`, leaving current values in place.
    fn stop(&self, node: &Self::Node);

    /// Display `node` and animate its opacity from 0 to 1.
    fn fade_in(&self, node: &Self::Node, duration: Duration);

    /// Animate `node`'s opacity to 0, then hide it and run `on_done`.
    fn fade_out(&self, node: &Self::Node, duration: Duration, on_done: Option<Task>);

    /// Animate opacity and transform to `target`.
    fn transition(&self, node: &Self::Node, target: &Transition, duration: Duration);
}

/// Asynchronous HTTP GET returning the response body as text.
pub trait Fetch {
    /// Issue `request`; `on_complete` runs once with the body or the failure.
    fn get(&self, request: FetchRequest, on_complete: FetchCallback);
}

/// Process-wide keyboard shortcut service.
pub trait KeyBindings {
    /// Register `handler` for `key`.
    fn bind(&self, key: Key, handler: KeyHandler) -> BindingId;

    /// Remove a binding. Returns `false` if it was already gone.
    fn unbind(&self, id: BindingId) -> bool;
}

/// Deferred callbacks.
pub trait Timers {
    /// Run `task` once after `delay`.
    fn set_timeout(&self, delay: Duration, task: Task);
}

/// Everything the lightbox needs from its environment.
pub trait Host: Animate + Fetch + KeyBindings + Timers + 'static {}

impl<T> Host for T where T: Animate + Fetch + KeyBindings + Timers + 'static {}
