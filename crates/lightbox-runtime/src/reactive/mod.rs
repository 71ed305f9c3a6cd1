#![forbid(unsafe_code)]

//! Change notification for widget events.
//!
//! - [`EventHub`]: observer list keyed by event name.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Invariants
//!
//! 1. Listeners for one event are called in registration order.
//! 2. Dropping a [`Subscription`] removes its listener before the next emit.
//! 3. Listeners may subscribe, unsubscribe or emit from inside a callback;
//!    changes take effect from the next emit.

pub mod hub;

pub use hub::{EventHub, Subscription};
