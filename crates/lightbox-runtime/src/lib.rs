#![forbid(unsafe_code)]

//! Single-threaded runtime pieces shared by lightbox hosts and widgets.
//!
//! - [`reactive`]: named-event hub with RAII subscriptions.
//! - [`keymap`]: process-wide key binding table implementing
//!   [`KeyBindings`](lightbox_core::KeyBindings).
//! - [`timer`]: virtual-clock timer queue implementing
//!   [`Timers`](lightbox_core::Timers).
//!
//! Everything here uses `Rc`/`RefCell` and is intended for one UI thread.
//! Callbacks are always invoked with no internal borrow held, so they may
//! call back into the structure that fired them.

pub mod keymap;
pub mod reactive;
pub mod timer;

pub use keymap::Keymap;
pub use reactive::{EventHub, Subscription};
pub use timer::TimerQueue;
