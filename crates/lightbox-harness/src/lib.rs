#![forbid(unsafe_code)]

//! Headless host and test fixtures for the lightbox widget.
//!
//! [`HeadlessHost`] implements every host capability in memory:
//!
//! - a flat node table standing in for the visual tree,
//! - a fetch queue completed explicitly with [`HeadlessHost::respond`],
//! - animations that settle on the virtual clock,
//! - a [`Keymap`](lightbox_runtime::Keymap) fed by [`HeadlessHost::press`],
//! - a [`TimerQueue`](lightbox_runtime::TimerQueue) moved by
//!   [`HeadlessHost::advance`].
//!
//! Every capability call is appended to a log of [`HostCall`]s so tests can
//! assert on exactly what the widget asked for.

pub mod host;
pub mod logging;

pub use host::{HeadlessHost, HostCall, NodeId, NodeState};
pub use logging::init_test_logging;
