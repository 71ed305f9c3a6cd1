#![forbid(unsafe_code)]

//! Named-event observer list.
//!
//! # Usage
//!
//! ```
//! use lightbox_runtime::reactive::EventHub;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let hub = EventHub::new();
//! let hits = Rc::new(Cell::new(0));
//! let h = Rc::clone(&hits);
//! let sub = hub.subscribe("content_shown", move || h.set(h.get() + 1));
//!
//! hub.emit(&"content_shown");
//! drop(sub);
//! hub.emit(&"content_shown");
//! assert_eq!(hits.get(), 1);
//! ```
//!
//! # Failure Modes
//!
//! - Emitting an event nobody listens to is a no-op.
//! - A [`Subscription`] that outlives its hub does nothing on drop.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

struct Listener<E> {
    id: u64,
    event: E,
    callback: Callback,
}

struct HubInner<E> {
    next_id: u64,
    listeners: Vec<Listener<E>>,
}

/// Observer list scoped to one owner (e.g. a widget instance).
///
/// Cloning shares the same listener list.
pub struct EventHub<E> {
    inner: Rc<RefCell<HubInner<E>>>,
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: PartialEq + 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PartialEq + 'static> EventHub<E> {
    /// Create a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                next_id: 1,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register `callback` for `event`.
    ///
    /// The listener stays registered until the returned guard is dropped or
    /// [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, event: E, callback: impl Fn() + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push(Listener {
                id,
                event,
                callback: Rc::new(callback),
            });
            id
        };
        let weak: Weak<RefCell<HubInner<E>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }

    /// Call every listener registered for `event`, in registration order.
    ///
    /// Returns the number of listeners called.
    pub fn emit(&self, event: &E) -> usize {
        let callbacks: Vec<Callback> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == *event)
            .map(|l| Rc::clone(&l.callback))
            .collect();
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &E) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == *event)
            .count()
    }

    /// Whether no listeners are registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().listeners.is_empty()
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

/// RAII guard for a hub listener.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Keep the listener registered for the lifetime of the hub.
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
