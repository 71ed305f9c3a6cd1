#![forbid(unsafe_code)]

//! Process-wide key binding table.
//!
//! [`Keymap`] is a reference implementation of
//! [`KeyBindings`](lightbox_core::KeyBindings) that hosts can embed and feed
//! key presses into via [`Keymap::dispatch`].
//!
//! # Invariants
//!
//! 1. Binding ids are never reused within one keymap.
//! 2. Dispatch visits handlers for the key newest-first and stops at the
//!    first one that returns [`KeyOutcome::Consumed`].
//! 3. A handler may unbind itself (or anything else) while running.
//!
//! # Failure Modes
//!
//! - `unbind` of an unknown or already-removed id returns `false`.
//! - A handler that re-entrantly dispatches the key it is handling is
//!   skipped for the nested dispatch instead of panicking.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lightbox_core::{BindingId, Key, KeyBindings, KeyHandler, KeyOutcome};

type SharedHandler = Rc<RefCell<KeyHandler>>;

struct Entry {
    id: BindingId,
    key: Key,
    handler: SharedHandler,
}

#[derive(Default)]
struct KeymapInner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Table of active key bindings.
#[derive(Default)]
pub struct Keymap {
    inner: RefCell<KeymapInner>,
}

impl Keymap {
    /// Create an empty keymap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a key press to its handlers.
    pub fn dispatch(&self, key: Key) -> KeyOutcome {
        let handlers: Vec<(BindingId, SharedHandler)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .rev()
            .filter(|e| e.key == key)
            .map(|e| (e.id, Rc::clone(&e.handler)))
            .collect();

        for (id, handler) in handlers {
            let Ok(mut guard) = handler.try_borrow_mut() else {
                tracing::trace!(binding = id.id(), %key, "skipping busy key handler");
                continue;
            };
            if (*guard)() == KeyOutcome::Consumed {
                tracing::trace!(binding = id.id(), %key, "key consumed");
                return KeyOutcome::Consumed;
            }
        }
        KeyOutcome::Ignored
    }

    /// Number of handlers bound to `key`.
    #[must_use]
    pub fn bound_count(&self, key: Key) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.key == key)
            .count()
    }

    /// Whether `id` is still bound.
    #[must_use]
    pub fn is_bound(&self, id: BindingId) -> bool {
        self.inner.borrow().entries.iter().any(|e| e.id == id)
    }
}

impl KeyBindings for Keymap {
    fn bind(&self, key: Key, handler: KeyHandler) -> BindingId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = BindingId::new(inner.next_id);
        inner.entries.push(Entry {
            id,
            key,
            handler: Rc::new(RefCell::new(handler)),
        });
        tracing::trace!(binding = id.id(), %key, "key bound");
        id
    }

    fn unbind(&self, id: BindingId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        before != inner.entries.len()
    }
}

impl fmt::Debug for Keymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Keymap")
            .field("bindings", &inner.entries.len())
            .finish()
    }
}
