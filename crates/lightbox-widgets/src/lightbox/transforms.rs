#![forbid(unsafe_code)]

//! Inline transform directives.
//!
//! Loaded HTML may carry comments of the form
//!
//! ```html
//! <!-- directive-name: argument -->
//! ```
//!
//! The name is lowercase ASCII letters and hyphens; the argument is the rest
//! of the line up to `-->`, trimmed. Directives are collected across the
//! whole document and dispatched to handlers in a [`TransformRegistry`].
//!
//! # Invariants
//!
//! 1. A repeated name keeps the argument of its last occurrence.
//! 2. Dispatch order is the order in which names first appeared.
//! 3. Names with no registered handler are skipped silently.
//! 4. Comments that do not match the shape are ordinary comments, never errors.

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use ahash::AHashMap;
use lightbox_core::Host;
use regex::Regex;

use super::Lightbox;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*([a-z\-]+):\s*([^\r\n\u{2028}\u{2029}]*?)\s*-->")
        .expect("directive pattern is valid")
});

/// One `name: argument` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformDirective {
    pub name: String,
    pub argument: String,
}

/// Directives keyed by name, last write wins, first-seen order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformMap {
    entries: Vec<TransformDirective>,
}

impl TransformMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `argument`, replacing any earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, argument: impl Into<String>) {
        let name = name.into();
        let argument = argument.into();
        match self.entries.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.argument = argument,
            None => self.entries.push(TransformDirective { name, argument }),
        }
    }

    /// Argument for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.argument.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformDirective> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TransformMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, argument) in iter {
            map.insert(name, argument);
        }
        map
    }
}

/// Scan `html` for directive comments.
#[must_use]
pub fn parse_directives(html: &str) -> TransformMap {
    DIRECTIVE
        .captures_iter(html)
        .map(|caps| (caps[1].to_owned(), caps[2].to_owned()))
        .collect()
}

/// Handler invoked with the widget and the directive argument.
pub type TransformHandler<H> = Rc<dyn Fn(&Lightbox<H>, &str)>;

/// Directive handlers keyed by name.
pub struct TransformRegistry<H: Host> {
    handlers: AHashMap<String, TransformHandler<H>>,
}

impl<H: Host> TransformRegistry<H> {
    /// Registry with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: AHashMap::new(),
        }
    }

    /// Register `handler` for `name`, replacing any previous one.
    #[must_use]
    pub fn with(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&Lightbox<H>, &str) + 'static,
    ) -> Self {
        self.register(name, handler);
        self
    }

    /// Register `handler` for `name`, replacing any previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&Lightbox<H>, &str) + 'static,
    ) {
        self.handlers.insert(name.into(), Rc::new(handler));
    }

    /// Handler for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TransformHandler<H>> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H: Host> Default for TransformRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Clone for TransformRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<H: Host> fmt::Debug for TransformRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TransformRegistry")
            .field("handlers", &names)
            .finish()
    }
}
