#![forbid(unsafe_code)]

//! Lightbox overlay widget.
//!
//! Displays HTML content, loaded remotely or from named local fragments,
//! in a modal surface above the page.
//!
//! # Flow
//!
//! 1. [`Lightbox::load_content`] fades the overlay in and resolves the target:
//!    `@name` targets come from [`LightboxConfig::local_content`], anything
//!    else is fetched from `base_url + target`.
//! 2. The resolved content is inserted into the content container, inline
//!    transform directives run, then the desktop or mobile presentation
//!    takes over.
//! 3. Escape (bound only while visible) or [`Lightbox::close`] reverses it.
//!
//! # Invariants
//!
//! 1. While visible, the content container holds exactly the last presented
//!    content and the overlay is displayed.
//! 2. At most one Escape binding is active per widget. It is released on
//!    fire, on close, and when the widget is dropped.
//! 3. The presentation is fixed at construction; resizes are not tracked.
//! 4. Only the most recently issued load can present. Completions of
//!    superseded requests, or of requests outstanding at `close()`, are
//!    dropped.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Fetch error | Logged at `warn`; the loading indicator stays visible |
//! | Unknown `@name` | Treated as a remote target |
//! | Unknown directive | Ignored |
//! | Widget dropped with a fetch in flight | Completion is ignored |
//!
//! # Example
//!
//! ```ignore
//! let lightbox = Lightbox::builder(host, surfaces)
//!     .config(LightboxConfig::new().base_url("/lightbox"))
//!     .transforms(TransformRegistry::new().with("title", |lb, arg| { /* ... */ }))
//!     .build();
//!
//! let _sub = lightbox.on(LightboxEvent::ContentShown, || println!("shown"));
//! lightbox.load_content("/help/shipping", None, Some("Loading…"));
//! ```

mod config;
mod placement;
mod scroll;
mod state;
mod transforms;

pub use config::{ConfigError, DEFAULT_FADE, LightboxConfig};
pub use placement::{DesktopPlacement, ENTRANCE_TRANSFORM, MIN_TOP_GAP};
pub use scroll::{MIN_BAND, SCROLL_MARGIN, ScrollBand};
pub use state::{MOBILE_MAX_WIDTH, Presentation, Visibility, VisibilityState};
pub use transforms::{
    TransformDirective, TransformHandler, TransformMap, TransformRegistry, parse_directives,
};

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use std::time::Duration;

use lightbox_core::{
    BindingId, Content, FetchError, FetchRequest, Host, Key, KeyOutcome, RequestOptions, Surfaces,
    Transition,
};
use lightbox_runtime::{EventHub, Subscription};

/// Fade-out duration of the inner frame on close.
pub const DEFAULT_INNER_FADE: Duration = Duration::from_millis(400);

/// Delay after the overlay fade-out before overlays are force-hidden.
pub const CLOSE_GRACE: Duration = Duration::from_millis(10);

/// Class added to the document body while content is showing.
pub const SHOWING_CLASS: &str = "lightbox-showing";

/// Events emitted by a [`Lightbox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightboxEvent {
    /// New content finished presenting.
    ContentShown,
}

impl LightboxEvent {
    /// Wire name of the event.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ContentShown => "content_shown",
        }
    }
}

impl fmt::Display for LightboxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightboxEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content_shown" => Ok(Self::ContentShown),
            other => Err(UnknownEvent(other.to_owned())),
        }
    }
}

/// An event name no [`LightboxEvent`] answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lightbox event: {}", self.0)
    }
}

impl std::error::Error for UnknownEvent {}

struct Inner<H: Host> {
    host: Rc<H>,
    surfaces: Surfaces<H::Node>,
    config: LightboxConfig,
    transforms: TransformRegistry<H>,
    state: Cell<VisibilityState>,
    escape: Cell<Option<BindingId>>,
    generation: Cell<u64>,
    events: EventHub<LightboxEvent>,
}

impl<H: Host> Drop for Inner<H> {
    fn drop(&mut self) {
        if let Some(id) = self.escape.take() {
            self.host.unbind(id);
        }
    }
}

/// Handle to a lightbox widget.
///
/// Cloning is cheap and yields another handle to the same widget.
pub struct Lightbox<H: Host> {
    inner: Rc<Inner<H>>,
}

impl<H: Host> Clone for Lightbox<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> fmt::Debug for Lightbox<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lightbox")
            .field("state", &self.inner.state.get())
            .field("escape", &self.inner.escape.get())
            .field("generation", &self.inner.generation.get())
            .field("transforms", &self.inner.transforms)
            .finish()
    }
}

/// Builder for [`Lightbox`].
pub struct LightboxBuilder<H: Host> {
    host: Rc<H>,
    surfaces: Surfaces<H::Node>,
    config: LightboxConfig,
    transforms: TransformRegistry<H>,
}

impl<H: Host> LightboxBuilder<H> {
    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: LightboxConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the directive handlers.
    #[must_use]
    pub fn transforms(mut self, transforms: TransformRegistry<H>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Build the widget, reading the viewport once to pick the presentation.
    pub fn build(self) -> Lightbox<H> {
        let presentation = Presentation::for_viewport(self.host.viewport());
        tracing::debug!(?presentation, "lightbox created");
        Lightbox {
            inner: Rc::new(Inner {
                host: self.host,
                surfaces: self.surfaces,
                config: self.config,
                transforms: self.transforms,
                state: Cell::new(VisibilityState::new(presentation)),
                escape: Cell::new(None),
                generation: Cell::new(0),
                events: EventHub::new(),
            }),
        }
    }
}

impl<H: Host> Lightbox<H> {
    /// Start building a widget over `surfaces`.
    pub fn builder(host: Rc<H>, surfaces: Surfaces<H::Node>) -> LightboxBuilder<H> {
        LightboxBuilder {
            host,
            surfaces,
            config: LightboxConfig::default(),
            transforms: TransformRegistry::new(),
        }
    }

    /// Widget with default configuration and no directive handlers.
    pub fn new(host: Rc<H>, surfaces: Surfaces<H::Node>) -> Self {
        Self::builder(host, surfaces).build()
    }

    // --- Accessors ---

    /// Snapshot of the visibility state.
    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.inner.state.get()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    #[must_use]
    pub fn is_desktop(&self) -> bool {
        self.state().is_desktop()
    }

    #[must_use]
    pub fn config(&self) -> &LightboxConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }

    #[must_use]
    pub fn surfaces(&self) -> &Surfaces<H::Node> {
        &self.inner.surfaces
    }

    #[must_use]
    pub fn transforms(&self) -> &TransformRegistry<H> {
        &self.inner.transforms
    }

    /// The active Escape binding, if any.
    #[must_use]
    pub fn escape_binding(&self) -> Option<BindingId> {
        self.inner.escape.get()
    }

    /// Subscribe to a widget event. Dropping the guard unsubscribes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on(&self, event: LightboxEvent, callback: impl Fn() + 'static) -> Subscription {
        self.inner.events.subscribe(event, callback)
    }

    /// Subscribe by event name, e.g. `"content_shown"`.
    pub fn on_named(
        &self,
        name: &str,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription, UnknownEvent> {
        let event = name.parse::<LightboxEvent>()?;
        Ok(self.on(event, callback))
    }

    // --- Loading ---

    /// Load and show `target`.
    ///
    /// `@name` targets with a matching local fragment present synchronously.
    /// Anything else is requested from `base_url + target`; `options` may
    /// extend but not override that request. With `loader_text`, a loading
    /// indicator shows the text until content arrives.
    pub fn load_content(
        &self,
        target: &str,
        options: Option<RequestOptions>,
        loader_text: Option<&str>,
    ) {
        let _span = tracing::debug_span!("lightbox_load", requested = target).entered();
        let host = &self.inner.host;
        let surfaces = &self.inner.surfaces;

        match loader_text.filter(|text| !text.is_empty()) {
            Some(text) => {
                host.set_text(&surfaces.loader, text);
                host.show(&surfaces.loader);
            }
            None => host.hide(&surfaces.loader),
        }
        self.fade_in_overlay();
        let generation = self.next_generation();

        if let Some(html) = self.local_content(target) {
            tracing::debug!("resolved from local content");
            self.present(Content::Html(html.to_owned()));
            return;
        }

        let url = format!("{}{}", self.inner.config.base_url, target);
        let request = FetchRequest::lightbox(url).merge(options.unwrap_or_default());
        tracing::debug!(url = %request.url, generation, "requesting content");
        let weak = Rc::downgrade(&self.inner);
        host.get(
            request,
            Box::new(move |result| {
                if let Some(lightbox) = Self::upgrade(&weak) {
                    lightbox.complete_fetch(generation, result);
                }
            }),
        );
    }

    /// Show content the caller already has, bypassing the loader.
    pub fn show_content(&self, content: impl Into<Content<H::Node>>) {
        let _span = tracing::debug_span!("lightbox_show").entered();
        self.fade_in_overlay();
        self.next_generation();
        self.present(content.into());
    }

    fn local_content(&self, target: &str) -> Option<&str> {
        let (_, rest) = target.split_once('@')?;
        let key = rest
            .split(['\n', '\r', '\u{2028}', '\u{2029}'])
            .next()
            .unwrap_or_default();
        self.inner.config.local_content.get(key).map(String::as_str)
    }

    fn complete_fetch(&self, generation: u64, result: Result<String, FetchError>) {
        if generation != self.inner.generation.get() {
            tracing::debug!(
                generation,
                current = self.inner.generation.get(),
                "dropping stale lightbox response"
            );
            return;
        }
        match result {
            Ok(html) => self.present(Content::Html(html)),
            Err(error) => {
                tracing::warn!(%error, generation, "lightbox content request failed");
            }
        }
    }

    // --- Presenting ---

    fn present(&self, content: Content<H::Node>) {
        let _span = tracing::debug_span!("lightbox_present").entered();
        let host = &self.inner.host;
        let surfaces = &self.inner.surfaces;

        host.replace_children(&surfaces.content, &content);
        host.hide(&surfaces.loader);
        let html = match &content {
            Content::Html(html) => html.clone(),
            Content::Node(node) => host.inner_html(node),
        };
        self.do_inline_transforms(&html);

        match self.state().presentation {
            Presentation::Desktop => self.show_desktop(),
            Presentation::Mobile => self.show_mobile(),
        }
        // Runs before the visible flag flips, so it only acts when content
        // is replaced inside an already-open lightbox.
        self.fix_scroll();

        self.update_state(|s| s.visibility = Visibility::Visible);
        host.add_root_class(SHOWING_CLASS);
        self.arm_escape();
        let listeners = self.inner.events.emit(&LightboxEvent::ContentShown);
        tracing::debug!(listeners, "content shown");
    }

    fn show_desktop(&self) {
        let host = &self.inner.host;
        let frame = &self.inner.surfaces.inner;
        let placement = DesktopPlacement::compute(
            host.measure(frame).outer_size(),
            host.scroll_top(),
            host.viewport().height,
        );
        host.stop(frame);
        host.apply_style(frame, &placement.entrance_style());
        host.transition(frame, &Transition::SETTLED, self.inner.config.fade_duration);
    }

    fn show_mobile(&self) {
        let host = &self.inner.host;
        let offset = host.scroll_top();
        self.update_state(|s| s.last_scroll_offset = offset);
        host.hide(&self.inner.surfaces.page);
        // A close fade may still be running on the frame.
        host.stop(&self.inner.surfaces.inner);
        host.show(&self.inner.surfaces.inner);
    }

    // --- Transforms ---

    /// Dispatch each directive to its registered handler.
    pub fn apply_transforms(&self, transforms: &TransformMap) {
        for directive in transforms.iter() {
            let Some(handler) = self.inner.transforms.get(&directive.name) else {
                tracing::trace!(name = %directive.name, "no handler for directive");
                continue;
            };
            tracing::debug!(
                name = %directive.name,
                argument = %directive.argument,
                "applying inline transform"
            );
            let handler = Rc::clone(handler);
            handler(self, &directive.argument);
        }
    }

    /// Parse directives out of `html` and apply them. Returns what was parsed.
    pub fn do_inline_transforms(&self, html: &str) -> TransformMap {
        let transforms = parse_directives(html);
        self.apply_transforms(&transforms);
        transforms
    }

    // --- Scroll ---

    /// Clamp the page scroll so the content stays in view.
    ///
    /// Only acts while visible in desktop mode. Returns the new offset if
    /// the page was scrolled.
    pub fn fix_scroll(&self) -> Option<f64> {
        let state = self.state();
        if !(state.is_visible() && state.is_desktop()) {
            return None;
        }
        let host = &self.inner.host;
        let metrics = host.measure(&self.inner.surfaces.content);
        let band =
            ScrollBand::for_content(metrics.offset_top, metrics.height, host.viewport().height);
        let current = host.scroll_top();
        let target = band.correct(current)?;
        tracing::debug!(from = current, to = target, "correcting page scroll");
        host.set_scroll_top(target);
        Some(target)
    }

    // --- Closing ---

    /// Fade everything out and restore the page.
    pub fn close(&self) {
        let _span = tracing::debug_span!("lightbox_close").entered();
        let host = &self.inner.host;
        let surfaces = &self.inner.surfaces;

        host.fade_out(&surfaces.inner, DEFAULT_INNER_FADE, None);
        let generation = self.next_generation();
        let weak = Rc::downgrade(&self.inner);
        host.fade_out(
            &surfaces.overlay,
            self.inner.config.fade_duration,
            Some(Box::new(move || {
                let Some(lightbox) = Self::upgrade(&weak) else {
                    return;
                };
                let weak = Rc::downgrade(&lightbox.inner);
                lightbox.inner.host.set_timeout(
                    CLOSE_GRACE,
                    Box::new(move || {
                        // A load started after this close owns the overlay now.
                        if let Some(lightbox) = Self::upgrade(&weak)
                            && lightbox.inner.generation.get() == generation
                        {
                            lightbox.force_hide_overlays();
                        }
                    }),
                );
            })),
        );
        host.remove_root_class(SHOWING_CLASS);
        self.update_state(|s| s.visibility = Visibility::Hidden);
        self.disarm_escape();

        let state = self.state();
        if !state.is_desktop() {
            host.show(&surfaces.page);
            host.set_scroll_top(state.last_scroll_offset);
        }
    }

    /// Fade the frame only, leaving the overlay and page as they are.
    ///
    /// For when the page is about to navigate away.
    pub fn close_pending(&self) {
        self.inner
            .host
            .fade_out(&self.inner.surfaces.inner, DEFAULT_INNER_FADE, None);
    }

    /// Hide the overlay and loading indicator immediately.
    pub fn force_hide_overlays(&self) {
        let host = &self.inner.host;
        host.hide(&self.inner.surfaces.overlay);
        host.hide(&self.inner.surfaces.loader);
    }

    // --- Internals ---

    fn upgrade(weak: &Weak<Inner<H>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn fade_in_overlay(&self) {
        let host = &self.inner.host;
        let overlay = &self.inner.surfaces.overlay;
        host.stop(overlay);
        host.fade_in(overlay, self.inner.config.fade_duration);
    }

    fn next_generation(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    fn update_state(&self, f: impl FnOnce(&mut VisibilityState)) {
        let mut state = self.inner.state.get();
        f(&mut state);
        self.inner.state.set(state);
    }

    fn arm_escape(&self) {
        self.disarm_escape();
        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.host.bind(
            Key::ESCAPE,
            Box::new(move || {
                let Some(lightbox) = Self::upgrade(&weak) else {
                    return KeyOutcome::Ignored;
                };
                tracing::debug!("escape pressed");
                lightbox.disarm_escape();
                lightbox.close();
                KeyOutcome::Consumed
            }),
        );
        self.inner.escape.set(Some(id));
    }

    fn disarm_escape(&self) {
        if let Some(id) = self.inner.escape.take() {
            self.inner.host.unbind(id);
        }
    }
}
