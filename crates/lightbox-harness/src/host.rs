#![forbid(unsafe_code)]

//! In-memory host.
//!
//! # Animation model
//!
//! - `fade_in` displays the node at once and settles opacity at 1 after the
//!   duration.
//! - `fade_out` settles opacity at 0 after the duration, then hides the node
//!   and runs the completion callback.
//! - `transition` settles opacity and transform after the duration.
//! - `stop` cancels pending settles for the node; their callbacks never run.
//!
//! # Invariants
//!
//! 1. No callback handed to the host runs inside the call that received it.
//! 2. Fetch callbacks run only from [`HeadlessHost::respond`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use lightbox_core::{
    Animate, BindingId, Content, Display, Dom, Fetch, FetchCallback, FetchError, FetchRequest, Key,
    KeyBindings, KeyHandler, KeyOutcome, Metrics, StyleUpdate, Surfaces, Task, Timers, Transition,
    Viewport,
};
use lightbox_runtime::{Keymap, TimerQueue};

/// Handle to a node in the headless tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Current state of a headless node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub name: String,
    pub displayed: bool,
    pub opacity: f64,
    pub text: Option<String>,
    pub children: Option<Content<NodeId>>,
    /// Serialized children, returned by `inner_html`.
    pub html: String,
    /// Accumulated inline style.
    pub style: StyleUpdate,
    pub metrics: Metrics,
    /// Bumped by `stop`; pending settles from older epochs are discarded.
    epoch: u64,
}

impl NodeState {
    fn new(name: &str, displayed: bool) -> Self {
        Self {
            name: name.to_owned(),
            displayed,
            opacity: if displayed { 1.0 } else { 0.0 },
            text: None,
            children: None,
            html: String::new(),
            style: StyleUpdate::new(),
            metrics: Metrics::default(),
            epoch: 0,
        }
    }
}

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Show(NodeId),
    Hide(NodeId),
    SetText(NodeId, String),
    ReplaceChildren(NodeId),
    Measure(NodeId),
    ApplyStyle(NodeId, StyleUpdate),
    SetScrollTop(f64),
    AddRootClass(String),
    RemoveRootClass(String),
    Stop(NodeId),
    FadeIn(NodeId, Duration),
    FadeOut(NodeId, Duration),
    Transition(NodeId, Transition, Duration),
    Fetch(FetchRequest),
    Bind(Key, BindingId),
    Unbind(BindingId),
    SetTimeout(Duration),
}

struct PendingFetch {
    request: FetchRequest,
    callback: Option<FetchCallback>,
}

/// In-memory implementation of every host capability.
pub struct HeadlessHost {
    viewport: Cell<Viewport>,
    scroll_top: Cell<f64>,
    nodes: RefCell<Vec<NodeState>>,
    root_classes: RefCell<BTreeSet<String>>,
    fetches: RefCell<Vec<PendingFetch>>,
    calls: RefCell<Vec<HostCall>>,
    keymap: Keymap,
    timers: TimerQueue,
    // Settles scheduled on the timer queue reach back through this.
    this: Weak<HeadlessHost>,
}

impl HeadlessHost {
    /// Host with the given window size, scrolled to the top.
    pub fn new(viewport: Viewport) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            viewport: Cell::new(viewport),
            scroll_top: Cell::new(0.0),
            nodes: RefCell::new(Vec::new()),
            root_classes: RefCell::new(BTreeSet::new()),
            fetches: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            keymap: Keymap::new(),
            timers: TimerQueue::new(),
            this: this.clone(),
        })
    }

    /// A 1280x800 desktop window.
    pub fn desktop() -> Rc<Self> {
        Self::new(Viewport::new(1280.0, 800.0))
    }

    /// A 375x667 phone window.
    pub fn mobile() -> Rc<Self> {
        Self::new(Viewport::new(375.0, 667.0))
    }

    // --- Tree setup ---

    /// Add a node.
    pub fn create_node(&self, name: &str, displayed: bool) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(u32::try_from(nodes.len()).unwrap_or(u32::MAX));
        nodes.push(NodeState::new(name, displayed));
        id
    }

    /// Add a detached node with serialized children, for `Content::Node`.
    pub fn create_fragment(&self, name: &str, html: &str) -> NodeId {
        let id = self.create_node(name, true);
        self.with_node(id, |n| n.html = html.to_owned());
        id
    }

    /// The five lightbox surfaces. Only the page starts displayed.
    pub fn create_surfaces(&self) -> Surfaces<NodeId> {
        Surfaces {
            overlay: self.create_node("overlay", false),
            content: self.create_node("content", true),
            inner: self.create_node("inner", false),
            page: self.create_node("page", true),
            loader: self.create_node("loader", false),
        }
    }

    /// Set what `measure` reports for a node.
    pub fn set_metrics(&self, node: NodeId, metrics: Metrics) {
        self.with_node(node, |n| n.metrics = metrics);
    }

    /// Change the window size.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    /// Scroll the page without recording a call (as the user would).
    pub fn user_scroll(&self, y: f64) {
        self.scroll_top.set(y);
    }

    // --- Inspection ---

    /// Snapshot of a node.
    pub fn node(&self, node: NodeId) -> NodeState {
        self.nodes.borrow()[node.index()].clone()
    }

    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.index()].displayed
    }

    /// Current page scroll offset.
    pub fn scroll(&self) -> f64 {
        self.scroll_top.get()
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.root_classes.borrow().contains(class)
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Recorded calls matching `pred`.
    pub fn calls_matching(&self, pred: impl Fn(&HostCall) -> bool) -> Vec<HostCall> {
        self.calls.borrow().iter().filter(|c| pred(c)).cloned().collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Every request issued so far, answered or not.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.fetches
            .borrow()
            .iter()
            .map(|f| f.request.clone())
            .collect()
    }

    /// Requests still waiting for a response.
    pub fn pending_requests(&self) -> usize {
        self.fetches
            .borrow()
            .iter()
            .filter(|f| f.callback.is_some())
            .count()
    }

    /// Number of handlers bound to `key`.
    pub fn bound_count(&self, key: Key) -> usize {
        self.keymap.bound_count(key)
    }

    /// The host's key table.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// The host's timer queue.
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    // --- Driving ---

    /// Complete request `index` (in issue order). Returns `false` if it was
    /// already answered or does not exist.
    pub fn respond(&self, index: usize, result: Result<String, FetchError>) -> bool {
        let callback = self
            .fetches
            .borrow_mut()
            .get_mut(index)
            .and_then(|f| f.callback.take());
        match callback {
            Some(callback) => {
                callback(result);
                true
            }
            None => false,
        }
    }

    /// Complete the most recently issued request.
    pub fn respond_latest(&self, result: Result<String, FetchError>) -> bool {
        let len = self.fetches.borrow().len();
        len > 0 && self.respond(len - 1, result)
    }

    /// Press a key.
    pub fn press(&self, key: Key) -> KeyOutcome {
        self.keymap.dispatch(key)
    }

    /// Move the virtual clock, settling animations and running timers.
    pub fn advance(&self, dt: Duration) -> usize {
        self.timers.advance(dt)
    }

    /// Run every pending timer and animation.
    pub fn settle(&self) -> usize {
        self.timers.run_all(1024)
    }

    // --- Internals ---

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&mut NodeState) -> R) -> R {
        f(&mut self.nodes.borrow_mut()[node.index()])
    }

    /// Run `apply` on `node` after `delay`, unless the node is stopped first.
    fn settle_later(
        &self,
        node: NodeId,
        delay: Duration,
        apply: impl FnOnce(&mut NodeState) + 'static,
        on_done: Option<Task>,
    ) {
        let epoch = self.with_node(node, |n| n.epoch);
        let weak = self.this.clone();
        self.timers.set_timeout(
            delay,
            Box::new(move || {
                let Some(host) = weak.upgrade() else {
                    return;
                };
                let current = host.with_node(node, |n| {
                    let current = n.epoch == epoch;
                    if current {
                        apply(n);
                    }
                    current
                });
                if current && let Some(on_done) = on_done {
                    on_done();
                }
            }),
        );
    }
}

impl fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("viewport", &self.viewport.get())
            .field("scroll_top", &self.scroll_top.get())
            .field("nodes", &self.nodes.borrow().len())
            .field("pending_requests", &self.pending_requests())
            .field("keymap", &self.keymap)
            .field("timers", &self.timers)
            .finish()
    }
}

impl Dom for HeadlessHost {
    type Node = NodeId;

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    fn set_scroll_top(&self, y: f64) {
        self.record(HostCall::SetScrollTop(y));
        self.scroll_top.set(y.max(0.0));
    }

    fn show(&self, node: &NodeId) {
        self.record(HostCall::Show(*node));
        self.with_node(*node, |n| {
            n.displayed = true;
            n.opacity = 1.0;
        });
    }

    fn hide(&self, node: &NodeId) {
        self.record(HostCall::Hide(*node));
        self.with_node(*node, |n| n.displayed = false);
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.record(HostCall::SetText(*node, text.to_owned()));
        self.with_node(*node, |n| {
            n.text = Some(text.to_owned());
            n.html = text.to_owned();
        });
    }

    fn replace_children(&self, node: &NodeId, content: &Content<NodeId>) {
        self.record(HostCall::ReplaceChildren(*node));
        let html = match content {
            Content::Html(html) => html.clone(),
            Content::Node(child) => self.with_node(*child, |c| c.html.clone()),
        };
        self.with_node(*node, |n| {
            n.children = Some(content.clone());
            n.html = html;
        });
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.with_node(*node, |n| n.html.clone())
    }

    fn measure(&self, node: &NodeId) -> Metrics {
        self.record(HostCall::Measure(*node));
        self.with_node(*node, |n| n.metrics)
    }

    fn apply_style(&self, node: &NodeId, style: &StyleUpdate) {
        self.record(HostCall::ApplyStyle(*node, *style));
        self.with_node(*node, |n| {
            let s = &mut n.style;
            s.margin_top = style.margin_top.or(s.margin_top);
            s.margin_left = style.margin_left.or(s.margin_left);
            s.top = style.top.or(s.top);
            s.transform = style.transform.or(s.transform);
            if let Some(opacity) = style.opacity {
                s.opacity = Some(opacity);
                n.opacity = opacity;
            }
            if let Some(display) = style.display {
                s.display = Some(display);
                n.displayed = display == Display::Block;
            }
        });
    }

    fn add_root_class(&self, class: &str) {
        self.record(HostCall::AddRootClass(class.to_owned()));
        self.root_classes.borrow_mut().insert(class.to_owned());
    }

    fn remove_root_class(&self, class: &str) {
        self.record(HostCall::RemoveRootClass(class.to_owned()));
        self.root_classes.borrow_mut().remove(class);
    }
}

impl Animate for HeadlessHost {
    fn stop(&self, node: &NodeId) {
        self.record(HostCall::Stop(*node));
        self.with_node(*node, |n| n.epoch += 1);
    }

    fn fade_in(&self, node: &NodeId, duration: Duration) {
        self.record(HostCall::FadeIn(*node, duration));
        self.with_node(*node, |n| n.displayed = true);
        self.settle_later(*node, duration, |n| n.opacity = 1.0, None);
    }

    fn fade_out(&self, node: &NodeId, duration: Duration, on_done: Option<Task>) {
        self.record(HostCall::FadeOut(*node, duration));
        self.settle_later(
            *node,
            duration,
            |n| {
                n.opacity = 0.0;
                n.displayed = false;
            },
            on_done,
        );
    }

    fn transition(&self, node: &NodeId, target: &Transition, duration: Duration) {
        self.record(HostCall::Transition(*node, *target, duration));
        let target = *target;
        self.settle_later(
            *node,
            duration,
            move |n| {
                n.opacity = target.opacity;
                n.style.opacity = Some(target.opacity);
                n.style.transform = Some(target.transform);
            },
            None,
        );
    }
}

impl Fetch for HeadlessHost {
    fn get(&self, request: FetchRequest, on_complete: FetchCallback) {
        self.record(HostCall::Fetch(request.clone()));
        self.fetches.borrow_mut().push(PendingFetch {
            request,
            callback: Some(on_complete),
        });
    }
}

impl KeyBindings for HeadlessHost {
    fn bind(&self, key: Key, handler: KeyHandler) -> BindingId {
        let id = self.keymap.bind(key, handler);
        self.record(HostCall::Bind(key, id));
        id
    }

    fn unbind(&self, id: BindingId) -> bool {
        self.record(HostCall::Unbind(id));
        self.keymap.unbind(id)
    }
}

impl Timers for HeadlessHost {
    fn set_timeout(&self, delay: Duration, task: Task) {
        self.record(HostCall::SetTimeout(delay));
        self.timers.set_timeout(delay, task);
    }
}
