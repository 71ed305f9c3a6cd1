#![forbid(unsafe_code)]

//! Integration tests: the lightbox widget driven through the headless host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use lightbox_core::{
    Content, Display, FetchError, Key, KeyOutcome, Metrics, RequestOptions, Surfaces, Transform,
    Transition, Viewport,
};
use lightbox_harness::{HeadlessHost, HostCall, NodeId, init_test_logging};
use lightbox_runtime::Subscription;
use lightbox_widgets::{
    DEFAULT_INNER_FADE, Lightbox, LightboxConfig, LightboxEvent, SHOWING_CLASS, TransformMap,
    TransformRegistry, UnknownEvent,
};
use pretty_assertions::assert_eq;

const FD: Duration = Duration::from_millis(300);

struct Fixture {
    host: Rc<HeadlessHost>,
    surfaces: Surfaces<NodeId>,
    lightbox: Lightbox<HeadlessHost>,
}

fn fixture(
    host: Rc<HeadlessHost>,
    config: LightboxConfig,
    transforms: TransformRegistry<HeadlessHost>,
) -> Fixture {
    init_test_logging();
    let surfaces = host.create_surfaces();
    let lightbox = Lightbox::builder(Rc::clone(&host), surfaces.clone())
        .config(config)
        .transforms(transforms)
        .build();
    Fixture {
        host,
        surfaces,
        lightbox,
    }
}

fn desktop(config: LightboxConfig) -> Fixture {
    fixture(HeadlessHost::desktop(), config, TransformRegistry::new())
}

fn mobile(config: LightboxConfig) -> Fixture {
    fixture(HeadlessHost::mobile(), config, TransformRegistry::new())
}

fn shown_counter(lightbox: &Lightbox<HeadlessHost>) -> (Rc<Cell<u32>>, Subscription) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let sub = lightbox.on(LightboxEvent::ContentShown, move || c.set(c.get() + 1));
    (count, sub)
}

fn fetches(host: &HeadlessHost) -> usize {
    host.calls_matching(|c| matches!(c, HostCall::Fetch(_))).len()
}

// ============================================================================
// Content loader
// ============================================================================

#[test]
fn local_target_presents_synchronously_without_fetch() {
    let f = desktop(LightboxConfig::new().local_content("terms", "<h1>Terms</h1>"));
    let (shown, _sub) = shown_counter(&f.lightbox);

    f.lightbox.load_content("@terms", None, None);

    assert_eq!(fetches(&f.host), 0);
    assert!(f.lightbox.is_visible());
    assert_eq!(f.host.node(f.surfaces.content).html, "<h1>Terms</h1>");
    assert_eq!(shown.get(), 1);
}

#[test]
fn local_key_is_text_after_the_at_sign() {
    let f = desktop(LightboxConfig::new().local_content("faq", "<p>faq</p>"));
    f.lightbox.load_content("/help@faq", None, None);
    assert_eq!(fetches(&f.host), 0);
    assert_eq!(f.host.node(f.surfaces.content).html, "<p>faq</p>");
}

#[test]
fn unknown_local_key_is_fetched() {
    let f = desktop(LightboxConfig::new().base_url("/lb"));
    f.lightbox.load_content("@missing", None, None);

    let requests = f.host.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "/lb@missing");
    assert_eq!(requests[0].header("is-lightbox-content"), Some("true"));
}

#[test]
fn remote_target_presents_on_response() {
    let f = desktop(LightboxConfig::new().base_url("https://example.com"));
    let (shown, _sub) = shown_counter(&f.lightbox);

    f.lightbox.load_content("/help/shipping", None, None);
    assert_eq!(f.host.requests()[0].url, "https://example.com/help/shipping");
    assert!(!f.lightbox.is_visible());
    assert_eq!(shown.get(), 0);
    // The overlay fades in before any content exists.
    assert!(f.host.is_displayed(f.surfaces.overlay));

    assert!(f.host.respond_latest(Ok("<p>Shipping</p>".into())));
    assert!(f.lightbox.is_visible());
    assert_eq!(shown.get(), 1);
    assert_eq!(f.host.node(f.surfaces.content).html, "<p>Shipping</p>");
}

#[test]
fn request_options_extend_but_cannot_override() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content(
        "/form",
        Some(
            RequestOptions::new()
                .header("is-lightbox-content", "false")
                .header("x-requested-with", "lightbox")
                .query("step", "2"),
        ),
        None,
    );
    let request = &f.host.requests()[0];
    assert_eq!(request.url, "/form");
    assert_eq!(request.header("is-lightbox-content"), Some("true"));
    assert_eq!(request.header("x-requested-with"), Some("lightbox"));
    assert_eq!(request.query, vec![("step".to_owned(), "2".to_owned())]);
}

#[test]
fn loader_text_shows_until_content_arrives() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content("/slow", None, Some("Loading…"));
    assert!(f.host.is_displayed(f.surfaces.loader));
    assert_eq!(f.host.node(f.surfaces.loader).text.as_deref(), Some("Loading…"));

    f.host.respond_latest(Ok("<p>done</p>".into()));
    assert!(!f.host.is_displayed(f.surfaces.loader));
}

#[test]
fn no_loader_text_hides_indicator() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content("/a", None, Some("Loading…"));
    f.lightbox.load_content("/b", None, None);
    assert!(!f.host.is_displayed(f.surfaces.loader));
}

#[test]
fn failed_fetch_leaves_loader_visible() {
    let f = desktop(LightboxConfig::new());
    let (shown, _sub) = shown_counter(&f.lightbox);
    f.lightbox.load_content("/broken", None, Some("Loading…"));

    f.host.respond_latest(Err(FetchError::Status(500)));

    assert!(f.host.is_displayed(f.surfaces.loader));
    assert!(f.host.is_displayed(f.surfaces.overlay));
    assert!(!f.lightbox.is_visible());
    assert_eq!(shown.get(), 0);
}

#[test]
fn superseded_response_is_dropped() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content("/a", None, None);
    f.lightbox.load_content("/b", None, None);

    f.host.respond(1, Ok("<p>B</p>".into()));
    f.host.respond(0, Ok("<p>A</p>".into()));

    assert_eq!(f.host.node(f.surfaces.content).html, "<p>B</p>");
}

#[test]
fn response_after_close_does_not_reopen() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content("/a", None, None);
    f.lightbox.close();

    f.host.respond_latest(Ok("<p>late</p>".into()));

    assert!(!f.lightbox.is_visible());
    assert_eq!(f.host.bound_count(Key::ESCAPE), 0);
}

#[test]
fn show_content_bypasses_loader() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.show_content("<form>…</form>");

    assert_eq!(fetches(&f.host), 0);
    assert!(f.lightbox.is_visible());
    assert!(f.host.calls().contains(&HostCall::FadeIn(f.surfaces.overlay, FD)));
}

#[test]
fn show_content_accepts_nodes() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let c = Rc::clone(&calls);
    let f = fixture(
        HeadlessHost::desktop(),
        LightboxConfig::new(),
        TransformRegistry::<HeadlessHost>::new()
            .with("width", move |_, arg| c.borrow_mut().push(arg.to_owned())),
    );
    let form = f.host.create_fragment("form", "<!-- width: 640 --><input>");

    f.lightbox.show_content(Content::Node(form));

    assert_eq!(f.host.node(f.surfaces.content).children, Some(Content::Node(form)));
    assert_eq!(*calls.borrow(), vec!["640".to_owned()]);
}

// ============================================================================
// Inline transforms
// ============================================================================

#[test]
fn directives_dispatch_last_value_and_skip_unknown() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let f = fixture(
        HeadlessHost::desktop(),
        LightboxConfig::new(),
        TransformRegistry::<HeadlessHost>::new()
            .with("title", move |_, arg| s.borrow_mut().push(arg.to_owned())),
    );

    let parsed = f.lightbox.do_inline_transforms(
        "<!-- title: First --><p>x</p><!-- Title: Upper --><!-- other: y --><!-- title: Second -->",
    );

    assert_eq!(*seen.borrow(), vec!["Second".to_owned()]);
    assert_eq!(parsed.get("title"), Some("Second"));
    assert_eq!(parsed.get("other"), Some("y"));
    assert_eq!(parsed.len(), 2);
}

#[test]
fn transforms_run_before_desktop_measurement() {
    let f = fixture(
        HeadlessHost::desktop(),
        LightboxConfig::new(),
        TransformRegistry::<HeadlessHost>::new().with("frame-height", |lb, arg| {
            let height: f64 = arg.parse().unwrap_or_default();
            lb.host().set_metrics(
                lb.surfaces().inner,
                Metrics {
                    outer_width: 200.0,
                    outer_height: height,
                    ..Metrics::default()
                },
            );
        }),
    );

    f.lightbox.show_content("<!-- frame-height: 500 --><div></div>");

    let style = f.host.node(f.surfaces.inner).style;
    assert_eq!(style.margin_top, Some(-250.0));
    assert_eq!(style.margin_left, Some(-100.0));
}

#[test]
fn handlers_may_call_back_into_the_widget() {
    let f = fixture(
        HeadlessHost::desktop(),
        LightboxConfig::new(),
        TransformRegistry::<HeadlessHost>::new().with("navigate", |lb, _| lb.close_pending()),
    );
    f.lightbox.show_content("<!-- navigate: away -->");
    assert!(
        f.host
            .calls()
            .contains(&HostCall::FadeOut(f.surfaces.inner, DEFAULT_INNER_FADE))
    );
}

#[test]
fn apply_transforms_with_explicit_map() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let f = fixture(
        HeadlessHost::desktop(),
        LightboxConfig::new(),
        TransformRegistry::<HeadlessHost>::new()
            .with("a", move |_, arg| s.borrow_mut().push(arg.to_owned())),
    );
    let map: TransformMap = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
    f.lightbox.apply_transforms(&map);
    assert_eq!(*seen.borrow(), vec!["3".to_owned()]);
}

// ============================================================================
// Presentation strategies
// ============================================================================

#[test]
fn desktop_centers_and_animates_frame() {
    let f = desktop(LightboxConfig::new());
    f.host.set_metrics(
        f.surfaces.inner,
        Metrics {
            outer_width: 600.0,
            outer_height: 400.0,
            ..Metrics::default()
        },
    );
    f.host.user_scroll(1000.0);
    f.host.clear_calls();

    f.lightbox.show_content("<p>hi</p>");

    let calls = f.host.calls();
    let inner = f.surfaces.inner;
    let styles: Vec<_> = calls
        .iter()
        .filter_map(|c| match c {
            HostCall::ApplyStyle(node, style) if *node == inner => Some(*style),
            _ => None,
        })
        .collect();
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].margin_top, Some(-200.0));
    assert_eq!(styles[0].margin_left, Some(-300.0));
    assert_eq!(styles[0].top, Some(1400.0));
    assert_eq!(styles[0].display, Some(Display::Block));
    assert_eq!(styles[0].opacity, Some(0.0));
    assert_eq!(styles[0].transform, Some(Transform::new(0.6, 0.0, 40.0)));
    assert!(calls.contains(&HostCall::Transition(inner, Transition::SETTLED, FD)));

    let stop = calls.iter().position(|c| *c == HostCall::Stop(inner));
    let style = calls
        .iter()
        .position(|c| matches!(c, HostCall::ApplyStyle(n, _) if *n == inner));
    assert!(stop < style);

    f.host.advance(FD);
    let node = f.host.node(inner);
    assert_eq!(node.opacity, 1.0);
    assert_eq!(node.style.transform, Some(Transform::IDENTITY));
}

#[test]
fn mobile_takes_over_page_without_centering() {
    let f = mobile(LightboxConfig::new().local_content("x", "<p>x</p>"));
    assert!(!f.lightbox.is_desktop());
    f.host.user_scroll(350.0);

    f.lightbox.load_content("@x", None, None);

    let desktop_calls = f.host.calls_matching(|c| {
        matches!(
            c,
            HostCall::Measure(_) | HostCall::ApplyStyle(..) | HostCall::Transition(..)
        )
    });
    assert!(desktop_calls.is_empty());
    assert!(!f.host.is_displayed(f.surfaces.page));
    assert!(f.host.is_displayed(f.surfaces.inner));
    assert_eq!(f.lightbox.state().last_scroll_offset, 350.0);
}

#[test]
fn mobile_close_restores_page_and_scroll() {
    let f = mobile(LightboxConfig::new());
    f.host.user_scroll(420.0);
    f.lightbox.show_content("<p>x</p>");
    f.host.user_scroll(0.0);

    f.lightbox.close();

    assert!(f.host.is_displayed(f.surfaces.page));
    assert_eq!(f.host.scroll(), 420.0);
}

#[test]
fn presentation_is_fixed_at_construction() {
    let f = desktop(LightboxConfig::new());
    f.host.set_viewport(Viewport::new(320.0, 640.0));
    f.lightbox.show_content("<p>x</p>");
    assert!(f.lightbox.is_desktop());
    assert!(f.host.is_displayed(f.surfaces.page));
}

// ============================================================================
// Scroll corrector
// ============================================================================

fn scroll_fixture() -> Fixture {
    let f = fixture(
        HeadlessHost::new(Viewport::new(1024.0, 300.0)),
        LightboxConfig::new(),
        TransformRegistry::new(),
    );
    f.host.set_metrics(
        f.surfaces.content,
        Metrics {
            offset_top: 100.0,
            height: 400.0,
            ..Metrics::default()
        },
    );
    f
}

#[test]
fn scroll_is_clamped_into_band() {
    let f = scroll_fixture();
    f.lightbox.show_content("<p>x</p>");

    f.host.user_scroll(0.0);
    assert_eq!(f.lightbox.fix_scroll(), Some(50.0));
    assert_eq!(f.host.scroll(), 50.0);

    f.host.user_scroll(400.0);
    assert_eq!(f.lightbox.fix_scroll(), Some(250.0));
    assert_eq!(f.host.scroll(), 250.0);

    f.host.user_scroll(100.0);
    assert_eq!(f.lightbox.fix_scroll(), None);
    assert_eq!(f.host.scroll(), 100.0);
}

#[test]
fn first_open_does_not_scroll() {
    let f = scroll_fixture();
    f.host.user_scroll(0.0);
    f.lightbox.show_content("<p>x</p>");
    assert!(
        f.host
            .calls_matching(|c| matches!(c, HostCall::SetScrollTop(_)))
            .is_empty()
    );
}

#[test]
fn replacing_open_content_scrolls() {
    let f = scroll_fixture();
    f.lightbox.show_content("<p>x</p>");
    f.host.user_scroll(0.0);
    f.lightbox.show_content("<p>y</p>");
    assert_eq!(f.host.scroll(), 50.0);
}

#[test]
fn scroll_correction_is_desktop_only() {
    let f = mobile(LightboxConfig::new());
    f.lightbox.show_content("<p>x</p>");
    assert_eq!(f.lightbox.fix_scroll(), None);
}

#[test]
fn hidden_lightbox_does_not_scroll() {
    let f = scroll_fixture();
    assert_eq!(f.lightbox.fix_scroll(), None);
}

// ============================================================================
// Escape binding and close
// ============================================================================

#[test]
fn escape_closes_and_unbinds() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.show_content("<p>x</p>");
    assert_eq!(f.host.bound_count(Key::ESCAPE), 1);

    assert_eq!(f.host.press(Key::ESCAPE), KeyOutcome::Consumed);

    assert!(!f.lightbox.is_visible());
    assert_eq!(f.host.bound_count(Key::ESCAPE), 0);
    assert_eq!(f.lightbox.escape_binding(), None);
    assert_eq!(f.host.press(Key::ESCAPE), KeyOutcome::Ignored);
}

#[test]
fn close_reopen_keeps_single_binding() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.show_content("<p>1</p>");
    f.lightbox.close();
    assert_eq!(f.host.bound_count(Key::ESCAPE), 0);

    f.lightbox.show_content("<p>2</p>");
    assert_eq!(f.host.bound_count(Key::ESCAPE), 1);

    // Replacing content while open re-arms rather than stacking.
    f.lightbox.show_content("<p>3</p>");
    assert_eq!(f.host.bound_count(Key::ESCAPE), 1);
}

#[test]
fn bindings_are_scoped_per_widget() {
    let host = HeadlessHost::desktop();
    let a = fixture(Rc::clone(&host), LightboxConfig::new(), TransformRegistry::new());
    let b = fixture(Rc::clone(&host), LightboxConfig::new(), TransformRegistry::new());
    a.lightbox.show_content("<p>a</p>");
    b.lightbox.show_content("<p>b</p>");
    assert_eq!(host.bound_count(Key::ESCAPE), 2);

    host.press(Key::ESCAPE);
    assert!(a.lightbox.is_visible());
    assert!(!b.lightbox.is_visible());
    assert_eq!(host.bound_count(Key::ESCAPE), 1);
}

#[test]
fn dropping_widget_releases_binding() {
    let Fixture { host, lightbox, .. } = desktop(LightboxConfig::new());
    lightbox.show_content("<p>x</p>");
    drop(lightbox);
    assert_eq!(host.bound_count(Key::ESCAPE), 0);
}

#[test]
fn close_fades_and_force_hides_after_grace() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content("/x", None, Some("Loading…"));
    f.host.respond_latest(Err(FetchError::Timeout));
    assert!(f.host.is_displayed(f.surfaces.loader));
    f.host.clear_calls();

    f.lightbox.close();

    let calls = f.host.calls();
    assert!(calls.contains(&HostCall::FadeOut(f.surfaces.inner, DEFAULT_INNER_FADE)));
    assert!(calls.contains(&HostCall::FadeOut(f.surfaces.overlay, FD)));

    f.host.advance(FD);
    assert!(!f.host.is_displayed(f.surfaces.overlay));
    assert!(f.host.is_displayed(f.surfaces.loader));

    f.host.advance(Duration::from_millis(10));
    assert!(!f.host.is_displayed(f.surfaces.loader));
}

#[test]
fn reopen_during_grace_is_not_force_hidden() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.show_content("<p>1</p>");
    f.lightbox.close();
    f.host.advance(FD);

    f.lightbox.show_content("<p>2</p>");
    f.host.settle();

    assert!(f.host.is_displayed(f.surfaces.overlay));
    assert!(f.host.is_displayed(f.surfaces.inner));
    assert!(f.lightbox.is_visible());
}

#[test]
fn showing_class_tracks_visibility() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.show_content("<p>x</p>");
    assert!(f.host.has_root_class(SHOWING_CLASS));
    f.lightbox.close();
    assert!(!f.host.has_root_class(SHOWING_CLASS));
}

#[test]
fn close_pending_only_fades_frame() {
    let f = mobile(LightboxConfig::new());
    f.lightbox.show_content("<p>x</p>");
    f.host.clear_calls();

    f.lightbox.close_pending();

    assert_eq!(
        f.host.calls(),
        vec![HostCall::FadeOut(f.surfaces.inner, DEFAULT_INNER_FADE)]
    );
    f.host.settle();
    assert!(!f.host.is_displayed(f.surfaces.inner));
    assert!(f.host.is_displayed(f.surfaces.overlay));
    assert!(!f.host.is_displayed(f.surfaces.page));
    assert!(f.lightbox.is_visible());
}

#[test]
fn force_hide_overlays_is_immediate() {
    let f = desktop(LightboxConfig::new());
    f.lightbox.load_content("/x", None, Some("Loading…"));
    f.lightbox.force_hide_overlays();
    assert!(!f.host.is_displayed(f.surfaces.overlay));
    assert!(!f.host.is_displayed(f.surfaces.loader));
}

// ============================================================================
// Event notifier
// ============================================================================

#[test]
fn content_shown_subscription_by_name() {
    let f = desktop(LightboxConfig::new());
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let sub = f
        .lightbox
        .on_named("content_shown", move || c.set(c.get() + 1))
        .expect("known event");
    assert!(matches!(
        f.lightbox.on_named("content_hidden", || {}),
        Err(UnknownEvent(name)) if name == "content_hidden"
    ));

    f.lightbox.show_content("<p>1</p>");
    drop(sub);
    f.lightbox.show_content("<p>2</p>");

    assert_eq!(count.get(), 1);
}

#[test]
fn listener_sees_visible_state() {
    let f = desktop(LightboxConfig::new());
    let seen = Rc::new(Cell::new(false));
    let (s, lb) = (Rc::clone(&seen), f.lightbox.clone());
    let _sub = f.lightbox.on(LightboxEvent::ContentShown, move || s.set(lb.is_visible()));
    f.lightbox.show_content("<p>x</p>");
    assert!(seen.get());
}
