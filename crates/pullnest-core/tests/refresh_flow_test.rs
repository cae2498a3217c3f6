//! End-to-end flows: a wrapper container holding a refresh layer that holds
//! the embedded surface, driven through the arbiter and the router together.

use pullnest_core::testing::{FakeSurface, RecordingHost, RecordingSink, ViewId, ViewTree};
use pullnest_core::{
    AncestryResolver, ArbiterConfig, ArbiterState, ContainerId, Directive, EventRouter,
    GestureArbiter, RouteOutcome, RouterConfig, ScrollMetrics, SurfaceEvent, TouchEvent,
};
use web_time::{Duration, Instant};

const WRAPPER_ID: i32 = 42;

struct Fixture {
    tree: ViewTree,
    surface: ViewId,
    refresh: ViewId,
}

fn fixture() -> Fixture {
    let mut tree = ViewTree::new();
    let root = tree.add_view(None);
    let wrapper = tree.add_container(Some(root), WRAPPER_ID);
    let refresh = tree.add_view(Some(wrapper));
    let surface = tree.add_view(Some(refresh));
    Fixture {
        tree,
        surface,
        refresh,
    }
}

#[test]
fn scroll_to_top_then_pull() {
    let mut arb = GestureArbiter::new(ArbiterConfig::default().with_touch_slop(10.0));
    let content = FakeSurface::scrolled();
    let mut sink = RecordingSink::default();

    // Drag down while content still has room to scroll back.
    arb.process(&TouchEvent::down(100.0, 200.0), &content, &mut sink);
    assert_eq!(arb.process(&TouchEvent::move_to(100.0, 205.0), &content, &mut sink), None);
    for y in [230.0, 260.0] {
        arb.process(&TouchEvent::move_to(100.0, y), &content, &mut sink);
        assert_eq!(arb.state(), ArbiterState::ResolvedInner);
    }
    assert_eq!(sink.last(), Some(false));

    // Content reaches its top; the very next move hands the gesture over.
    content.set_can_scroll_backward(false);
    let d = arb.process(&TouchEvent::move_to(100.0, 290.0), &content, &mut sink);
    assert_eq!(d, Some(Directive::AllowInterception));

    arb.process(&TouchEvent::up(100.0, 300.0), &content, &mut sink);
    assert_eq!(arb.state(), ArbiterState::Idle);
    assert_eq!(sink.calls(), &[false, false, false, true, false]);
}

#[test]
fn horizontal_swipe_never_reaches_container() {
    let mut arb = GestureArbiter::default();
    let content = FakeSurface::at_top();
    let mut sink = RecordingSink::default();

    arb.process(&TouchEvent::down(0.0, 0.0), &content, &mut sink);
    for step in 1..=20 {
        let x = step as f32 * 15.0;
        let y = step as f32 * 2.0;
        assert_eq!(arb.process(&TouchEvent::move_to(x, y), &content, &mut sink), None);
    }
    arb.process(&TouchEvent::cancel(300.0, 40.0), &content, &mut sink);

    assert!(sink.calls().iter().all(|allowed| !allowed));
    assert_eq!(content.queries(), 0);
}

#[test]
fn owner_before_and_after_unmount() {
    let Fixture {
        mut tree,
        surface,
        refresh,
    } = fixture();

    let resolver = AncestryResolver::new(&tree);
    assert_eq!(resolver.resolve_owner(surface), ContainerId::new(WRAPPER_ID));
    assert_eq!(resolver.resolve_owner(refresh), ContainerId::new(WRAPPER_ID));

    tree.detach(surface);
    assert_eq!(
        AncestryResolver::new(&tree).resolve_owner(surface),
        ContainerId::NOT_FOUND
    );
}

#[test]
fn messages_follow_the_surface_lifecycle() {
    let Fixture { mut tree, surface, .. } = fixture();
    let mut router = EventRouter::new(RouterConfig::default().with_scroll_events(true));
    let mut host = RecordingHost::default();
    let owner = ContainerId::new(WRAPPER_ID);
    let t = Instant::now();

    // Scrollable element inside the content grabs a touch, then lets go.
    assert_eq!(
        router.route(&tree, surface, SurfaceEvent::message("disable_refresh"), t, &mut host),
        RouteOutcome::RefreshToggled { owner, enabled: false }
    );
    assert_eq!(host.refresh_enabled(owner), Some(false));
    router.route(&tree, surface, SurfaceEvent::message("enable_refresh"), t, &mut host);
    assert_eq!(host.refresh_enabled(owner), Some(true));

    let scroll = SurfaceEvent::Scroll(ScrollMetrics {
        x: 0,
        y: 120,
        content_width: 360,
        content_height: 2400,
        viewport_width: 360,
        viewport_height: 640,
    });
    assert_eq!(
        router.route(&tree, surface, scroll, t + Duration::from_millis(16), &mut host),
        RouteOutcome::Dispatched(owner)
    );
    assert_eq!(
        router.route(&tree, surface, SurfaceEvent::message("{\"n\":1}"), t, &mut host),
        RouteOutcome::Dispatched(owner)
    );

    // Torn down while a message is still in flight.
    tree.detach(surface);
    assert_eq!(
        router.route(&tree, surface, SurfaceEvent::message("{\"n\":2}"), t, &mut host),
        RouteOutcome::Discarded
    );
    assert_eq!(host.dispatched().len(), 2);
}

#[test]
fn remount_under_new_wrapper_reattributes() {
    let Fixture {
        mut tree, surface, ..
    } = fixture();
    let mut router = EventRouter::default();
    let mut host = RecordingHost::default();
    let t = Instant::now();

    let other = tree.add_container(None, 7);
    tree.attach(surface, other);

    assert_eq!(
        router.route(&tree, surface, SurfaceEvent::message("hi"), t, &mut host),
        RouteOutcome::Dispatched(ContainerId::new(7))
    );
}
