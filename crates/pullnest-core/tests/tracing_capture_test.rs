//! Checks the spans and events emitted with the `tracing` feature.

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};

use pullnest_core::testing::{FakeSurface, RecordingHost, RecordingSink, ViewTree};
use pullnest_core::{EventRouter, GestureArbiter, RouteOutcome, SurfaceEvent, TouchEvent};
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use web_time::Instant;

#[derive(Debug, Default)]
struct Captured {
    spans: Vec<String>,
    directives: Vec<String>,
    messages: Vec<String>,
}

struct CaptureLayer {
    state: Arc<Mutex<Captured>>,
}

#[derive(Default)]
struct FieldVisitor {
    directive: Option<String>,
    message: Option<String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "directive" {
            self.directive = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        let mut state = self.state.lock().expect("capture lock");
        state.spans.push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let mut state = self.state.lock().expect("capture lock");
        if let Some(directive) = visitor.directive {
            state.directives.push(directive);
        }
        if let Some(message) = visitor.message {
            state.messages.push(message);
        }
    }
}

fn capture<F: FnOnce()>(f: F) -> Captured {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        state: Arc::clone(&state),
    });
    {
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();
        f();
    }
    let mut guard = state.lock().expect("capture lock");
    std::mem::take(&mut *guard)
}

#[test]
fn arbiter_spans_and_directive_fields() {
    let captured = capture(|| {
        let mut arb = GestureArbiter::default();
        let surface = FakeSurface::at_top();
        let mut sink = RecordingSink::default();
        arb.process(&TouchEvent::down(0.0, 0.0), &surface, &mut sink);
        arb.process(&TouchEvent::move_to(0.0, 40.0), &surface, &mut sink);
        arb.process(&TouchEvent::up(0.0, 40.0), &surface, &mut sink);
    });

    let process_spans = captured
        .spans
        .iter()
        .filter(|name| name.as_str() == "arbiter.process")
        .count();
    assert_eq!(process_spans, 3);
    assert_eq!(captured.directives, vec!["allow".to_string()]);
}

#[test]
fn router_logs_discard() {
    let captured = capture(|| {
        let mut tree = ViewTree::new();
        let surface = tree.add_view(None);
        let mut router = EventRouter::default();
        let mut host = RecordingHost::default();
        let outcome = router.route(
            &tree,
            surface,
            SurfaceEvent::message("late"),
            Instant::now(),
            &mut host,
        );
        assert_eq!(outcome, RouteOutcome::Discarded);
    });

    assert!(captured.spans.iter().any(|name| name == "router.route"));
    assert!(captured.spans.iter().any(|name| name == "ancestry.resolve"));
    assert!(
        captured
            .messages
            .iter()
            .any(|m| m.contains("surface has no owner")),
        "messages: {:?}",
        captured.messages
    );
}
