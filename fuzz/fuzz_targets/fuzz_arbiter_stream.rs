#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pullnest_core::testing::{FakeSurface, RecordingSink};
use pullnest_core::{
    ArbiterConfig, ArbiterState, Directive, GestureArbiter, TouchEvent, TouchPhase,
};

#[derive(Debug, Arbitrary)]
enum Phase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Arbitrary)]
struct Step {
    phase: Phase,
    x: f32,
    y: f32,
    can_scroll_backward: bool,
}

#[derive(Debug, Arbitrary)]
struct Input {
    slop: f32,
    nested_scroll: bool,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let config = ArbiterConfig::default()
        .with_touch_slop(input.slop)
        .with_nested_scroll(input.nested_scroll);
    let mut arb = GestureArbiter::new(config);
    let surface = FakeSurface::default();
    let mut sink = RecordingSink::default();

    for step in input.steps.iter().take(1024) {
        surface.set_can_scroll_backward(step.can_scroll_backward);
        let phase = match step.phase {
            Phase::Down => TouchPhase::Down,
            Phase::Move => TouchPhase::Move,
            Phase::Up => TouchPhase::Up,
            Phase::Cancel => TouchPhase::Cancel,
        };
        let directive = arb.process(&TouchEvent::new(phase, step.x, step.y), &surface, &mut sink);

        // Post-conditions that must always hold:
        assert!(arb.config().touch_slop_px.is_finite(), "slop not validated");
        if phase.is_terminal() {
            assert_eq!(directive, Some(Directive::DisallowInterception));
            assert_eq!(arb.state(), ArbiterState::Idle);
        }
        if input.nested_scroll {
            assert_eq!(sink.last(), Some(false), "nested scroll allowed interception");
        }
        if let Some(d) = directive {
            assert_eq!(sink.last(), Some(d.allows_interception()));
        }
    }
});
