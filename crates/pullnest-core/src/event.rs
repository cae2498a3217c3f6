#![forbid(unsafe_code)]

//! Canonical touch event types.
//!
//! The arbiter consumes a single-pointer stream: one `Down`, any number of
//! `Move`s, then `Up` or `Cancel`. Hosts translate their native motion
//! events into [`TouchEvent`] before feeding them in.
//!
//! # Design Notes
//!
//! - Coordinates are surface-local pixels as `f32`; no unit conversion is
//!   performed here.
//! - Ordering is best effort. The arbiter tolerates a `Move` without a
//!   preceding `Down` and a terminal event without an active gesture.

/// Phase of a touch event within a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Finger touched the surface.
    Down,
    /// Finger moved while in contact.
    Move,
    /// Finger lifted.
    Up,
    /// The platform aborted the gesture.
    Cancel,
}

impl TouchPhase {
    /// Whether this phase ends the gesture (`Up` or `Cancel`).
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }

    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Move => "move",
            Self::Up => "up",
            Self::Cancel => "cancel",
        }
    }
}

/// A 2D point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Absolute per-axis displacement from `origin` to `self`, as `(dx, dy)`.
    #[must_use]
    pub fn abs_delta_from(self, origin: Self) -> (f32, f32) {
        ((self.x - origin.x).abs(), (self.y - origin.y).abs())
    }
}

impl From<(f32, f32)> for TouchPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A single touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Where in the gesture this event sits.
    pub phase: TouchPhase,
    /// Position of the pointer.
    pub point: TouchPoint,
}

impl TouchEvent {
    /// Create an event from its parts.
    #[must_use]
    pub const fn new(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            point: TouchPoint::new(x, y),
        }
    }

    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Down, x, y)
    }

    #[must_use]
    pub const fn move_to(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Up, x, y)
    }

    #[must_use]
    pub const fn cancel(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Cancel, x, y)
    }
}
