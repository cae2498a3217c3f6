#![forbid(unsafe_code)]

//! Scroll report throttling.
//!
//! Embedded content can report scroll position changes far more often than
//! a host wants to forward them. [`ScrollThrottle`] lets a report through
//! when the position actually moved, or when enough time has passed since
//! the last forwarded report. Velocity is not tracked.

use web_time::{Duration, Instant};

/// Minimum gap between two forwarded reports at an unchanged position.
pub const DEFAULT_MIN_SCROLL_SEPARATION: Duration = Duration::from_millis(10);

/// Snapshot of the embedded surface's scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Horizontal scroll offset.
    pub x: i32,
    /// Vertical scroll offset.
    pub y: i32,
    pub content_width: i32,
    pub content_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
}

impl ScrollMetrics {
    /// Metrics with only the offset set.
    #[must_use]
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            content_width: 0,
            content_height: 0,
            viewport_width: 0,
            viewport_height: 0,
        }
    }

    /// Whether the content is scrolled to its top edge.
    #[must_use]
    pub const fn at_top(&self) -> bool {
        self.y <= 0
    }
}

/// Decides which scroll reports are forwarded.
#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    min_separation: Duration,
    last: Option<(i32, i32, Instant)>,
}

impl Default for ScrollThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCROLL_SEPARATION)
    }
}

impl ScrollThrottle {
    #[must_use]
    pub fn new(min_separation: Duration) -> Self {
        Self {
            min_separation,
            last: None,
        }
    }

    /// Record a scroll report and return whether it should be forwarded.
    ///
    /// The first report is always forwarded. After that, a report passes if
    /// its offset differs from the previous one or if more than the minimum
    /// separation elapsed since the previous one.
    pub fn should_dispatch(&mut self, x: i32, y: i32, now: Instant) -> bool {
        let dispatch = match self.last {
            None => true,
            Some((last_x, last_y, at)) => {
                last_x != x
                    || last_y != y
                    || now.saturating_duration_since(at) > self.min_separation
            }
        };
        self.last = Some((x, y, now));
        dispatch
    }

    /// Forget the previous report.
    pub fn reset(&mut self) {
        self.last = None;
    }

    #[must_use]
    pub fn min_separation(&self) -> Duration {
        self.min_separation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_5: Duration = Duration::from_millis(5);
    const MS_20: Duration = Duration::from_millis(20);

    #[test]
    fn first_report_passes() {
        let mut throttle = ScrollThrottle::default();
        assert!(throttle.should_dispatch(0, 0, Instant::now()));
    }

    #[test]
    fn changed_position_passes_immediately() {
        let mut throttle = ScrollThrottle::default();
        let t = Instant::now();
        assert!(throttle.should_dispatch(0, 0, t));
        assert!(throttle.should_dispatch(0, 1, t));
        assert!(throttle.should_dispatch(2, 1, t));
    }

    #[test]
    fn repeated_position_is_throttled() {
        let mut throttle = ScrollThrottle::default();
        let t = Instant::now();
        assert!(throttle.should_dispatch(0, 10, t));
        assert!(!throttle.should_dispatch(0, 10, t + MS_5));
        assert!(throttle.should_dispatch(0, 10, t + MS_5 + MS_20));
    }

    #[test]
    fn reset_forgets_history() {
        let mut throttle = ScrollThrottle::default();
        let t = Instant::now();
        throttle.should_dispatch(0, 10, t);
        throttle.reset();
        assert!(throttle.should_dispatch(0, 10, t));
    }

    #[test]
    fn at_top_uses_vertical_offset() {
        assert!(ScrollMetrics::at(50, 0).at_top());
        assert!(!ScrollMetrics::at(0, 1).at_top());
    }
}
