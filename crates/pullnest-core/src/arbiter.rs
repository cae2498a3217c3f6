#![forbid(unsafe_code)]

//! Gesture arbitration between an outer pull container and an embedded
//! scrollable surface.
//!
//! [`GestureArbiter`] watches the touch stream delivered to the embedded
//! surface and, on every event, decides whether the outer container may
//! intercept the gesture. Each decision is pushed to an
//! [`InterceptionSink`] before `process` returns, so the host's interception
//! check for the *current* event already sees it.
//!
//! # State Machine
//!
//! ```text
//!            down                  move (vertical dominance)
//!   Idle ──────────▶ Tracking ─────────────────────────────▶ ResolvedInner
//!    ▲                  │                                    ResolvedOuter
//!    │    up / cancel   │   move (no dominance): no directive      │
//!    └──────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! - `down` records the origin and emits *disallow* (the inner surface owns
//!   the gesture until proven otherwise).
//! - `move` measures `|dx|`, `|dy|` from the origin. Once `dy > slop` and
//!   `dy > dx`, the surface is asked whether it can still scroll toward its
//!   top: if it can, *disallow*; if it is already at the edge, *allow*.
//!   Every later move re-evaluates, so a drag that scrolls content to the
//!   top mid-gesture hands over to the container on the next move.
//! - `up` / `cancel` emit *disallow* and return to `Idle` from any state.
//!
//! # Invariants
//!
//! 1. At most one [`GestureSession`] exists at a time.
//! 2. While `dy <= slop` for the whole gesture, only *disallow* is emitted.
//! 3. A terminal event always leaves the arbiter `Idle` with *disallow*.
//! 4. The edge state is read at most once per event and never retroactively.
//!
//! # Failure Modes
//!
//! - `move` with no active session is treated as a synthetic `down` at that
//!   point.
//! - `down` while a session is active abandons the stale session and starts
//!   over from the new point.
//! - Non-finite coordinates on `move` are ignored; a non-finite origin is
//!   re-anchored on the next finite move.

use crate::event::{TouchEvent, TouchPhase, TouchPoint};
use crate::host::{InterceptionSink, ScrollSurface};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default touch slop in pixels (8dp at baseline density).
pub const DEFAULT_TOUCH_SLOP_PX: f32 = 8.0;

/// Upper bound applied by [`ArbiterConfig::validated`].
pub const MAX_TOUCH_SLOP_PX: f32 = 1024.0;

/// Environment key for the touch slop override.
pub const ENV_TOUCH_SLOP: &str = "PULLNEST_TOUCH_SLOP_PX";

/// Environment key for forcing nested scroll mode.
pub const ENV_NESTED_SCROLL: &str = "PULLNEST_NESTED_SCROLL";

/// Errors from strict configuration loading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: expected a finite number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key}: expected a boolean (1/0, true/false, yes/no), got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("touch slop must be non-negative, got {0}")]
    NegativeSlop(f32),
}

/// Thresholds and policy for gesture arbitration.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbiterConfig {
    /// Vertical movement (pixels) required before direction counts as
    /// intentional (default: 8.0).
    pub touch_slop_px: f32,
    /// When set, the embedded surface claims every gesture and the outer
    /// container never intercepts (default: false).
    pub nested_scroll_enabled: bool,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            touch_slop_px: DEFAULT_TOUCH_SLOP_PX,
            nested_scroll_enabled: false,
        }
    }
}

impl ArbiterConfig {
    /// Set the touch slop.
    #[must_use]
    pub fn with_touch_slop(mut self, px: f32) -> Self {
        self.touch_slop_px = px;
        self
    }

    /// Enable or disable nested scroll mode.
    #[must_use]
    pub fn with_nested_scroll(mut self, enabled: bool) -> Self {
        self.nested_scroll_enabled = enabled;
        self
    }

    /// Clamp values to safe ranges.
    ///
    /// A NaN or negative slop falls back to [`DEFAULT_TOUCH_SLOP_PX`]; large
    /// or infinite values are capped at [`MAX_TOUCH_SLOP_PX`].
    #[must_use]
    pub fn validated(mut self) -> Self {
        let slop = self.touch_slop_px;
        self.touch_slop_px = if slop.is_nan() || slop < 0.0 {
            DEFAULT_TOUCH_SLOP_PX
        } else {
            slop.min(MAX_TOUCH_SLOP_PX)
        };
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `PULLNEST_TOUCH_SLOP_PX`: touch slop in pixels
    /// - `PULLNEST_NESTED_SCROLL`: `1`/`true`/`yes` to enable nested scroll
    ///
    /// Unparsable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Lenient load through a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match read_slop(&get_env) {
            Ok(Some(px)) => config.touch_slop_px = px,
            Ok(None) => {}
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "ignoring touch slop override");
            }
        }

        match read_bool(&get_env, ENV_NESTED_SCROLL) {
            Ok(Some(enabled)) => config.nested_scroll_enabled = enabled,
            Ok(None) => {}
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "ignoring nested scroll override");
            }
        }

        config.validated()
    }

    /// Strict load through a custom environment lookup.
    ///
    /// Any present but invalid value is an error rather than a fallback.
    pub fn try_from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(px) = read_slop(&get_env)? {
            config.touch_slop_px = px;
        }
        if let Some(enabled) = read_bool(&get_env, ENV_NESTED_SCROLL)? {
            config.nested_scroll_enabled = enabled;
        }
        Ok(config.validated())
    }
}

fn read_slop<F>(get_env: &F) -> Result<Option<f32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get_env(ENV_TOUCH_SLOP) else {
        return Ok(None);
    };
    let px = raw
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|px| px.is_finite())
        .ok_or_else(|| ConfigError::InvalidNumber {
            key: ENV_TOUCH_SLOP,
            value: raw.clone(),
        })?;
    if px < 0.0 {
        return Err(ConfigError::NegativeSlop(px));
    }
    Ok(Some(px))
}

fn read_bool<F>(get_env: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get_env(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(Some(true)),
        "0" | "false" | "no" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { key, value: raw }),
    }
}

// ---------------------------------------------------------------------------
// Directive and state
// ---------------------------------------------------------------------------

/// Interception decision pushed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// The outer container may claim the gesture.
    AllowInterception,
    /// The gesture is reserved for the embedded surface.
    DisallowInterception,
}

impl Directive {
    /// The boolean handed to [`InterceptionSink::set_interception_allowed`].
    #[inline]
    #[must_use]
    pub const fn allows_interception(self) -> bool {
        matches!(self, Self::AllowInterception)
    }

    /// Short label used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllowInterception => "allow",
            Self::DisallowInterception => "disallow",
        }
    }
}

/// Observable arbiter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArbiterState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Gesture started; direction not yet established.
    Tracking,
    /// Last evaluation reserved the gesture for the embedded surface.
    ResolvedInner,
    /// Last evaluation handed the gesture to the outer container.
    ResolvedOuter,
}

/// Per-gesture state, alive from `down` to `up`/`cancel`.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    start: TouchPoint,
    axis_locked: bool,
    interception_allowed: bool,
}

impl GestureSession {
    fn new(start: TouchPoint) -> Self {
        Self {
            start,
            axis_locked: false,
            interception_allowed: false,
        }
    }

    /// Origin of the gesture.
    #[must_use]
    pub fn start(&self) -> TouchPoint {
        self.start
    }

    /// Whether vertical dominance has been observed in this gesture.
    #[must_use]
    pub fn axis_locked(&self) -> bool {
        self.axis_locked
    }

    /// The directive currently in force for this gesture.
    #[must_use]
    pub fn interception_allowed(&self) -> bool {
        self.interception_allowed
    }
}

// ---------------------------------------------------------------------------
// GestureArbiter
// ---------------------------------------------------------------------------

/// Per-surface arbiter. Feed every touch event through
/// [`process`](GestureArbiter::process).
#[derive(Debug, Clone)]
pub struct GestureArbiter {
    config: ArbiterConfig,
    state: ArbiterState,
    session: Option<GestureSession>,
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new(ArbiterConfig::default())
    }
}

impl GestureArbiter {
    /// Create an arbiter. The config is validated first.
    #[must_use]
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config: config.validated(),
            state: ArbiterState::Idle,
            session: None,
        }
    }

    /// Process one touch event.
    ///
    /// Returns the directive emitted for this event, or `None` when the prior
    /// directive stays in force. An emitted directive has already been applied
    /// to `sink` when this returns.
    pub fn process<S, K>(
        &mut self,
        event: &TouchEvent,
        surface: &S,
        sink: &mut K,
    ) -> Option<Directive>
    where
        S: ScrollSurface + ?Sized,
        K: InterceptionSink + ?Sized,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("arbiter.process", phase = event.phase.as_str()).entered();

        let directive = match event.phase {
            TouchPhase::Down => Some(self.on_down(event.point)),
            TouchPhase::Move => self.on_move(event.point, surface),
            TouchPhase::Up | TouchPhase::Cancel => Some(self.on_end()),
        };

        // Nested scroll mode: the embedded surface re-claims on every event.
        let directive = if self.config.nested_scroll_enabled {
            Some(Directive::DisallowInterception)
        } else {
            directive
        };

        if let Some(directive) = directive {
            if let Some(session) = self.session.as_mut() {
                session.interception_allowed = directive.allows_interception();
            }
            sink.set_interception_allowed(directive.allows_interception());
        }
        directive
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ArbiterState {
        self.state
    }

    /// The active gesture session, if any.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Whether a gesture is in progress.
    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Drop any session and return to `Idle` without emitting a directive.
    pub fn reset(&mut self) {
        self.session = None;
        self.state = ArbiterState::Idle;
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next event.
    pub fn set_config(&mut self, config: ArbiterConfig) {
        self.config = config.validated();
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureArbiter {
    fn on_down(&mut self, point: TouchPoint) -> Directive {
        #[cfg(feature = "tracing")]
        if self.session.is_some() {
            tracing::debug!("down during active gesture, restarting session");
        }
        self.session = Some(GestureSession::new(point));
        self.state = ArbiterState::Tracking;
        Directive::DisallowInterception
    }

    fn on_move<S>(&mut self, point: TouchPoint, surface: &S) -> Option<Directive>
    where
        S: ScrollSurface + ?Sized,
    {
        if !point.is_finite() {
            return None;
        }

        let Some(session) = self.session.as_mut() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(x = point.x, y = point.y, "move without down, synthesizing origin");
            return Some(self.on_down(point));
        };

        if !session.start.is_finite() {
            session.start = point;
            return None;
        }

        let (delta_x, delta_y) = point.abs_delta_from(session.start);
        if delta_y <= self.config.touch_slop_px || delta_y <= delta_x {
            return None;
        }
        session.axis_locked = true;

        if self.config.nested_scroll_enabled {
            self.state = ArbiterState::ResolvedInner;
            return Some(Directive::DisallowInterception);
        }

        let can_scroll_backward = surface.can_scroll_backward();
        let directive = if can_scroll_backward {
            self.state = ArbiterState::ResolvedInner;
            Directive::DisallowInterception
        } else {
            self.state = ArbiterState::ResolvedOuter;
            Directive::AllowInterception
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            directive = directive.as_str(),
            delta_x,
            delta_y,
            can_scroll_backward,
            "vertical dominance"
        );

        Some(directive)
    }

    fn on_end(&mut self) -> Directive {
        self.session = None;
        self.state = ArbiterState::Idle;
        Directive::DisallowInterception
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
