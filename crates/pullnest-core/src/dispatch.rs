#![forbid(unsafe_code)]

//! Routing of surface-originated occurrences to their owning container.
//!
//! Embedded content talks back to the host out of band: posted messages,
//! scroll reports, content size changes. Each occurrence is attributed with
//! [`AncestryResolver`] at delivery time, then either applied as a refresh
//! control toggle or handed to the host's [`EventDispatcher`].
//!
//! # Invariants
//!
//! 1. Attribution happens once per occurrence, against the hierarchy as it
//!    is at delivery time.
//! 2. An occurrence whose surface has no owner is discarded, never delivered
//!    to a guessed container.
//! 3. Routing never fails: dispatcher errors are reported in the
//!    [`RouteOutcome`] and logged.

use web_time::{Duration, Instant};

use crate::ancestry::AncestryResolver;
use crate::host::{ContainerId, Hierarchy};
use crate::scroll::{DEFAULT_MIN_SCROLL_SEPARATION, ScrollMetrics, ScrollThrottle};

/// Payload marker asking the owner to disable its pull gesture.
pub const DISABLE_REFRESH_MARKER: &str = "disable_refresh";

/// Payload marker asking the owner to re-enable its pull gesture.
pub const ENABLE_REFRESH_MARKER: &str = "enable_refresh";

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// An occurrence originating inside the embedded surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A message posted by embedded content.
    Message(String),
    /// The content scrolled.
    Scroll(ScrollMetrics),
    /// The surface was resized.
    ContentSizeChanged { width: i32, height: i32 },
}

impl SurfaceEvent {
    #[must_use]
    pub fn message(payload: impl Into<String>) -> Self {
        Self::Message(payload.into())
    }

    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Scroll(_) => "scroll",
            Self::ContentSizeChanged { .. } => "content_size",
        }
    }
}

/// How a message payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    DisableRefresh,
    EnableRefresh,
    /// Opaque data for the host.
    Data,
}

impl MessageKind {
    /// Classify a payload. Markers match anywhere in the payload; the
    /// disable marker is checked first.
    #[must_use]
    pub fn classify(payload: &str) -> Self {
        if payload.contains(DISABLE_REFRESH_MARKER) {
            Self::DisableRefresh
        } else if payload.contains(ENABLE_REFRESH_MARKER) {
            Self::EnableRefresh
        } else {
            Self::Data
        }
    }
}

// ---------------------------------------------------------------------------
// Host seams
// ---------------------------------------------------------------------------

/// Failure reported by a host dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("no event dispatcher registered for container {0}")]
    NoDispatcher(ContainerId),
    #[error("container {owner} rejected event: {reason}")]
    Rejected { owner: ContainerId, reason: String },
}

/// Delivers attributed events to the host.
pub trait EventDispatcher {
    fn dispatch(&mut self, owner: ContainerId, event: &SurfaceEvent) -> Result<(), DispatchError>;
}

/// Toggles a container's own pull gesture.
pub trait RefreshControl {
    fn set_refresh_enabled(&mut self, owner: ContainerId, enabled: bool);
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Which occurrences are forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Forward messages and honor refresh markers (default: true).
    pub messaging_enabled: bool,
    /// Forward scroll reports (default: false).
    pub scroll_events_enabled: bool,
    /// Forward content size changes (default: false).
    pub content_size_events_enabled: bool,
    /// Throttle window for unchanged scroll positions (default: 10ms).
    pub min_scroll_separation: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            messaging_enabled: true,
            scroll_events_enabled: false,
            content_size_events_enabled: false,
            min_scroll_separation: DEFAULT_MIN_SCROLL_SEPARATION,
        }
    }
}

impl RouterConfig {
    #[must_use]
    pub fn with_messaging(mut self, enabled: bool) -> Self {
        self.messaging_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_scroll_events(mut self, enabled: bool) -> Self {
        self.scroll_events_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_content_size_events(mut self, enabled: bool) -> Self {
        self.content_size_events_enabled = enabled;
        self
    }
}

/// What happened to a routed occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Handed to the dispatcher.
    Dispatched(ContainerId),
    /// A refresh marker toggled the owner's pull gesture.
    RefreshToggled { owner: ContainerId, enabled: bool },
    /// The surface has no owner; dropped.
    Discarded,
    /// Messaging is off; dropped.
    MessagingDisabled,
    /// Filtered by configuration or throttling; dropped.
    Suppressed,
    /// The dispatcher refused it.
    DispatchFailed(DispatchError),
}

impl RouteOutcome {
    /// Whether the occurrence reached the host in some form.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Dispatched(_) | Self::RefreshToggled { .. })
    }
}

/// Attributes and forwards surface occurrences for one embedded surface.
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    config: RouterConfig,
    throttle: ScrollThrottle,
}

impl EventRouter {
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        let throttle = ScrollThrottle::new(config.min_scroll_separation);
        Self { config, throttle }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Toggle messaging at runtime.
    pub fn set_messaging_enabled(&mut self, enabled: bool) {
        self.config.messaging_enabled = enabled;
    }

    /// Toggle scroll reporting at runtime. Re-enabling starts a fresh
    /// throttle window.
    pub fn set_scroll_events_enabled(&mut self, enabled: bool) {
        if enabled && !self.config.scroll_events_enabled {
            self.throttle.reset();
        }
        self.config.scroll_events_enabled = enabled;
    }

    /// Route one occurrence from `surface`.
    ///
    /// `host` receives refresh toggles and dispatched events.
    pub fn route<H, D>(
        &mut self,
        hierarchy: &H,
        surface: H::Node,
        event: SurfaceEvent,
        now: Instant,
        host: &mut D,
    ) -> RouteOutcome
    where
        H: Hierarchy + ?Sized,
        D: EventDispatcher + RefreshControl + ?Sized,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("router.route", kind = event.kind_str()).entered();

        if !self.admits(&event, now) {
            return if matches!(event, SurfaceEvent::Message(_)) {
                #[cfg(feature = "tracing")]
                tracing::warn!("message posted while messaging is disabled, dropping");
                RouteOutcome::MessagingDisabled
            } else {
                RouteOutcome::Suppressed
            };
        }

        let Some(owner) = AncestryResolver::new(hierarchy).find_owner(surface) else {
            #[cfg(feature = "tracing")]
            tracing::debug!("surface has no owner, discarding");
            return RouteOutcome::Discarded;
        };

        if let SurfaceEvent::Message(payload) = &event {
            let enabled = match MessageKind::classify(payload) {
                MessageKind::DisableRefresh => Some(false),
                MessageKind::EnableRefresh => Some(true),
                MessageKind::Data => None,
            };
            if let Some(enabled) = enabled {
                host.set_refresh_enabled(owner, enabled);
                #[cfg(feature = "tracing")]
                tracing::debug!(owner = owner.get(), enabled, "refresh toggled");
                return RouteOutcome::RefreshToggled { owner, enabled };
            }
        }

        match host.dispatch(owner, &event) {
            Ok(()) => RouteOutcome::Dispatched(owner),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(owner = owner.get(), error = %err, "dispatch failed");
                RouteOutcome::DispatchFailed(err)
            }
        }
    }

    // Runs before owner lookup, so a scroll report from a detached surface
    // still advances the throttle window.
    fn admits(&mut self, event: &SurfaceEvent, now: Instant) -> bool {
        match event {
            SurfaceEvent::Message(_) => self.config.messaging_enabled,
            SurfaceEvent::Scroll(metrics) => {
                self.config.scroll_events_enabled
                    && self.throttle.should_dispatch(metrics.x, metrics.y, now)
            }
            SurfaceEvent::ContentSizeChanged { .. } => self.config.content_size_events_enabled,
        }
    }
}
