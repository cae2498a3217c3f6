#![forbid(unsafe_code)]

//! Core: touch arbitration for a pull-to-refresh container wrapping an
//! independently scrollable embedded surface.
//!
//! # Role
//! A single vertical drag can mean "scroll the content" or "pull to
//! refresh". `pullnest-core` decides, event by event, which surface owns the
//! gesture, and attributes out-of-band occurrences from the embedded surface
//! to the container that currently owns it.
//!
//! # Primary responsibilities
//! - **GestureArbiter**: per-gesture state machine emitting interception
//!   directives from slop and vertical dominance plus the surface's scroll
//!   edge.
//! - **AncestryResolver**: upward walk from a surface to its nearest
//!   container, `-1` when detached.
//! - **EventRouter**: attribution and delivery of messages, refresh toggles,
//!   scroll and size reports.
//!
//! # How it fits in the system
//! The host owns views, rendering, and the refresh spinner. It implements the
//! traits in [`host`] and [`dispatch`] over its own handles and feeds touch
//! events and surface occurrences in on its UI thread. The arbiter neither
//! blocks nor allocates per event, and no type here synchronizes.

pub mod ancestry;
pub mod arbiter;
pub mod dispatch;
pub mod event;
pub mod host;
pub mod logging;
pub mod scroll;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use ancestry::{AncestryResolver, MAX_ANCESTRY_DEPTH, resolve_owner};
pub use arbiter::{
    ArbiterConfig, ArbiterState, ConfigError, Directive, GestureArbiter, GestureSession,
};
pub use dispatch::{
    DispatchError, EventDispatcher, EventRouter, MessageKind, RefreshControl, RouteOutcome,
    RouterConfig, SurfaceEvent,
};
pub use event::{TouchEvent, TouchPhase, TouchPoint};
pub use host::{ContainerId, Hierarchy, InterceptionSink, ScrollSurface};
pub use scroll::{ScrollMetrics, ScrollThrottle};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
