#![forbid(unsafe_code)]

//! Collaborator contracts supplied by the hosting view hierarchy.
//!
//! The core never owns views. It reaches the outside world only through
//! these traits, which the host implements over whatever handle type its
//! hierarchy uses.

use std::fmt;

/// Stable logical identifier of a container instance.
///
/// The value `-1` is reserved as [`ContainerId::NOT_FOUND`]: the answer for
/// a surface that currently has no enclosing container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(i32);

impl ContainerId {
    /// Sentinel for "no owner". Callers discard the occurrence.
    pub const NOT_FOUND: Self = Self(-1);

    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw integer, `-1` when not found.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether this names a real container.
    #[inline]
    #[must_use]
    pub const fn is_found(self) -> bool {
        self.0 != Self::NOT_FOUND.0
    }

    /// `None` for the sentinel, `Some(self)` otherwise.
    #[must_use]
    pub const fn found(self) -> Option<Self> {
        if self.is_found() { Some(self) } else { None }
    }
}

impl From<Option<ContainerId>> for ContainerId {
    fn from(id: Option<ContainerId>) -> Self {
        id.unwrap_or(Self::NOT_FOUND)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The embedded, independently scrollable surface.
pub trait ScrollSurface {
    /// Whether the content can still scroll toward its top edge.
    ///
    /// Must reflect the current scroll position and have no side effects.
    fn can_scroll_backward(&self) -> bool;
}

impl<T: ScrollSurface + ?Sized> ScrollSurface for &T {
    fn can_scroll_backward(&self) -> bool {
        (**self).can_scroll_backward()
    }
}

/// Receiver of interception directives.
///
/// Implemented over the structural parent of the embedded surface; toggles
/// whether the outer container may claim the active gesture. The change must
/// take effect before the next event of the same gesture is dispatched.
pub trait InterceptionSink {
    fn set_interception_allowed(&mut self, allowed: bool);
}

impl<T: InterceptionSink + ?Sized> InterceptionSink for &mut T {
    fn set_interception_allowed(&mut self, allowed: bool) {
        (**self).set_interception_allowed(allowed);
    }
}

/// Read-only view of the containment hierarchy.
///
/// Links are upward-only and may change between calls. Implementations must
/// answer from the hierarchy as it is at call time and must not cache.
pub trait Hierarchy {
    /// Handle type for nodes. Handles are non-owning.
    type Node: Copy;

    /// Immediate structural parent, `None` when detached or at the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The logical identifier if `node` is a container.
    fn container_id(&self, node: Self::Node) -> Option<ContainerId>;

    /// Type test for container nodes. The ancestry walk stops at the first
    /// node for which this holds.
    fn is_container(&self, node: Self::Node) -> bool {
        self.container_id(node).is_some()
    }
}

impl<H: Hierarchy + ?Sized> Hierarchy for &H {
    type Node = H::Node;

    fn parent(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).parent(node)
    }

    fn container_id(&self, node: Self::Node) -> Option<ContainerId> {
        (**self).container_id(node)
    }

    fn is_container(&self, node: Self::Node) -> bool {
        (**self).is_container(node)
    }
}
