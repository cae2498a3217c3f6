#![forbid(unsafe_code)]

//! Owner lookup for embedded surfaces.
//!
//! Occurrences that originate inside embedded content (messages, scroll
//! reports) arrive after the gesture that caused them, sometimes after the
//! surface has been torn down. [`AncestryResolver`] attributes them to the
//! nearest enclosing container by walking parent links upward, re-reading
//! the hierarchy on every call.
//!
//! A detached surface, or a chain that reaches the root without meeting a
//! container, resolves to [`ContainerId::NOT_FOUND`]. That is an ordinary
//! outcome: the caller drops the occurrence.

use crate::host::{ContainerId, Hierarchy};

/// Maximum number of parent links followed before giving up.
///
/// Real view trees are far shallower; hitting this means the hierarchy is
/// cyclic or corrupt.
pub const MAX_ANCESTRY_DEPTH: usize = 4096;

/// Stateless, read-only resolver over a borrowed hierarchy.
#[derive(Debug)]
pub struct AncestryResolver<'h, H: ?Sized> {
    hierarchy: &'h H,
}

impl<H: ?Sized> Clone for AncestryResolver<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for AncestryResolver<'_, H> {}

impl<'h, H> AncestryResolver<'h, H>
where
    H: Hierarchy + ?Sized,
{
    #[must_use]
    pub fn new(hierarchy: &'h H) -> Self {
        Self { hierarchy }
    }

    /// Identifier of the nearest container above `surface`, or `-1`.
    #[must_use]
    pub fn resolve_owner(&self, surface: H::Node) -> ContainerId {
        ContainerId::from(self.find_owner(surface))
    }

    /// Identifier of the nearest container above `surface`.
    ///
    /// The surface itself is never considered; the walk starts at its
    /// immediate parent and stops at the first node for which
    /// [`Hierarchy::is_container`] holds. A container whose id is `-1`
    /// yields `None`.
    #[must_use]
    pub fn find_owner(&self, surface: H::Node) -> Option<ContainerId> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("ancestry.resolve").entered();

        let mut current = self.hierarchy.parent(surface);
        let mut depth = 0usize;

        while let Some(node) = current {
            if self.hierarchy.is_container(node) {
                // A container carrying the sentinel id is indistinguishable
                // from no owner.
                return self
                    .hierarchy
                    .container_id(node)
                    .and_then(ContainerId::found);
            }
            depth += 1;
            if depth >= MAX_ANCESTRY_DEPTH {
                #[cfg(feature = "tracing")]
                tracing::warn!(depth, "ancestry walk hit depth cap, treating as detached");
                return None;
            }
            current = self.hierarchy.parent(node);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(depth, "no enclosing container");
        None
    }
}

/// Shorthand for `AncestryResolver::new(hierarchy).resolve_owner(surface)`.
#[must_use]
pub fn resolve_owner<H>(hierarchy: &H, surface: H::Node) -> ContainerId
where
    H: Hierarchy + ?Sized,
{
    AncestryResolver::new(hierarchy).resolve_owner(surface)
}
