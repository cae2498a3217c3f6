#![forbid(unsafe_code)]

//! In-memory collaborators for exercising the arbiter and router without a
//! real view system.
//!
//! [`ViewTree`] is an arena hierarchy whose links can be rewired between
//! calls; [`FakeSurface`] reports a settable edge state and counts queries;
//! the `Recording*` types capture every call made into them.

use std::cell::Cell;

use crate::dispatch::{DispatchError, EventDispatcher, RefreshControl, SurfaceEvent};
use crate::host::{ContainerId, Hierarchy, InterceptionSink, ScrollSurface};

// ---------------------------------------------------------------------------
// ViewTree
// ---------------------------------------------------------------------------

/// Handle into a [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewNode {
    parent: Option<ViewId>,
    container: Option<ContainerId>,
}

/// Arena-backed hierarchy with mutable parent links.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
}

impl ViewTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain view under `parent`.
    pub fn add_view(&mut self, parent: Option<ViewId>) -> ViewId {
        self.push(parent, None)
    }

    /// Add a container with logical id `id` under `parent`.
    pub fn add_container(&mut self, parent: Option<ViewId>, id: i32) -> ViewId {
        self.push(parent, Some(ContainerId::new(id)))
    }

    /// Point `child`'s parent link at `parent`. Cycles are not prevented.
    pub fn attach(&mut self, child: ViewId, parent: ViewId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    /// Clear `child`'s parent link.
    pub fn detach(&mut self, child: ViewId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = None;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, parent: Option<ViewId>, container: Option<ContainerId>) -> ViewId {
        let id = ViewId(self.nodes.len());
        self.nodes.push(ViewNode { parent, container });
        id
    }
}

impl Hierarchy for ViewTree {
    type Node = ViewId;

    fn parent(&self, node: ViewId) -> Option<ViewId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn container_id(&self, node: ViewId) -> Option<ContainerId> {
        self.nodes.get(node.0).and_then(|n| n.container)
    }
}

// ---------------------------------------------------------------------------
// FakeSurface
// ---------------------------------------------------------------------------

/// Embedded surface with a settable scroll edge.
#[derive(Debug, Default)]
pub struct FakeSurface {
    can_scroll_backward: Cell<bool>,
    queries: Cell<usize>,
}

impl FakeSurface {
    /// A surface scrolled to its top edge.
    #[must_use]
    pub fn at_top() -> Self {
        Self::default()
    }

    /// A surface with room to scroll back up.
    #[must_use]
    pub fn scrolled() -> Self {
        let surface = Self::default();
        surface.set_can_scroll_backward(true);
        surface
    }

    pub fn set_can_scroll_backward(&self, can: bool) {
        self.can_scroll_backward.set(can);
    }

    /// Number of times the edge state was read.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl ScrollSurface for FakeSurface {
    fn can_scroll_backward(&self) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.can_scroll_backward.get()
    }
}

// ---------------------------------------------------------------------------
// Recorders
// ---------------------------------------------------------------------------

/// Captures every interception toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    calls: Vec<bool>,
}

impl RecordingSink {
    #[must_use]
    pub fn calls(&self) -> &[bool] {
        &self.calls
    }

    /// The toggle currently in force.
    #[must_use]
    pub fn last(&self) -> Option<bool> {
        self.calls.last().copied()
    }
}

impl InterceptionSink for RecordingSink {
    fn set_interception_allowed(&mut self, allowed: bool) {
        self.calls.push(allowed);
    }
}

/// Host double implementing both [`EventDispatcher`] and [`RefreshControl`].
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    dispatched: Vec<(ContainerId, SurfaceEvent)>,
    refresh_toggles: Vec<(ContainerId, bool)>,
    reject: Option<String>,
}

impl RecordingHost {
    /// Make every subsequent dispatch fail with `reason`.
    pub fn reject_with(&mut self, reason: impl Into<String>) {
        self.reject = Some(reason.into());
    }

    #[must_use]
    pub fn dispatched(&self) -> &[(ContainerId, SurfaceEvent)] {
        &self.dispatched
    }

    #[must_use]
    pub fn refresh_toggles(&self) -> &[(ContainerId, bool)] {
        &self.refresh_toggles
    }

    /// Last refresh state set for `owner`, if any.
    #[must_use]
    pub fn refresh_enabled(&self, owner: ContainerId) -> Option<bool> {
        self.refresh_toggles
            .iter()
            .rev()
            .find(|(id, _)| *id == owner)
            .map(|(_, enabled)| *enabled)
    }
}

impl EventDispatcher for RecordingHost {
    fn dispatch(&mut self, owner: ContainerId, event: &SurfaceEvent) -> Result<(), DispatchError> {
        if let Some(reason) = &self.reject {
            return Err(DispatchError::Rejected {
                owner,
                reason: reason.clone(),
            });
        }
        self.dispatched.push((owner, event.clone()));
        Ok(())
    }
}

impl RefreshControl for RecordingHost {
    fn set_refresh_enabled(&mut self, owner: ContainerId, enabled: bool) {
        self.refresh_toggles.push((owner, enabled));
    }
}
