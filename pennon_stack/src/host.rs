// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: the surface that owns layout, readiness, and animation
//! playback.

use core::fmt;

use pennon_queue::AnimationHandle;
use smallvec::SmallVec;

/// Identifies one launched animation group.
///
/// A fresh token is minted every time a group is handed to the host, and the
/// host echoes it back when reporting completion. A report whose token does
/// not match the in-flight group is stale and gets dropped.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct GroupToken(u64);

impl GroupToken {
    /// Creates a token from its raw identifier.
    ///
    /// Mostly useful in tests; tokens that did not come from a launched
    /// group never match one and are treated as stale.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for GroupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupToken").field(&self.0).finish()
    }
}

/// Every animator of one display transition, played as a unit.
///
/// A transition moves up to two banners, so a group holds up to two handles.
/// The host plays them together and reports completion once, for the whole
/// group, carrying the group's [`token`](AnimationGroup::token).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationGroup {
    token: GroupToken,
    handles: SmallVec<[AnimationHandle; 2]>,
}

impl AnimationGroup {
    pub(crate) fn new(token: GroupToken) -> Self {
        Self {
            token,
            handles: SmallVec::new(),
        }
    }

    pub(crate) fn push(&mut self, handle: AnimationHandle) {
        self.handles.push(handle);
    }

    /// The token a completion report for this group must carry.
    #[must_use]
    pub const fn token(&self) -> GroupToken {
        self.token
    }

    /// The animator handles in this group, in the order their moves were
    /// staged.
    #[must_use]
    pub fn handles(&self) -> &[AnimationHandle] {
        &self.handles
    }

    /// Returns `true` when no animator joined the group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of animators in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

/// Point-in-time snapshot of the host's gates, taken once per reconciliation
/// pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HostStatus {
    /// The surface can take a new banner right now.
    pub ready_for_showing: bool,
    /// A previous readiness request is still being prepared.
    pub pending_show: bool,
    /// The surface's first layout pass has not finished.
    pub initializing_layout: bool,
    /// The surface is gone; nothing should be asked of it.
    pub destroyed: bool,
}

impl HostStatus {
    /// Probes `host` for its current gate states.
    #[must_use]
    pub fn probe(host: &dyn MessageHost) -> Self {
        Self {
            ready_for_showing: host.is_ready_for_showing(),
            pending_show: host.is_pending_show(),
            initializing_layout: host.is_initializing_layout(),
            destroyed: host.is_destroyed(),
        }
    }
}

/// The embedder surface that physically displays message banners.
///
/// The stacking layer never touches pixels; it asks the host about its gates,
/// requests preparation, and hands over [`AnimationGroup`]s for playback. The
/// host answers asynchronously by calling back into the dispatcher:
/// [`host_ready`] once a requested show can proceed, [`layout_complete`] once
/// the initial layout it was asked to watch finishes, and
/// [`animation_group_ended`] when a played group finishes.
///
/// [`host_ready`]: crate::MessageDispatcher::host_ready
/// [`layout_complete`]: crate::MessageDispatcher::layout_complete
/// [`animation_group_ended`]: crate::MessageDispatcher::animation_group_ended
pub trait MessageHost {
    /// The surface can take a new banner right now.
    fn is_ready_for_showing(&self) -> bool;

    /// A previous [`request_showing`](MessageHost::request_showing) is still
    /// outstanding.
    fn is_pending_show(&self) -> bool;

    /// Asks the host to prepare the surface for showing.
    ///
    /// Never called while a previous request is outstanding. The host
    /// eventually answers through
    /// [`host_ready`](crate::MessageDispatcher::host_ready).
    fn request_showing(&mut self);

    /// Hiding finished, or a prepared show was abandoned before anything
    /// appeared. The host may release the surface.
    fn finish_hiding(&mut self);

    /// A group is about to start playing.
    fn on_animation_start(&mut self);

    /// A group finished, whether played to the end or fast-forwarded.
    fn on_animation_end(&mut self);

    /// The surface is gone.
    fn is_destroyed(&self) -> bool;

    /// The surface's first layout pass has not finished.
    fn is_initializing_layout(&self) -> bool;

    /// Registers interest in the completion of the initial layout pass.
    ///
    /// Returns `false` when the host will not deliver the callback, in which
    /// case the caller abandons the wait. Otherwise the host eventually
    /// answers through
    /// [`layout_complete`](crate::MessageDispatcher::layout_complete).
    fn run_after_initial_layout(&mut self) -> bool;

    /// Starts playing `group`.
    ///
    /// The host reports the end of playback through
    /// [`animation_group_ended`](crate::MessageDispatcher::animation_group_ended),
    /// echoing [`AnimationGroup::token`].
    fn play(&mut self, group: &AnimationGroup);

    /// Jumps `group` to its final state synchronously.
    ///
    /// Used when playback must not continue, such as when the queue is
    /// suspended mid-animation. The host must not report this group through
    /// the completion callback; the caller already considers it finished.
    fn fast_forward(&mut self, group: &AnimationGroup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_collect_handles_in_staging_order() {
        let mut group = AnimationGroup::new(GroupToken::new(3));
        assert!(group.is_empty());
        group.push(AnimationHandle::new(8));
        group.push(AnimationHandle::new(9));
        assert_eq!(group.len(), 2);
        assert_eq!(
            group.handles(),
            &[AnimationHandle::new(8), AnimationHandle::new(9)]
        );
        assert_eq!(group.token(), GroupToken::new(3));
    }
}
