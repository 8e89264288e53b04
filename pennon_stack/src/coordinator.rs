// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stacking coordinator: a small state machine wrapped around the
//! planner.
//!
//! The coordinator owns what is actually on screen and moves it toward what
//! the queue wants, one planned stage at a time. It is deliberately
//! sequential: at most one animation group is ever in flight, updates that
//! arrive mid-flight are deferred until the group ends, and waits on host
//! gates store no plan at all. Every wake-up replans from current state, so
//! there is no stored intent to go stale.

use core::fmt;
use core::mem;

use pennon_queue::{CandidatePair, SharedMessageHandler};

use crate::host::{AnimationGroup, GroupToken, HostStatus};
use crate::plan::{DisplayedPair, Plan, SlotOp, plan};

struct Occupant<K> {
    key: K,
    handler: SharedMessageHandler,
}

enum StageState<K> {
    Idle,
    WaitingForLayout,
    WaitingForReadiness,
    Animating {
        group: AnimationGroup,
        applied_front: Option<Occupant<K>>,
        applied_back: Option<Occupant<K>>,
    },
}

/// Externally visible lifecycle stage of the coordinator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Nothing in flight and nothing awaited.
    Idle,
    /// Waiting for the host's initial layout pass to finish.
    WaitingForLayout,
    /// Waiting for the host to become ready for showing.
    WaitingForReadiness,
    /// An animation group is in flight.
    Animating,
}

/// What one [`begin_update`](StackingCoordinator::begin_update) decided, and
/// the single host effect the caller should carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateStep {
    /// The display already matches the wanted pair.
    Settled,
    /// The display matches (it is empty), but a prepared show is still
    /// outstanding; the host should release the surface.
    FinishHiding,
    /// Entering banners need the host prepared; a readiness request should
    /// be issued.
    AwaitReadiness,
    /// A readiness request is already outstanding; this update folded into
    /// it.
    CoalescedReadiness,
    /// Initial layout is still running; a completion callback should be
    /// registered.
    AwaitLayout,
    /// A layout callback is already registered; this update was dropped and
    /// the wake-up will replan.
    DroppedAwaitingLayout,
    /// The host is destroyed; nothing was or will be asked of it.
    Abandoned,
    /// An animation group is in flight; the update waits for its end.
    DeferredAnimating,
    /// The transition applied instantly because nothing needed animating.
    Committed,
    /// A group was minted and should be played.
    Animate(AnimationGroup),
}

/// Owns the displayed pair and sequences every transition through the host's
/// gates.
///
/// Drive order per update: an in-flight animation defers everything; a
/// destroyed host abandons everything; then the planner compares displayed
/// against wanted, the readiness gate holds plans whose banners enter the
/// display, the layout gate holds everything during the host's first layout,
/// and only then are animators minted from the affected handlers and bundled
/// into an [`AnimationGroup`].
///
/// Handles are minted as late as possible. A message that comes and goes
/// while gates are closed never reaches its handler at all, and a group that
/// launches always plays; stale intent cannot exist because waits store no
/// plan.
pub struct StackingCoordinator<K> {
    front: Option<Occupant<K>>,
    back: Option<Occupant<K>>,
    stage: StageState<K>,
    next_token: u64,
}

impl<K> Default for StackingCoordinator<K> {
    fn default() -> Self {
        Self {
            front: None,
            back: None,
            stage: StageState::Idle,
            next_token: 0,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for StackingCoordinator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackingCoordinator")
            .field("front", &self.front.as_ref().map(|o| &o.key))
            .field("back", &self.back.as_ref().map(|o| &o.key))
            .field("stage", &self.stage_name())
            .finish_non_exhaustive()
    }
}

impl<K> StackingCoordinator<K> {
    fn stage_name(&self) -> &'static str {
        match self.stage {
            StageState::Idle => "Idle",
            StageState::WaitingForLayout => "WaitingForLayout",
            StageState::WaitingForReadiness => "WaitingForReadiness",
            StageState::Animating { .. } => "Animating",
        }
    }
}

impl<K: Copy + Eq> StackingCoordinator<K> {
    /// Creates a coordinator with an empty display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The keys currently on screen.
    #[must_use]
    pub fn displayed(&self) -> DisplayedPair<K> {
        DisplayedPair {
            front: self.front.as_ref().map(|o| o.key),
            back: self.back.as_ref().map(|o| o.key),
        }
    }

    /// The coordinator's current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self.stage {
            StageState::Idle => Stage::Idle,
            StageState::WaitingForLayout => Stage::WaitingForLayout,
            StageState::WaitingForReadiness => Stage::WaitingForReadiness,
            StageState::Animating { .. } => Stage::Animating,
        }
    }

    /// Compares the display against `next` and decides the single step to
    /// take, given the host gates in `status`.
    ///
    /// With `animate` false, hides apply instantly; used while the queue is
    /// suspended. The returned [`UpdateStep`] names the one host effect the
    /// caller must perform. After [`UpdateStep::Committed`] the caller
    /// should call again, since a staged transition may have further steps.
    pub fn begin_update(
        &mut self,
        status: HostStatus,
        next: &CandidatePair<K>,
        animate: bool,
    ) -> UpdateStep {
        if matches!(self.stage, StageState::Animating { .. }) {
            return UpdateStep::DeferredAnimating;
        }
        if status.destroyed {
            self.stage = StageState::Idle;
            return UpdateStep::Abandoned;
        }
        let (front, back) = next.keys();
        let target = DisplayedPair { front, back };
        let current = self.displayed();
        let Some(step) = plan(current, target) else {
            if current.is_empty() && status.pending_show {
                // A show was prepared and there is nothing left to show.
                if matches!(self.stage, StageState::WaitingForReadiness) {
                    self.stage = StageState::Idle;
                }
                return UpdateStep::FinishHiding;
            }
            return UpdateStep::Settled;
        };
        if step.requires_entrance() && !status.ready_for_showing {
            if matches!(self.stage, StageState::WaitingForReadiness) || status.pending_show {
                return UpdateStep::CoalescedReadiness;
            }
            self.stage = StageState::WaitingForReadiness;
            return UpdateStep::AwaitReadiness;
        }
        if status.initializing_layout {
            if matches!(self.stage, StageState::WaitingForLayout) {
                return UpdateStep::DroppedAwaitingLayout;
            }
            self.stage = StageState::WaitingForLayout;
            return UpdateStep::AwaitLayout;
        }
        self.launch(&step, next, animate)
    }

    /// The host finished preparing for a requested show.
    ///
    /// Returns `true` when the coordinator was waiting on it, in which case
    /// the caller should replan. A report that nothing waits for is stale
    /// and ignored.
    pub fn host_ready(&mut self) -> bool {
        if matches!(self.stage, StageState::WaitingForReadiness) {
            self.stage = StageState::Idle;
            true
        } else {
            false
        }
    }

    /// The host's initial layout pass finished.
    ///
    /// Returns `true` when the coordinator was waiting on it, in which case
    /// the caller should replan. A report that nothing waits for is stale
    /// and ignored.
    pub fn layout_complete(&mut self) -> bool {
        if matches!(self.stage, StageState::WaitingForLayout) {
            self.stage = StageState::Idle;
            true
        } else {
            false
        }
    }

    /// Abandons a layout wait whose registration the host refused.
    pub fn cancel_layout_wait(&mut self) {
        if matches!(self.stage, StageState::WaitingForLayout) {
            self.stage = StageState::Idle;
        }
    }

    /// The host reports that the group identified by `token` finished.
    ///
    /// On a match, the staged occupants become the displayed pair and the
    /// coordinator returns to idle; the caller should replan to pick up any
    /// deferred changes. Returns `false` for a token that does not match the
    /// in-flight group; such reports are stale and change nothing.
    pub fn animation_group_ended(&mut self, token: GroupToken) -> bool {
        match mem::replace(&mut self.stage, StageState::Idle) {
            StageState::Animating {
                group,
                applied_front,
                applied_back,
            } if group.token() == token => {
                self.front = applied_front;
                self.back = applied_back;
                true
            }
            other => {
                self.stage = other;
                false
            }
        }
    }

    /// Forces the in-flight group, if any, to its end state.
    ///
    /// The staged occupants are committed exactly as a completion report
    /// would have, and the group is returned so the caller can have the host
    /// fast-forward its animators. The completion report the host may still
    /// deliver for this group later is recognized as stale.
    pub fn force_complete(&mut self) -> Option<AnimationGroup> {
        match mem::replace(&mut self.stage, StageState::Idle) {
            StageState::Animating {
                group,
                applied_front,
                applied_back,
            } => {
                self.front = applied_front;
                self.back = applied_back;
                Some(group)
            }
            other => {
                self.stage = other;
                None
            }
        }
    }

    fn launch(&mut self, step: &Plan<K>, next: &CandidatePair<K>, animate: bool) -> UpdateStep {
        self.stage = StageState::Idle;
        let token = GroupToken::new(self.next_token);
        self.next_token += 1;
        let mut group = AnimationGroup::new(token);
        for op in &step.ops {
            let handler = self.resolve(op.key(), next);
            match *op {
                SlotOp::Show { from, to, .. } => {
                    group.push(handler.borrow_mut().show(from, to));
                }
                SlotOp::Hide { from, to, .. } => {
                    if let Some(handle) = handler.borrow_mut().hide(from, to, animate) {
                        group.push(handle);
                    }
                }
            }
        }
        let applied_front = step.applied.front.map(|key| Occupant {
            key,
            handler: self.resolve(key, next),
        });
        let applied_back = step.applied.back.map(|key| Occupant {
            key,
            handler: self.resolve(key, next),
        });
        if group.is_empty() {
            self.front = applied_front;
            self.back = applied_back;
            return UpdateStep::Committed;
        }
        self.stage = StageState::Animating {
            group: group.clone(),
            applied_front,
            applied_back,
        };
        UpdateStep::Animate(group)
    }

    fn resolve(&self, key: K, next: &CandidatePair<K>) -> SharedMessageHandler {
        if let Some(o) = &self.front {
            if o.key == key {
                return o.handler.clone();
            }
        }
        if let Some(o) = &self.back {
            if o.key == key {
                return o.handler.clone();
            }
        }
        if let Some(c) = &next.front {
            if c.key == key {
                return c.handler.clone();
            }
        }
        if let Some(c) = &next.back {
            if c.key == key {
                return c.handler.clone();
            }
        }
        unreachable!("planned a key that is neither displayed nor selected")
    }

}
