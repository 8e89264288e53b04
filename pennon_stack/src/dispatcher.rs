// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher: one object that owns the pool, the scope observers, and
//! the stacking coordinator, and keeps them reconciled.

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use smallvec::SmallVec;

use pennon_queue::{
    DismissReason, LifecycleSource, MessageQueue, Priority, ScopeActivity,
    ScopeChangeController, ScopeEvent, ScopeKey, SharedMessageHandler, SuspendToken,
};

use crate::coordinator::{Stage, StackingCoordinator, UpdateStep};
use crate::host::{GroupToken, HostStatus, MessageHost};
use crate::plan::DisplayedPair;

/// Owns a [`MessageQueue`], its [`ScopeChangeController`], and a
/// [`StackingCoordinator`], and reconciles the display after every change.
///
/// Every mutating call takes the [`MessageHost`] so the dispatcher can probe
/// gates and carry out the coordinator's decision immediately. One
/// reconciliation pass runs after each mutation; while an animation group is
/// in flight the pass defers, and the group's completion report triggers the
/// catch-up pass. Host callbacks ([`host_ready`], [`layout_complete`],
/// [`animation_group_ended`]) that nothing waits for are recognized as stale
/// and dropped.
///
/// The dispatcher is single-threaded and non-reentrant: handler and host
/// code called from within a pass must not call back into the dispatcher.
/// Anything a callback wants changed, it requests after the current call
/// returns.
///
/// [`host_ready`]: MessageDispatcher::host_ready
/// [`layout_complete`]: MessageDispatcher::layout_complete
/// [`animation_group_ended`]: MessageDispatcher::animation_group_ended
pub struct MessageDispatcher<K, S> {
    queue: MessageQueue<K, S>,
    scopes: ScopeChangeController<S>,
    coordinator: StackingCoordinator<K>,
}

impl<K: fmt::Debug, S> fmt::Debug for MessageDispatcher<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("queue", &self.queue)
            .field("scopes", &self.scopes)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl<K: Copy + Eq + Hash, S: Copy + Eq + Hash> MessageDispatcher<K, S> {
    /// Creates a dispatcher whose scope observers subscribe through
    /// `source`.
    #[must_use]
    pub fn new(source: Box<dyn LifecycleSource<S>>) -> Self {
        Self {
            queue: MessageQueue::new(),
            scopes: ScopeChangeController::new(source),
            coordinator: StackingCoordinator::new(),
        }
    }

    /// Pools a message and reconciles the display.
    ///
    /// A scope gaining its first message starts lifecycle observation; the
    /// reported activity seeds the scope's eligibility. If the scope turns
    /// out to be already destroyed, the message is dismissed on the spot
    /// with [`DismissReason::ScopeDestroyed`] and nothing is displayed.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already enqueued.
    pub fn enqueue(
        &mut self,
        host: &mut dyn MessageHost,
        handler: SharedMessageHandler,
        key: K,
        scope: ScopeKey<S>,
        priority: Priority,
    ) {
        if self.queue.enqueue(handler, key, scope, priority) {
            let activity = self.scopes.first_message_enqueued(scope);
            if activity == ScopeActivity::Destroyed {
                self.remove(key, DismissReason::ScopeDestroyed);
                return;
            }
            self.queue.set_scope_activity(scope, activity);
        }
        self.reconcile(host);
    }

    /// Dismisses one message and reconciles the display.
    ///
    /// Returns `false` when `key` is not pooled; dismissing an unknown or
    /// already-dismissed message is a no-op, so feature code and timers can
    /// race without coordination.
    pub fn dismiss(&mut self, host: &mut dyn MessageHost, key: K, reason: DismissReason) -> bool {
        if !self.remove(key, reason) {
            return false;
        }
        self.reconcile(host);
        true
    }

    /// Dismisses every pooled message with `reason`.
    ///
    /// The display is reconciled after each removal, exactly as if the
    /// messages were dismissed one by one.
    pub fn dismiss_all(&mut self, host: &mut dyn MessageHost, reason: DismissReason) {
        let keys: SmallVec<[K; 8]> = self.queue.keys().collect();
        for key in keys {
            if self.remove(key, reason) {
                self.reconcile(host);
            }
        }
    }

    /// Suspends display and returns the token that releases the hold.
    ///
    /// On the transition into suspension, an in-flight group is forced to
    /// its end state through [`MessageHost::fast_forward`], its completion
    /// is reported through [`MessageHost::on_animation_end`], and whatever
    /// is still on screen hides instantly. Further holds stack; the queue
    /// resumes once every token is returned.
    pub fn suspend(&mut self, host: &mut dyn MessageHost) -> SuspendToken {
        let was_suspended = self.queue.is_suspended();
        let token = self.queue.suspend();
        if !was_suspended {
            if let Some(group) = self.coordinator.force_complete() {
                host.fast_forward(&group);
                host.on_animation_end();
                // Selection is empty while suspended, so a display the
                // forced group left empty has emptied for good.
                if self.coordinator.displayed().is_empty() {
                    host.finish_hiding();
                }
            }
            self.reconcile(host);
        }
        token
    }

    /// Releases the hold identified by `token`.
    ///
    /// An unknown or already-returned token changes nothing. Releasing the
    /// last hold reconciles once, bringing back whatever the pool now
    /// selects.
    pub fn resume(&mut self, host: &mut dyn MessageHost, token: SuspendToken) {
        if !self.queue.resume(token) {
            return;
        }
        if !self.queue.is_suspended() {
            self.reconcile(host);
        }
    }

    /// Feeds one lifecycle event through the scope filter and applies
    /// whatever change survives.
    ///
    /// Events for scopes without messages are dropped. Activation and
    /// deactivation update eligibility and reconcile. Destruction, explicit
    /// or implied by a qualifying navigation, first removes the scope from
    /// selection and then dismisses its messages one at a time, reconciling
    /// after each, with [`DismissReason::ScopeDestroyed`] or
    /// [`DismissReason::Navigation`] respectively.
    pub fn scope_event(
        &mut self,
        host: &mut dyn MessageHost,
        scope: ScopeKey<S>,
        event: ScopeEvent,
    ) {
        let Some(change) = self.scopes.filter_event(scope, event) else {
            return;
        };
        match change {
            ScopeActivity::Active | ScopeActivity::Inactive => {
                self.queue.set_scope_activity(scope, change);
                self.reconcile(host);
            }
            ScopeActivity::Destroyed => {
                // Off the candidate list first, so mid-sweep reconciliation
                // never picks a doomed sibling.
                self.queue.set_scope_activity(scope, ScopeActivity::Destroyed);
                let reason = if matches!(event, ScopeEvent::Navigated(_)) {
                    DismissReason::Navigation
                } else {
                    DismissReason::ScopeDestroyed
                };
                for key in self.queue.keys_for_scope(scope) {
                    if self.remove(key, reason) {
                        self.reconcile(host);
                    }
                }
            }
        }
    }

    /// The host finished preparing for a requested show.
    ///
    /// Reconciles if the coordinator was waiting; otherwise the report is
    /// stale and dropped.
    pub fn host_ready(&mut self, host: &mut dyn MessageHost) {
        if self.coordinator.host_ready() {
            self.reconcile(host);
        }
    }

    /// The host's initial layout pass finished.
    ///
    /// Reconciles if the coordinator was waiting; otherwise the report is
    /// stale and dropped.
    pub fn layout_complete(&mut self, host: &mut dyn MessageHost) {
        if self.coordinator.layout_complete() {
            self.reconcile(host);
        }
    }

    /// The host reports that the group identified by `token` finished
    /// playing.
    ///
    /// A matching token commits the staged pair, signals
    /// [`MessageHost::on_animation_end`], releases the surface if the
    /// display emptied for good, and runs the catch-up pass for changes that
    /// were deferred mid-flight. A stale token changes nothing.
    pub fn animation_group_ended(&mut self, host: &mut dyn MessageHost, token: GroupToken) {
        if !self.coordinator.animation_group_ended(token) {
            return;
        }
        host.on_animation_end();
        if self.coordinator.displayed().is_empty() && self.queue.next_candidates().is_empty() {
            host.finish_hiding();
        }
        self.reconcile(host);
    }

    /// The keys currently on screen.
    #[must_use]
    pub fn displayed(&self) -> DisplayedPair<K> {
        self.coordinator.displayed()
    }

    /// The coordinator's current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.coordinator.stage()
    }

    /// Returns `true` while any suspension hold is outstanding.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.queue.is_suspended()
    }

    /// The underlying pool, for inspection.
    #[must_use]
    pub fn queue(&self) -> &MessageQueue<K, S> {
        &self.queue
    }

    /// Removes `key` from the pool and tears down its scope's observer when
    /// the scope empties. No display work.
    fn remove(&mut self, key: K, reason: DismissReason) -> bool {
        let Some(dismissal) = self.queue.dismiss(key, reason) else {
            return false;
        };
        if dismissal.scope_emptied {
            self.scopes.last_message_removed(dismissal.scope);
        }
        true
    }

    /// Runs reconciliation passes until the display settles, a gate holds,
    /// or a group starts playing.
    fn reconcile(&mut self, host: &mut dyn MessageHost) {
        loop {
            let status = HostStatus::probe(host);
            let animate = !self.queue.is_suspended();
            let next = self.queue.next_candidates();
            match self.coordinator.begin_update(status, &next, animate) {
                UpdateStep::Settled
                | UpdateStep::CoalescedReadiness
                | UpdateStep::DroppedAwaitingLayout
                | UpdateStep::Abandoned
                | UpdateStep::DeferredAnimating => return,
                UpdateStep::FinishHiding => {
                    host.finish_hiding();
                    return;
                }
                UpdateStep::AwaitReadiness => {
                    host.request_showing();
                    return;
                }
                UpdateStep::AwaitLayout => {
                    if !host.run_after_initial_layout() {
                        self.coordinator.cancel_layout_wait();
                    }
                    return;
                }
                UpdateStep::Animate(group) => {
                    host.on_animation_start();
                    host.play(&group);
                    return;
                }
                UpdateStep::Committed => {
                    if self.coordinator.displayed().is_empty() && next.is_empty() {
                        host.finish_hiding();
                    }
                    // Instant commits may leave staged work; go again.
                }
            }
        }
    }
}
