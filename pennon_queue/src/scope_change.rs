// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scope lifecycle observation: one observer per scope with messages, and
//! the filtering that turns raw lifecycle events into queue-visible changes.

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::scope::{
    LifecycleSource, NavigationFlags, ScopeActivity, ScopeEvent, ScopeKey, ScopeKind,
};

/// Which lifecycle family an observer watches. Chosen once, when the scope
/// gains its first message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ObserverVariant {
    /// Watches a content surface, including its navigations.
    Content { kind: ScopeKind },
    /// Watches a window's foreground state. Navigations never reach it.
    Window,
}

/// Keeps exactly one lifecycle observer per scope that has pooled messages.
///
/// The owner reports pool membership edges through
/// [`first_message_enqueued`] and [`last_message_removed`]; this controller
/// subscribes and unsubscribes the embedder's [`LifecycleSource`] to match.
/// Raw [`ScopeEvent`]s are passed through [`filter_event`], which drops
/// events for unobserved scopes and decides which navigations count as
/// implicit scope destruction.
///
/// Destruction is delivered at most once per observed scope: the observer is
/// detached in the same step, so later events for the scope are dropped.
///
/// [`first_message_enqueued`]: ScopeChangeController::first_message_enqueued
/// [`last_message_removed`]: ScopeChangeController::last_message_removed
/// [`filter_event`]: ScopeChangeController::filter_event
pub struct ScopeChangeController<S> {
    source: Box<dyn LifecycleSource<S>>,
    observed: HashMap<ScopeKey<S>, ObserverVariant>,
}

impl<S> fmt::Debug for ScopeChangeController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeChangeController")
            .field("observed", &self.observed.len())
            .finish_non_exhaustive()
    }
}

impl<S: Copy + Eq + Hash> ScopeChangeController<S> {
    /// Creates a controller that subscribes through `source`.
    #[must_use]
    pub fn new(source: Box<dyn LifecycleSource<S>>) -> Self {
        Self {
            source,
            observed: HashMap::new(),
        }
    }

    /// Starts observing `scope` and returns its current activity.
    ///
    /// Called when the scope gains its first pooled message. If the source
    /// reports the scope already [`Destroyed`](ScopeActivity::Destroyed), no
    /// observer is registered, the subscription is undone, and the caller is
    /// expected to dismiss the message it just pooled.
    ///
    /// # Panics
    ///
    /// Panics if `scope` is already observed.
    pub fn first_message_enqueued(&mut self, scope: ScopeKey<S>) -> ScopeActivity {
        assert!(
            !self.observed.contains_key(&scope),
            "scope is already observed"
        );
        let activity = self.source.subscribe(scope);
        if activity == ScopeActivity::Destroyed {
            self.source.unsubscribe(scope);
            return activity;
        }
        let variant = if scope.kind().binds_to_content() {
            ObserverVariant::Content { kind: scope.kind() }
        } else {
            ObserverVariant::Window
        };
        self.observed.insert(scope, variant);
        activity
    }

    /// Stops observing `scope`.
    ///
    /// Called when the scope loses its last pooled message. A scope that is
    /// not observed, because destruction already detached it, is a no-op.
    pub fn last_message_removed(&mut self, scope: ScopeKey<S>) {
        if self.observed.remove(&scope).is_some() {
            self.source.unsubscribe(scope);
        }
    }

    /// Turns a raw lifecycle event into the activity change the pool should
    /// apply, or `None` when the event changes nothing.
    ///
    /// Events for unobserved scopes are dropped. Navigations are dropped
    /// unless they qualify as implicit destruction for the scope's kind, in
    /// which case this returns [`Destroyed`](ScopeActivity::Destroyed) and
    /// detaches the observer, exactly as an explicit
    /// [`ScopeEvent::Destroyed`] would.
    pub fn filter_event(&mut self, scope: ScopeKey<S>, event: ScopeEvent) -> Option<ScopeActivity> {
        let variant = *self.observed.get(&scope)?;
        match event {
            ScopeEvent::Activated => Some(ScopeActivity::Active),
            ScopeEvent::Deactivated => Some(ScopeActivity::Inactive),
            ScopeEvent::Destroyed => {
                self.detach(scope);
                Some(ScopeActivity::Destroyed)
            }
            ScopeEvent::Navigated(flags) => {
                if Self::navigation_destroys(variant, flags) {
                    self.detach(scope);
                    Some(ScopeActivity::Destroyed)
                } else {
                    None
                }
            }
        }
    }

    /// Returns `true` while `scope` has a live observer.
    #[must_use]
    pub fn is_observed(&self, scope: ScopeKey<S>) -> bool {
        self.observed.contains_key(&scope)
    }

    /// Number of scopes currently observed.
    #[must_use]
    pub fn observed_len(&self) -> usize {
        self.observed.len()
    }

    fn detach(&mut self, scope: ScopeKey<S>) {
        self.observed.remove(&scope);
        self.source.unsubscribe(scope);
    }

    fn navigation_destroys(variant: ObserverVariant, flags: NavigationFlags) -> bool {
        let ObserverVariant::Content { kind } = variant else {
            return false;
        };
        if !flags.contains(NavigationFlags::COMMITTED)
            || flags.intersects(NavigationFlags::SAME_DOCUMENT | NavigationFlags::RELOAD)
        {
            return false;
        }
        match kind {
            ScopeKind::Navigation => true,
            ScopeKind::Origin => !flags.contains(NavigationFlags::SAME_ORIGIN),
            ScopeKind::Content | ScopeKind::Window => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    struct SourceLog {
        subscribed: Vec<ScopeKey<u32>>,
        unsubscribed: Vec<ScopeKey<u32>>,
        initial: ScopeActivity,
    }

    impl Default for SourceLog {
        fn default() -> Self {
            Self {
                subscribed: Vec::new(),
                unsubscribed: Vec::new(),
                initial: ScopeActivity::Inactive,
            }
        }
    }

    struct FakeSource(Rc<RefCell<SourceLog>>);

    impl LifecycleSource<u32> for FakeSource {
        fn subscribe(&mut self, scope: ScopeKey<u32>) -> ScopeActivity {
            let mut log = self.0.borrow_mut();
            log.subscribed.push(scope);
            log.initial
        }

        fn unsubscribe(&mut self, scope: ScopeKey<u32>) {
            self.0.borrow_mut().unsubscribed.push(scope);
        }
    }

    fn controller() -> (Rc<RefCell<SourceLog>>, ScopeChangeController<u32>) {
        let log = Rc::new(RefCell::new(SourceLog::default()));
        let controller = ScopeChangeController::new(Box::new(FakeSource(log.clone())));
        (log, controller)
    }

    #[test]
    fn subscribes_on_first_message_and_unsubscribes_on_last() {
        let (log, mut c) = controller();
        let scope = ScopeKey::content(1);
        assert_eq!(c.first_message_enqueued(scope), ScopeActivity::Inactive);
        assert!(c.is_observed(scope));
        assert_eq!(log.borrow().subscribed.as_slice(), &[scope]);
        c.last_message_removed(scope);
        assert!(!c.is_observed(scope));
        assert_eq!(log.borrow().unsubscribed.as_slice(), &[scope]);
        // Already detached: nothing further reaches the source.
        c.last_message_removed(scope);
        assert_eq!(log.borrow().unsubscribed.len(), 1);
    }

    #[test]
    #[should_panic(expected = "scope is already observed")]
    fn observing_twice_panics() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::content(1);
        c.first_message_enqueued(scope);
        c.first_message_enqueued(scope);
    }

    #[test]
    fn destroyed_at_subscribe_registers_no_observer() {
        let (log, mut c) = controller();
        log.borrow_mut().initial = ScopeActivity::Destroyed;
        let scope = ScopeKey::navigation(1);
        assert_eq!(c.first_message_enqueued(scope), ScopeActivity::Destroyed);
        assert!(!c.is_observed(scope));
        assert_eq!(log.borrow().unsubscribed.as_slice(), &[scope]);
        // The failed observation leaves no state behind, so a later attempt
        // is allowed.
        log.borrow_mut().initial = ScopeActivity::Active;
        assert_eq!(c.first_message_enqueued(scope), ScopeActivity::Active);
    }

    #[test]
    fn activity_events_map_directly() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::content(1);
        c.first_message_enqueued(scope);
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Activated),
            Some(ScopeActivity::Active)
        );
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Deactivated),
            Some(ScopeActivity::Inactive)
        );
    }

    #[test]
    fn events_for_unobserved_scopes_are_dropped() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::content(1);
        assert_eq!(c.filter_event(scope, ScopeEvent::Activated), None);
        assert_eq!(c.filter_event(scope, ScopeEvent::Destroyed), None);
    }

    #[test]
    fn destruction_is_delivered_once_and_detaches() {
        let (log, mut c) = controller();
        let scope = ScopeKey::content(1);
        c.first_message_enqueued(scope);
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Destroyed),
            Some(ScopeActivity::Destroyed)
        );
        assert!(!c.is_observed(scope));
        assert_eq!(log.borrow().unsubscribed.as_slice(), &[scope]);
        assert_eq!(c.filter_event(scope, ScopeEvent::Destroyed), None);
        assert_eq!(log.borrow().unsubscribed.len(), 1);
    }

    #[test]
    fn navigation_scope_destroyed_by_committed_cross_document_navigation() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::navigation(1);
        c.first_message_enqueued(scope);
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Navigated(NavigationFlags::empty())),
            None
        );
        assert_eq!(
            c.filter_event(
                scope,
                ScopeEvent::Navigated(NavigationFlags::COMMITTED | NavigationFlags::SAME_DOCUMENT)
            ),
            None
        );
        assert_eq!(
            c.filter_event(
                scope,
                ScopeEvent::Navigated(NavigationFlags::COMMITTED | NavigationFlags::RELOAD)
            ),
            None
        );
        assert!(c.is_observed(scope));
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Navigated(NavigationFlags::COMMITTED)),
            Some(ScopeActivity::Destroyed)
        );
        assert!(!c.is_observed(scope));
    }

    #[test]
    fn origin_scope_survives_same_origin_navigation() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::origin(1);
        c.first_message_enqueued(scope);
        assert_eq!(
            c.filter_event(
                scope,
                ScopeEvent::Navigated(NavigationFlags::COMMITTED | NavigationFlags::SAME_ORIGIN)
            ),
            None
        );
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Navigated(NavigationFlags::COMMITTED)),
            Some(ScopeActivity::Destroyed)
        );
    }

    #[test]
    fn content_scope_survives_every_navigation() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::content(1);
        c.first_message_enqueued(scope);
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Navigated(NavigationFlags::COMMITTED)),
            None
        );
        assert!(c.is_observed(scope));
    }

    #[test]
    fn window_scope_never_sees_navigation() {
        let (_log, mut c) = controller();
        let scope = ScopeKey::window(1);
        c.first_message_enqueued(scope);
        assert_eq!(
            c.filter_event(scope, ScopeEvent::Navigated(NavigationFlags::COMMITTED)),
            None
        );
        assert!(c.is_observed(scope));
    }

    #[test]
    fn independent_scopes_keep_independent_observers() {
        let (log, mut c) = controller();
        let a = ScopeKey::content(1);
        let b = ScopeKey::window(2);
        c.first_message_enqueued(a);
        c.first_message_enqueued(b);
        assert_eq!(c.observed_len(), 2);
        assert_eq!(
            c.filter_event(a, ScopeEvent::Destroyed),
            Some(ScopeActivity::Destroyed)
        );
        assert!(c.is_observed(b));
        assert_eq!(log.borrow().unsubscribed.as_slice(), &[a]);
    }
}
