// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The message pool: per-scope storage, suspension, and candidate selection.

use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::message::{Category, DismissReason, Priority, SharedMessageHandler};
use crate::scope::{ScopeActivity, ScopeKey};

/// Token returned by [`MessageQueue::suspend`].
///
/// Suspension is reference counted: the queue stays suspended until every
/// outstanding token has been passed back to [`MessageQueue::resume`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SuspendToken(u64);

/// One message selected for display.
///
/// Carries everything the stacking layer needs to drive the message without
/// going back to the pool: its key, its classifying category, and a shared
/// handle to its [`MessageHandler`](crate::MessageHandler).
#[derive(Clone)]
pub struct Candidate<K> {
    /// The message's key.
    pub key: K,
    /// The message's classifying category.
    pub category: Category,
    /// Shared handle to the message's handler.
    pub handler: SharedMessageHandler,
}

impl<K: fmt::Debug> fmt::Debug for Candidate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("key", &self.key)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// The pair of messages the pool currently wants displayed, front then back.
///
/// Both slots empty means nothing should be displayed. The back slot is only
/// occupied when the front is.
#[derive(Clone, Debug)]
pub struct CandidatePair<K> {
    /// The message that should occupy the fully visible slot.
    pub front: Option<Candidate<K>>,
    /// The message that should peek out behind it.
    pub back: Option<Candidate<K>>,
}

impl<K> Default for CandidatePair<K> {
    fn default() -> Self {
        Self {
            front: None,
            back: None,
        }
    }
}

impl<K: Copy> CandidatePair<K> {
    /// Returns `true` when neither slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    /// The keys of the selected pair, front then back.
    #[must_use]
    pub fn keys(&self) -> (Option<K>, Option<K>) {
        (
            self.front.as_ref().map(|c| c.key),
            self.back.as_ref().map(|c| c.key),
        )
    }
}

/// Outcome of a successful [`MessageQueue::dismiss`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dismissal<S> {
    /// The scope the dismissed message belonged to.
    pub scope: ScopeKey<S>,
    /// `true` when the dismissal removed the scope's last message and the
    /// scope record with it.
    pub scope_emptied: bool,
}

struct Entry<K> {
    key: K,
    seq: u64,
    priority: Priority,
    category: Category,
    handler: SharedMessageHandler,
}

struct ScopeRecord<K> {
    activity: ScopeActivity,
    entries: Vec<Entry<K>>,
}

/// Scope-aware pool of pending messages.
///
/// Messages are grouped by [`ScopeKey`] and kept in enqueue order. The pool
/// answers one question, [`next_candidates`]: among messages whose scopes are
/// currently [`Active`](ScopeActivity::Active), which two should be displayed?
/// High priority wins, then earlier enqueue order, across all scopes.
///
/// The pool performs no display work itself. It tracks scope activity as told
/// through [`set_scope_activity`] and reports dismissals to handlers; driving
/// a host surface is the stacking layer's job.
///
/// `K` identifies a message and `S` identifies a lifecycle source; both are
/// small copyable ids in practice.
///
/// [`next_candidates`]: MessageQueue::next_candidates
/// [`set_scope_activity`]: MessageQueue::set_scope_activity
pub struct MessageQueue<K, S> {
    records: HashMap<ScopeKey<S>, ScopeRecord<K>>,
    index: HashMap<K, ScopeKey<S>>,
    holds: HashSet<u64>,
    next_seq: u64,
    next_token: u64,
}

impl<K, S> Default for MessageQueue<K, S> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            index: HashMap::new(),
            holds: HashSet::new(),
            next_seq: 0,
            next_token: 0,
        }
    }
}

impl<K, S> fmt::Debug for MessageQueue<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("messages", &self.index.len())
            .field("scopes", &self.records.len())
            .field("holds", &self.holds.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash, S: Copy + Eq + Hash> MessageQueue<K, S> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to `scope`'s group, behind every message already there.
    ///
    /// Returns `true` when this is the scope's first pooled message, which is
    /// the caller's cue to start observing the scope's lifecycle. New scope
    /// records start [`Inactive`](ScopeActivity::Inactive) until
    /// [`set_scope_activity`](MessageQueue::set_scope_activity) reports
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already enqueued.
    pub fn enqueue(
        &mut self,
        handler: SharedMessageHandler,
        key: K,
        scope: ScopeKey<S>,
        priority: Priority,
    ) -> bool {
        assert!(
            !self.index.contains_key(&key),
            "message key is already enqueued"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        let category = handler.borrow().category();
        let first_for_scope = !self.records.contains_key(&scope);
        let record = self.records.entry(scope).or_insert_with(|| ScopeRecord {
            activity: ScopeActivity::Inactive,
            entries: Vec::new(),
        });
        record.entries.push(Entry {
            key,
            seq,
            priority,
            category,
            handler,
        });
        self.index.insert(key, scope);
        first_for_scope
    }

    /// Removes `key` from the pool and tells its handler why.
    ///
    /// Unknown keys are a no-op returning `None`, so a message can be
    /// dismissed from several places without coordination; only the first
    /// call reaches the handler.
    pub fn dismiss(&mut self, key: K, reason: DismissReason) -> Option<Dismissal<S>> {
        let scope = self.index.remove(&key)?;
        let Some(record) = self.records.get_mut(&scope) else {
            debug_assert!(false, "scope index points at a missing record");
            return None;
        };
        let Some(at) = record.entries.iter().position(|e| e.key == key) else {
            debug_assert!(false, "scope record lost an indexed message");
            return None;
        };
        let entry = record.entries.remove(at);
        let scope_emptied = record.entries.is_empty();
        if scope_emptied {
            self.records.remove(&scope);
        }
        entry.handler.borrow_mut().dismiss(reason);
        Some(Dismissal {
            scope,
            scope_emptied,
        })
    }

    /// Dismisses every pooled message with `reason` and clears the pool.
    ///
    /// Returns the scopes that were emptied, which is all of them; callers
    /// use the list to tear down lifecycle observers.
    pub fn dismiss_all(&mut self, reason: DismissReason) -> SmallVec<[ScopeKey<S>; 4]> {
        let keys: SmallVec<[K; 8]> = self.index.keys().copied().collect();
        let mut emptied = SmallVec::new();
        for key in keys {
            if let Some(dismissal) = self.dismiss(key, reason) {
                if dismissal.scope_emptied {
                    emptied.push(dismissal.scope);
                }
            }
        }
        emptied
    }

    /// Records the activity of `scope`, if the pool holds messages for it.
    ///
    /// Returns `false` when the scope has no record. Marking a scope
    /// [`Destroyed`](ScopeActivity::Destroyed) removes its messages from
    /// candidate selection immediately, before they are individually
    /// dismissed.
    pub fn set_scope_activity(&mut self, scope: ScopeKey<S>, activity: ScopeActivity) -> bool {
        match self.records.get_mut(&scope) {
            Some(record) => {
                record.activity = activity;
                true
            }
            None => false,
        }
    }

    /// The recorded activity of `scope`, if the pool holds messages for it.
    #[must_use]
    pub fn scope_activity(&self, scope: ScopeKey<S>) -> Option<ScopeActivity> {
        self.records.get(&scope).map(|r| r.activity)
    }

    /// Suspends candidate selection and returns the token that releases the
    /// hold.
    ///
    /// While any hold is outstanding, [`next_candidates`] reports an empty
    /// pair. The pool itself is untouched; messages keep their order.
    ///
    /// [`next_candidates`]: MessageQueue::next_candidates
    pub fn suspend(&mut self) -> SuspendToken {
        let token = SuspendToken(self.next_token);
        self.next_token += 1;
        self.holds.insert(token.0);
        token
    }

    /// Releases the hold identified by `token`.
    ///
    /// Returns `false` when the token was not outstanding, in which case
    /// nothing changes.
    pub fn resume(&mut self, token: SuspendToken) -> bool {
        self.holds.remove(&token.0)
    }

    /// Returns `true` while any suspension hold is outstanding.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        !self.holds.is_empty()
    }

    /// Selects the two messages that should be displayed right now.
    ///
    /// Scans messages in [`Active`](ScopeActivity::Active) scopes and keeps
    /// the best two by priority class, then enqueue order. Returns an empty
    /// pair while the pool is suspended or when no active scope has messages.
    #[must_use]
    pub fn next_candidates(&self) -> CandidatePair<K> {
        if self.is_suspended() {
            return CandidatePair::default();
        }
        let mut best: Option<&Entry<K>> = None;
        let mut second: Option<&Entry<K>> = None;
        for record in self.records.values() {
            if record.activity != ScopeActivity::Active {
                continue;
            }
            for entry in &record.entries {
                if best.is_none_or(|b| Self::rank(entry) < Self::rank(b)) {
                    second = best;
                    best = Some(entry);
                } else if second.is_none_or(|s| Self::rank(entry) < Self::rank(s)) {
                    second = Some(entry);
                }
            }
        }
        CandidatePair {
            front: best.map(Self::candidate),
            back: second.map(Self::candidate),
        }
    }

    /// Number of pooled messages across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when the pool holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` when `key` is pooled.
    #[must_use]
    pub fn is_enqueued(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    /// Number of messages pooled for `scope`.
    #[must_use]
    pub fn scope_len(&self, scope: ScopeKey<S>) -> usize {
        self.records.get(&scope).map_or(0, |r| r.entries.len())
    }

    /// The classifying category `key` was pooled with.
    #[must_use]
    pub fn category_of(&self, key: K) -> Option<Category> {
        let scope = self.index.get(&key)?;
        let record = self.records.get(scope)?;
        record.entries.iter().find(|e| e.key == key).map(|e| e.category)
    }

    /// Iterates over every pooled message key, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.index.keys().copied()
    }

    /// The keys pooled for `scope`, in enqueue order.
    #[must_use]
    pub fn keys_for_scope(&self, scope: ScopeKey<S>) -> SmallVec<[K; 4]> {
        self.records
            .get(&scope)
            .map(|r| r.entries.iter().map(|e| e.key).collect())
            .unwrap_or_default()
    }

    fn rank(entry: &Entry<K>) -> (Reverse<Priority>, u64) {
        (Reverse(entry.priority), entry.seq)
    }

    fn candidate(entry: &Entry<K>) -> Candidate<K> {
        Candidate {
            key: entry.key,
            category: entry.category,
            handler: entry.handler.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::message::{AnimationHandle, MessageHandler, Position};

    #[derive(Default)]
    struct Probe {
        category: u32,
        dismissed: Vec<DismissReason>,
    }

    impl MessageHandler for Probe {
        fn show(&mut self, _from: Position, _to: Position) -> AnimationHandle {
            AnimationHandle::new(0)
        }

        fn hide(
            &mut self,
            _from: Position,
            _to: Position,
            _animate: bool,
        ) -> Option<AnimationHandle> {
            None
        }

        fn dismiss(&mut self, reason: DismissReason) {
            self.dismissed.push(reason);
        }

        fn category(&self) -> Category {
            Category::new(self.category)
        }
    }

    fn probe() -> (Rc<RefCell<Probe>>, SharedMessageHandler) {
        let p = Rc::new(RefCell::new(Probe::default()));
        let h: SharedMessageHandler = p.clone();
        (p, h)
    }

    fn pool() -> MessageQueue<u32, u32> {
        MessageQueue::new()
    }

    #[test]
    fn selects_in_enqueue_order_within_a_class() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.enqueue(probe().1, 11, scope, Priority::Normal);
        q.enqueue(probe().1, 12, scope, Priority::Normal);
        q.set_scope_activity(scope, ScopeActivity::Active);
        assert_eq!(q.next_candidates().keys(), (Some(10), Some(11)));
    }

    #[test]
    fn high_priority_jumps_the_line() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.enqueue(probe().1, 11, scope, Priority::Normal);
        q.enqueue(probe().1, 12, scope, Priority::High);
        q.set_scope_activity(scope, ScopeActivity::Active);
        assert_eq!(q.next_candidates().keys(), (Some(12), Some(10)));
    }

    #[test]
    fn high_priority_ties_break_on_enqueue_order() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::High);
        q.enqueue(probe().1, 11, scope, Priority::High);
        q.set_scope_activity(scope, ScopeActivity::Active);
        assert_eq!(q.next_candidates().keys(), (Some(10), Some(11)));
    }

    #[test]
    fn selection_spans_scopes() {
        let mut q = pool();
        let a = ScopeKey::content(1);
        let b = ScopeKey::content(2);
        q.enqueue(probe().1, 10, a, Priority::Normal);
        q.enqueue(probe().1, 11, b, Priority::Normal);
        q.set_scope_activity(a, ScopeActivity::Active);
        q.set_scope_activity(b, ScopeActivity::Active);
        assert_eq!(q.next_candidates().keys(), (Some(10), Some(11)));
    }

    #[test]
    fn inactive_scopes_are_skipped() {
        let mut q = pool();
        let a = ScopeKey::content(1);
        let b = ScopeKey::content(2);
        q.enqueue(probe().1, 10, a, Priority::High);
        q.enqueue(probe().1, 11, b, Priority::Normal);
        q.set_scope_activity(b, ScopeActivity::Active);
        assert_eq!(q.next_candidates().keys(), (Some(11), None));
    }

    #[test]
    fn destroyed_scopes_are_skipped() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.set_scope_activity(scope, ScopeActivity::Active);
        assert!(!q.next_candidates().is_empty());
        q.set_scope_activity(scope, ScopeActivity::Destroyed);
        assert!(q.next_candidates().is_empty());
        assert!(q.is_enqueued(10));
    }

    #[test]
    #[should_panic(expected = "message key is already enqueued")]
    fn duplicate_key_panics() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
    }

    #[test]
    fn enqueue_reports_first_message_per_scope() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        assert!(q.enqueue(probe().1, 10, scope, Priority::Normal));
        assert!(!q.enqueue(probe().1, 11, scope, Priority::Normal));
        assert!(q.dismiss(10, DismissReason::Timer).is_some());
        assert!(q.dismiss(11, DismissReason::Timer).is_some());
        // The scope record is gone, so the next enqueue is a first again.
        assert!(q.enqueue(probe().1, 12, scope, Priority::Normal));
    }

    #[test]
    fn dismiss_reaches_the_handler_once() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        let (p, h) = probe();
        q.enqueue(h, 10, scope, Priority::Normal);
        let dismissal = q.dismiss(10, DismissReason::Gesture);
        assert_eq!(
            dismissal,
            Some(Dismissal {
                scope,
                scope_emptied: true
            })
        );
        assert_eq!(q.dismiss(10, DismissReason::Gesture), None);
        assert_eq!(p.borrow().dismissed.as_slice(), &[DismissReason::Gesture]);
    }

    #[test]
    fn dismissal_reports_when_scope_still_has_messages() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.enqueue(probe().1, 11, scope, Priority::Normal);
        let dismissal = q.dismiss(10, DismissReason::Timer);
        assert_eq!(
            dismissal,
            Some(Dismissal {
                scope,
                scope_emptied: false
            })
        );
        assert_eq!(q.scope_len(scope), 1);
    }

    #[test]
    fn dismiss_all_clears_the_pool() {
        let mut q = pool();
        let a = ScopeKey::content(1);
        let b = ScopeKey::window(2);
        let (p1, h1) = probe();
        let (p2, h2) = probe();
        q.enqueue(h1, 10, a, Priority::Normal);
        q.enqueue(h2, 11, b, Priority::High);
        let emptied = q.dismiss_all(DismissReason::ClearAll);
        assert_eq!(emptied.len(), 2);
        assert!(q.is_empty());
        assert_eq!(p1.borrow().dismissed.as_slice(), &[DismissReason::ClearAll]);
        assert_eq!(p2.borrow().dismissed.as_slice(), &[DismissReason::ClearAll]);
    }

    #[test]
    fn suspension_empties_selection_until_all_holds_release() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.set_scope_activity(scope, ScopeActivity::Active);
        let t1 = q.suspend();
        let t2 = q.suspend();
        assert!(q.is_suspended());
        assert!(q.next_candidates().is_empty());
        assert!(q.resume(t1));
        assert!(q.is_suspended());
        assert!(q.resume(t2));
        assert!(!q.is_suspended());
        assert_eq!(q.next_candidates().keys(), (Some(10), None));
    }

    #[test]
    fn resume_with_unknown_token_is_a_no_op() {
        let mut q = pool();
        let token = q.suspend();
        assert!(q.resume(token));
        assert!(!q.resume(token));
        assert!(!q.is_suspended());
    }

    #[test]
    fn sequence_numbers_survive_dismissal() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.enqueue(probe().1, 11, scope, Priority::Normal);
        q.dismiss(10, DismissReason::Timer);
        // A re-enqueued message goes to the end of the line, not back to its
        // old position.
        q.enqueue(probe().1, 10, scope, Priority::Normal);
        q.set_scope_activity(scope, ScopeActivity::Active);
        assert_eq!(q.next_candidates().keys(), (Some(11), Some(10)));
    }

    #[test]
    fn keys_for_scope_preserve_enqueue_order() {
        let mut q = pool();
        let a = ScopeKey::content(1);
        let b = ScopeKey::content(2);
        q.enqueue(probe().1, 12, a, Priority::Normal);
        q.enqueue(probe().1, 10, a, Priority::High);
        q.enqueue(probe().1, 11, b, Priority::Normal);
        assert_eq!(q.keys_for_scope(a).as_slice(), &[12, 10]);
        assert_eq!(q.keys_for_scope(b).as_slice(), &[11]);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn categories_are_recorded_per_entry() {
        let mut q = pool();
        let scope = ScopeKey::content(1);
        let tagged: SharedMessageHandler = Rc::new(RefCell::new(Probe {
            category: 7,
            ..Probe::default()
        }));
        q.enqueue(tagged, 10, scope, Priority::Normal);
        q.enqueue(probe().1, 11, scope, Priority::Normal);

        assert_eq!(q.category_of(10), Some(Category::new(7)));
        assert_eq!(q.category_of(11), Some(Category::new(0)));
        assert_eq!(q.category_of(99), None);
        q.set_scope_activity(scope, ScopeActivity::Active);
        assert_eq!(
            q.next_candidates().front.map(|c| c.category),
            Some(Category::new(7))
        );

        q.dismiss(10, DismissReason::Timer);
        assert_eq!(q.category_of(10), None);
    }
}
