// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message-side vocabulary: the handler capability and the value types the
//! queue passes through it.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

/// A place a message banner can occupy or move through.
///
/// Every show and hide is described as a move between two positions, so a
/// handler never has to guess what a call means: `show(Offscreen, Front)` is
/// an entrance, `show(Front, Back)` is a demotion within the stack, and
/// `hide(Back, Offscreen)` retires the back banner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    /// Not displayed. Entrances start here and exits end here.
    Offscreen,
    /// The partially visible slot peeking out behind the front banner.
    Back,
    /// The fully visible slot.
    Front,
}

/// Priority class of a pooled message.
///
/// [`High`](Priority::High) outranks every [`Normal`](Priority::Normal)
/// message; within a class, earlier enqueues win. This is the entire display
/// ordering contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Default class, ordered among its peers by enqueue time.
    Normal,
    /// Displayed ahead of all normal-priority messages.
    High,
}

/// Why a message left the queue.
///
/// The reason is forwarded verbatim to [`MessageHandler::dismiss`]. Embedder
/// calls supply user-facing reasons such as [`Gesture`](DismissReason::Gesture);
/// the queue itself attaches [`ScopeDestroyed`](DismissReason::ScopeDestroyed)
/// and [`Navigation`](DismissReason::Navigation) when a scope ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// The auto-dismiss timer expired. Timers live in the embedder.
    Timer,
    /// The user gestured the banner away.
    Gesture,
    /// The user activated the primary action.
    PrimaryAction,
    /// The user activated a secondary action.
    SecondaryAction,
    /// The message's scope was destroyed.
    ScopeDestroyed,
    /// A navigation implicitly ended the message's scope.
    Navigation,
    /// Feature code withdrew its own message.
    DismissedByFeature,
    /// The whole queue was cleared.
    ClearAll,
}

/// Identifier classifying what kind of message a handler fronts.
///
/// Categories carry no scheduling weight. They exist so hosts and embedders
/// can tell message kinds apart when recording or deciding surface chrome.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Category(u32);

impl Category {
    /// Creates a category from its raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Category").field(&self.0).finish()
    }
}

/// Opaque identifier for one embedder-side animator.
///
/// Handles are minted by [`MessageHandler::show`] and
/// [`MessageHandler::hide`] and are never inspected by the queue; they are
/// only grouped and handed back to the host for playback. A handle is spent
/// once its group has been played or fast-forwarded.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    /// Creates a handle from its raw identifier.
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

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnimationHandle").field(&self.0).finish()
    }
}

/// Per-message capability implemented by feature code.
///
/// The queue drives a handler through three verbs. [`show`] and [`hide`]
/// stage a move between [`Position`]s and return the animator that will
/// perform it; [`dismiss`] reports that the message left the queue for good.
/// Every handle returned from [`show`] or [`hide`] is played or
/// fast-forwarded exactly once before the handler is asked to move again.
///
/// Calls arrive re-entrantly with respect to nothing: a handler must not call
/// back into the queue from inside any of these methods.
///
/// [`show`]: MessageHandler::show
/// [`hide`]: MessageHandler::hide
/// [`dismiss`]: MessageHandler::dismiss
pub trait MessageHandler {
    /// Stages a move of the banner from `from` to `to` and returns the
    /// animator that performs it.
    ///
    /// Also used for moves between on-screen slots, such as stepping the
    /// front banner back to make room.
    fn show(&mut self, from: Position, to: Position) -> AnimationHandle;

    /// Stages a move of the banner out of `from` toward `to`.
    ///
    /// With `animate` false the handler must apply the final state
    /// immediately and return `None`. It may also return `None` when there is
    /// nothing to animate.
    fn hide(&mut self, from: Position, to: Position, animate: bool) -> Option<AnimationHandle>;

    /// Reports that the message left the queue. Called exactly once, with the
    /// reason it left.
    fn dismiss(&mut self, reason: DismissReason);

    /// The classifying identifier for this message.
    fn category(&self) -> Category;
}

/// Shared handle to a message handler.
///
/// The queue keeps one clone in the pool and the stacking layer keeps clones
/// for the displayed pair, so handlers outlive any single borrow site.
pub type SharedMessageHandler = Rc<RefCell<dyn MessageHandler>>;
