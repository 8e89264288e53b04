// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pennon Stack: front/back stacking and animation sequencing for transient
//! UI messages.
//!
//! This crate turns the candidate pair selected by [`pennon_queue`] into
//! actual on-screen motion against an embedder surface. It models the
//! problem as a combination of:
//!
//! - **The host seam** ([`MessageHost`], [`HostStatus`], [`AnimationGroup`],
//!   [`GroupToken`]): The surface that owns layout, readiness, and
//!   animation playback, probed and driven through a narrow trait.
//! - **Planning** ([`plan`], [`Plan`], [`SlotOp`], [`TransitionKind`],
//!   [`DisplayedPair`]): A pure function from (displayed, wanted) to the at
//!   most two slot operations of the next stage.
//! - **Coordination** ([`StackingCoordinator`], [`Stage`], [`UpdateStep`]):
//!   The state machine that holds plans at the host's gates, keeps a single
//!   animation group in flight, and discards stale callbacks.
//! - **Dispatch** ([`MessageDispatcher`]): The facade owning the pool, the
//!   scope observers, and the coordinator, reconciling after every change.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use pennon_stack::{
//!     AnimationGroup, AnimationHandle, Category, DismissReason, GroupToken, LifecycleSource,
//!     MessageDispatcher, MessageHandler, MessageHost, Position, Priority, ScopeActivity,
//!     ScopeKey, SharedMessageHandler,
//! };
//!
//! // A banner that mints one animator id per move.
//! struct Banner(u64);
//!
//! impl MessageHandler for Banner {
//!     fn show(&mut self, _from: Position, _to: Position) -> AnimationHandle {
//!         AnimationHandle::new(self.0)
//!     }
//!     fn hide(
//!         &mut self,
//!         _from: Position,
//!         _to: Position,
//!         _animate: bool,
//!     ) -> Option<AnimationHandle> {
//!         None
//!     }
//!     fn dismiss(&mut self, _reason: DismissReason) {}
//!     fn category(&self) -> Category {
//!         Category::new(0)
//!     }
//! }
//!
//! // A surface that is always ready and remembers what it was asked to play.
//! #[derive(Default)]
//! struct Surface {
//!     playing: Option<GroupToken>,
//! }
//!
//! impl MessageHost for Surface {
//!     fn is_ready_for_showing(&self) -> bool { true }
//!     fn is_pending_show(&self) -> bool { false }
//!     fn request_showing(&mut self) {}
//!     fn finish_hiding(&mut self) {}
//!     fn on_animation_start(&mut self) {}
//!     fn on_animation_end(&mut self) {}
//!     fn is_destroyed(&self) -> bool { false }
//!     fn is_initializing_layout(&self) -> bool { false }
//!     fn run_after_initial_layout(&mut self) -> bool { true }
//!     fn play(&mut self, group: &AnimationGroup) {
//!         self.playing = Some(group.token());
//!     }
//!     fn fast_forward(&mut self, _group: &AnimationGroup) {}
//! }
//!
//! // Scope sources that report themselves active as soon as they are watched.
//! struct AlwaysActive;
//!
//! impl LifecycleSource<u32> for AlwaysActive {
//!     fn subscribe(&mut self, _scope: ScopeKey<u32>) -> ScopeActivity {
//!         ScopeActivity::Active
//!     }
//!     fn unsubscribe(&mut self, _scope: ScopeKey<u32>) {}
//! }
//!
//! let mut host = Surface::default();
//! let mut dispatcher = MessageDispatcher::<u32, u32>::new(Box::new(AlwaysActive));
//!
//! let banner: SharedMessageHandler = Rc::new(RefCell::new(Banner(7)));
//! dispatcher.enqueue(&mut host, banner, 10, ScopeKey::content(1), Priority::Normal);
//!
//! // The entrance group is playing; report its end and the banner is up.
//! let token = host.playing.take().unwrap();
//! dispatcher.animation_group_ended(&mut host, token);
//! assert_eq!(dispatcher.displayed().front, Some(10));
//! ```
//!
//! ## Staged Transitions
//!
//! A transition never moves more than two banners. When the wanted pair is
//! further away than that, the planner emits only the first stage and the
//! rest happens after the stage's group completes: replacing the back hides
//! the old one, then shows the new one; preempting a full stack clears the
//! back, then pushes the front behind the newcomer. Because every stage ends
//! in a settled display and the next stage is planned fresh, a queue change
//! mid-transition simply redirects the remaining stages instead of
//! invalidating anything.
//!
//! ## Gates and Staleness
//!
//! Plans whose banners enter the display wait until the host reports itself
//! ready; repeated updates fold into one outstanding readiness request.
//! During the host's first layout pass, every plan waits for layout
//! completion, and repeat updates are dropped on the floor. Waits store no
//! plan, so a wake-up replans against the current pool, and the callbacks
//! themselves carry no payload to go stale. Animation completion does carry
//! a payload, the [`GroupToken`]; a report whose token does not match the
//! in-flight group is dropped.
//!
//! ## Suspension
//!
//! Suspending the dispatcher fast-forwards the in-flight group, delivers its
//! completion signal, and hides the remaining banners without animating.
//! Messages stay pooled; releasing the last hold replays the selection from
//! scratch.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.
//!
//! ## Features
//!
//! This crate currently has no optional features. All functionality is always
//! available.

#![no_std]

extern crate alloc;

mod coordinator;
mod dispatcher;
mod host;
mod plan;

pub use coordinator::{Stage, StackingCoordinator, UpdateStep};
pub use dispatcher::MessageDispatcher;
pub use host::{AnimationGroup, GroupToken, HostStatus, MessageHost};
pub use plan::{DisplayedPair, Plan, SlotOp, TransitionKind, plan};

pub use pennon_queue::{
    AnimationHandle, Candidate, CandidatePair, Category, DismissReason, Dismissal,
    LifecycleSource, MessageHandler, MessageQueue, NavigationFlags, Position, Priority,
    ScopeActivity, ScopeChangeController, ScopeEvent, ScopeKey, ScopeKind, SharedMessageHandler,
    SuspendToken,
};
