// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pennon Queue: scope-aware pooling and selection of transient UI messages.
//!
//! This crate holds the non-visual half of a message-banner system: a pool of
//! pending messages, each bound to a lifecycle scope, and the selection rule
//! that decides which two of them deserve the screen. It models the problem
//! as a combination of:
//!
//! - **Message vocabulary** ([`MessageHandler`], [`Position`], [`Priority`],
//!   [`DismissReason`], [`Category`]): The per-message capability feature
//!   code implements, and the value types the queue passes through it.
//! - **The pool** ([`MessageQueue`]): Per-scope storage in enqueue order,
//!   reference-counted suspension, and the two-slot candidate selection.
//! - **Scopes** ([`ScopeKey`], [`ScopeKind`], [`ScopeActivity`],
//!   [`ScopeEvent`], [`NavigationFlags`]): The lifecycle domains messages
//!   are bound to, and the events those domains emit.
//! - **Observation** ([`ScopeChangeController`], [`LifecycleSource`]): One
//!   lifecycle observer per scope with messages, plus the filtering that
//!   decides which navigations implicitly destroy a scope.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use pennon_queue::{
//!     AnimationHandle, Category, DismissReason, MessageHandler, MessageQueue, Position,
//!     Priority, ScopeActivity, ScopeKey, SharedMessageHandler,
//! };
//!
//! struct Toast;
//!
//! impl MessageHandler for Toast {
//!     fn show(&mut self, _from: Position, _to: Position) -> AnimationHandle {
//!         AnimationHandle::new(0)
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
//! let mut queue = MessageQueue::<u32, u32>::new();
//! let scope = ScopeKey::content(1);
//!
//! let toast: SharedMessageHandler = Rc::new(RefCell::new(Toast));
//! queue.enqueue(toast.clone(), 10, scope, Priority::Normal);
//! queue.enqueue(toast, 11, scope, Priority::High);
//!
//! // Nothing is eligible until the scope becomes active.
//! assert!(queue.next_candidates().is_empty());
//! queue.set_scope_activity(scope, ScopeActivity::Active);
//!
//! // High priority takes the front slot; enqueue order fills the back.
//! assert_eq!(queue.next_candidates().keys(), (Some(11), Some(10)));
//! ```
//!
//! ## Selection
//!
//! [`MessageQueue::next_candidates`] answers one question after every
//! mutation: among messages whose scopes are active, which two come first?
//! [`Priority::High`] outranks [`Priority::Normal`], and enqueue order breaks
//! ties, across all scopes. The result is a (front, back) pair; turning that
//! pair into on-screen motion is the job of a stacking layer such as
//! `pennon_stack`.
//!
//! ## Scopes and Observation
//!
//! A message never outlives its scope. The pool tracks each scope's
//! [`ScopeActivity`]; only active scopes contribute candidates, and a
//! destroyed scope's messages are dismissed. [`ScopeChangeController`] keeps
//! the bookkeeping honest: it subscribes an embedder-provided
//! [`LifecycleSource`] exactly when a scope gains its first message,
//! unsubscribes when the last one leaves, and filters raw [`ScopeEvent`]s so
//! that unobserved scopes stay silent and only qualifying navigations count
//! as destruction.
//!
//! ## Suspension
//!
//! [`MessageQueue::suspend`] hands out a [`SuspendToken`] and blanks the
//! candidate pair until every outstanding token is returned through
//! [`MessageQueue::resume`]. The pool itself is untouched, so messages
//! reappear in their original order.
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

mod message;
mod queue;
mod scope;
mod scope_change;

pub use message::{
    AnimationHandle, Category, DismissReason, MessageHandler, Position, Priority,
    SharedMessageHandler,
};
pub use queue::{Candidate, CandidatePair, Dismissal, MessageQueue, SuspendToken};
pub use scope::{
    LifecycleSource, NavigationFlags, ScopeActivity, ScopeEvent, ScopeKey, ScopeKind,
};
pub use scope_change::ScopeChangeController;
