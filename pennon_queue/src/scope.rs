// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scopes: the lifecycle domains messages are bound to.
//!
//! Every pooled message names a [`ScopeKey`], and the scope's lifecycle
//! decides whether the message is eligible for display, hidden, or gone.
//! Lifecycle transitions reach the queue as [`ScopeEvent`]s delivered through
//! an embedder-implemented [`LifecycleSource`].

/// How a scope binds to its underlying lifecycle.
///
/// Content-bound kinds ([`Content`], [`Navigation`], [`Origin`]) follow a
/// content surface such as a tab: the scope is active while the surface is
/// the one the user sees. [`Window`] follows a window's foreground state
/// instead and never reacts to navigation.
///
/// [`Content`]: ScopeKind::Content
/// [`Navigation`]: ScopeKind::Navigation
/// [`Origin`]: ScopeKind::Origin
/// [`Window`]: ScopeKind::Window
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Bound to a content surface; survives navigation.
    Content,
    /// Bound to a content surface and implicitly destroyed by a committed
    /// cross-document, non-reload navigation.
    Navigation,
    /// Like [`ScopeKind::Navigation`], but same-origin navigations keep the
    /// scope alive.
    Origin,
    /// Bound to a window's foreground lifecycle.
    Window,
}

impl ScopeKind {
    /// Returns `true` for kinds observed through a content surface's
    /// lifecycle rather than a window's.
    #[must_use]
    pub const fn binds_to_content(self) -> bool {
        !matches!(self, Self::Window)
    }
}

/// Identifies one lifecycle scope: a kind plus the identity of the underlying
/// source.
///
/// `S` is the embedder's identifier for a content surface or window. Two keys
/// with the same instance but different kinds are distinct scopes with
/// independent observers.
///
/// # Example
///
/// ```
/// use pennon_queue::{ScopeKey, ScopeKind};
///
/// // A banner that should ride out navigation binds to the tab itself.
/// let download = ScopeKey::content(7_u32);
/// assert_eq!(download.kind(), ScopeKind::Content);
///
/// // A banner about the current page leaves when the user does.
/// let permission = ScopeKey::navigation(7_u32);
/// assert_ne!(download, permission);
/// assert_eq!(permission.instance(), 7);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeKey<S> {
    kind: ScopeKind,
    instance: S,
}

impl<S> ScopeKey<S> {
    /// Creates a scope key for `kind` over `instance`.
    #[must_use]
    pub const fn new(kind: ScopeKind, instance: S) -> Self {
        Self { kind, instance }
    }

    /// A [`ScopeKind::Content`] scope over `instance`.
    #[must_use]
    pub const fn content(instance: S) -> Self {
        Self::new(ScopeKind::Content, instance)
    }

    /// A [`ScopeKind::Navigation`] scope over `instance`.
    #[must_use]
    pub const fn navigation(instance: S) -> Self {
        Self::new(ScopeKind::Navigation, instance)
    }

    /// A [`ScopeKind::Origin`] scope over `instance`.
    #[must_use]
    pub const fn origin(instance: S) -> Self {
        Self::new(ScopeKind::Origin, instance)
    }

    /// A [`ScopeKind::Window`] scope over `instance`.
    #[must_use]
    pub const fn window(instance: S) -> Self {
        Self::new(ScopeKind::Window, instance)
    }

    /// The kind of lifecycle this scope binds to.
    #[must_use]
    pub const fn kind(&self) -> ScopeKind {
        self.kind
    }
}

impl<S: Copy> ScopeKey<S> {
    /// The identity of the underlying source.
    #[must_use]
    pub fn instance(&self) -> S {
        self.instance
    }
}

/// Current activity of a scope.
///
/// Only messages in [`Active`](ScopeActivity::Active) scopes are candidates
/// for display. [`Destroyed`](ScopeActivity::Destroyed) is terminal: the
/// scope's messages are dismissed and the scope record dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeActivity {
    /// The scope's content is what the user currently sees.
    Active,
    /// The scope exists but its content is not visible.
    Inactive,
    /// The underlying source is gone.
    Destroyed,
}

bitflags::bitflags! {
    /// Details of one navigation observed in a content-bound scope.
    ///
    /// Used to decide whether the navigation implicitly destroys
    /// [`Navigation`](ScopeKind::Navigation) and
    /// [`Origin`](ScopeKind::Origin) scopes.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct NavigationFlags: u8 {
        /// The navigation committed. Uncommitted navigations never destroy
        /// a scope.
        const COMMITTED = 0b0000_0001;
        /// Same-document navigation (fragment or history state change).
        const SAME_DOCUMENT = 0b0000_0010;
        /// A reload of the current document.
        const RELOAD = 0b0000_0100;
        /// The destination document shares the previous document's origin.
        const SAME_ORIGIN = 0b0000_1000;
    }
}

/// A lifecycle transition delivered by the embedder for an observed scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeEvent {
    /// The scope's content became the one the user sees.
    Activated,
    /// The scope's content stopped being the one the user sees.
    Deactivated,
    /// The underlying source was destroyed. Terminal.
    Destroyed,
    /// A navigation occurred in the scope's content surface.
    Navigated(NavigationFlags),
}

/// Embedder seam for watching scope lifecycles.
///
/// The queue subscribes when a scope gains its first message and
/// unsubscribes when it loses its last one, so at most one subscription per
/// scope is live at a time. After subscribing, the embedder reports
/// transitions by feeding [`ScopeEvent`]s back to the queue's owner.
pub trait LifecycleSource<S> {
    /// Starts watching `scope`'s underlying source and returns its current
    /// activity.
    ///
    /// Returning [`ScopeActivity::Destroyed`] means the source is already
    /// gone; the caller treats the subscription as never having happened and
    /// follows up with [`unsubscribe`](LifecycleSource::unsubscribe).
    fn subscribe(&mut self, scope: ScopeKey<S>) -> ScopeActivity;

    /// Stops watching `scope`. Events delivered after this call are dropped
    /// by the caller.
    fn unsubscribe(&mut self, scope: ScopeKey<S>);
}
