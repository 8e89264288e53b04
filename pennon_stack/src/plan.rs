// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure planning of the next display transition.
//!
//! Given the pair currently on screen and the pair the queue wants, [`plan`]
//! produces at most two slot operations that move the display one step
//! closer. Multi-step changes are deliberately staged: each step settles, the
//! caller re-plans, and the remainder runs in the following pass. Staging
//! keeps every animation group small and means a plan never becomes stale
//! while it runs; the queue may change its mind between passes and the next
//! plan simply starts from wherever the display stands.

use pennon_queue::Position;
use smallvec::SmallVec;

/// The keys occupying the display, front then back.
///
/// The back slot is only occupied when the front is; an empty front with an
/// occupied back never occurs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayedPair<K> {
    /// Occupant of the fully visible slot.
    pub front: Option<K>,
    /// Occupant of the slot peeking out behind it.
    pub back: Option<K>,
}

impl<K> DisplayedPair<K> {
    /// The empty pair: nothing displayed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            front: None,
            back: None,
        }
    }

    /// Returns `true` when neither slot is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    const fn is_well_formed(&self) -> bool {
        self.front.is_some() || self.back.is_none()
    }
}

impl<K> Default for DisplayedPair<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// One show or hide instruction for a single message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotOp<K> {
    /// Move `key`'s banner from `from` into `to`. Also used for moves
    /// between on-screen slots.
    Show {
        /// The message to move.
        key: K,
        /// Where its banner currently rests.
        from: Position,
        /// Where it ends up.
        to: Position,
    },
    /// Move `key`'s banner out of `from` toward `to`.
    Hide {
        /// The message to move.
        key: K,
        /// Where its banner currently rests.
        from: Position,
        /// Where it ends up.
        to: Position,
    },
}

impl<K: Copy> SlotOp<K> {
    /// The message this operation moves.
    #[must_use]
    pub fn key(&self) -> K {
        match *self {
            Self::Show { key, .. } | Self::Hide { key, .. } => key,
        }
    }

    /// Returns `true` when this operation brings a banner onto the screen
    /// from offscreen.
    #[must_use]
    pub fn enters_display(&self) -> bool {
        matches!(
            self,
            Self::Show {
                from: Position::Offscreen,
                ..
            }
        )
    }
}

/// The shape a planned transition takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// The empty display fills with the whole next pair at once.
    ShowAll,
    /// Everything on screen hides.
    HideAll,
    /// A banner appears in the empty back slot.
    ShowBack,
    /// Only the back banner hides. Also the staging step when the back must
    /// clear before a replacement or an incoming push.
    HideBack,
    /// The front hides and the back steps forward. Also the staging step
    /// when the front leaves while the back stays on.
    PromoteBack,
    /// The front steps back and a new banner takes the front.
    PushToBack,
}

/// A planned transition: up to two slot operations, plus the pair as it
/// stands once they complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan<K> {
    /// The shape of this transition.
    pub kind: TransitionKind,
    /// The slot operations to stage, in order.
    pub ops: SmallVec<[SlotOp<K>; 2]>,
    /// The displayed pair once the operations complete.
    pub applied: DisplayedPair<K>,
}

impl<K: Copy> Plan<K> {
    /// Returns `true` when any operation brings a banner in from offscreen,
    /// which means the host must be ready for showing before the plan runs.
    #[must_use]
    pub fn requires_entrance(&self) -> bool {
        self.ops.iter().any(SlotOp::enters_display)
    }
}

/// Computes the next transition from `current` toward `next`.
///
/// Returns `None` when the display already matches. Otherwise the returned
/// [`Plan`] moves at most two banners; when `next` cannot be reached in one
/// step, the plan covers the first stage and the caller re-plans after it
/// completes.
///
/// # Example
///
/// ```
/// use pennon_stack::{DisplayedPair, TransitionKind, plan};
///
/// let current = DisplayedPair { front: Some(1), back: Some(2) };
/// let next = DisplayedPair { front: Some(2), back: None };
///
/// // Dismissing the front hides it and promotes the back in one step.
/// let step = plan(current, next).unwrap();
/// assert_eq!(step.kind, TransitionKind::PromoteBack);
/// assert_eq!(step.ops.len(), 2);
/// assert_eq!(step.applied, next);
///
/// // A settled display plans nothing.
/// assert!(plan(next, next).is_none());
/// ```
pub fn plan<K: Copy + Eq>(current: DisplayedPair<K>, next: DisplayedPair<K>) -> Option<Plan<K>> {
    debug_assert!(current.is_well_formed(), "display has a back without a front");
    debug_assert!(next.is_well_formed(), "target has a back without a front");
    if current == next {
        return None;
    }
    let mut ops: SmallVec<[SlotOp<K>; 2]> = SmallVec::new();
    let planned = match (current.front, next.front) {
        (None, None) => return None,
        (None, Some(nf)) => {
            ops.push(SlotOp::Show {
                key: nf,
                from: Position::Offscreen,
                to: Position::Front,
            });
            if let Some(nb) = next.back {
                ops.push(SlotOp::Show {
                    key: nb,
                    from: Position::Offscreen,
                    to: Position::Back,
                });
            }
            Plan {
                kind: TransitionKind::ShowAll,
                ops,
                applied: next,
            }
        }
        (Some(cf), None) => {
            ops.push(SlotOp::Hide {
                key: cf,
                from: Position::Front,
                to: Position::Offscreen,
            });
            if let Some(cb) = current.back {
                ops.push(SlotOp::Hide {
                    key: cb,
                    from: Position::Back,
                    to: Position::Offscreen,
                });
            }
            Plan {
                kind: TransitionKind::HideAll,
                ops,
                applied: DisplayedPair::empty(),
            }
        }
        (Some(cf), Some(nf)) if cf == nf => match (current.back, next.back) {
            (None, None) => return None,
            (None, Some(nb)) => {
                ops.push(SlotOp::Show {
                    key: nb,
                    from: Position::Offscreen,
                    to: Position::Back,
                });
                Plan {
                    kind: TransitionKind::ShowBack,
                    ops,
                    applied: next,
                }
            }
            // A differing or unwanted back clears first; any replacement
            // arrives in the following pass.
            (Some(cb), _) => {
                ops.push(SlotOp::Hide {
                    key: cb,
                    from: Position::Back,
                    to: Position::Offscreen,
                });
                Plan {
                    kind: TransitionKind::HideBack,
                    ops,
                    applied: DisplayedPair {
                        front: Some(cf),
                        back: None,
                    },
                }
            }
        },
        (Some(cf), Some(nf)) => {
            if current.back == Some(nf) {
                // The back steps forward; a new back, if any, waits for the
                // next pass.
                ops.push(SlotOp::Hide {
                    key: cf,
                    from: Position::Front,
                    to: Position::Offscreen,
                });
                ops.push(SlotOp::Show {
                    key: nf,
                    from: Position::Back,
                    to: Position::Front,
                });
                Plan {
                    kind: TransitionKind::PromoteBack,
                    ops,
                    applied: DisplayedPair {
                        front: Some(nf),
                        back: None,
                    },
                }
            } else if next.back == Some(cf) {
                match current.back {
                    None => {
                        ops.push(SlotOp::Show {
                            key: cf,
                            from: Position::Front,
                            to: Position::Back,
                        });
                        ops.push(SlotOp::Show {
                            key: nf,
                            from: Position::Offscreen,
                            to: Position::Front,
                        });
                        Plan {
                            kind: TransitionKind::PushToBack,
                            ops,
                            applied: next,
                        }
                    }
                    // The back slot must be free before the front can step
                    // into it.
                    Some(cb) => {
                        ops.push(SlotOp::Hide {
                            key: cb,
                            from: Position::Back,
                            to: Position::Offscreen,
                        });
                        Plan {
                            kind: TransitionKind::HideBack,
                            ops,
                            applied: DisplayedPair {
                                front: Some(cf),
                                back: None,
                            },
                        }
                    }
                }
            } else {
                match current.back {
                    // The back survives into the next pair, so keep it on
                    // screen while the front leaves.
                    Some(cb) if next.back == Some(cb) => {
                        ops.push(SlotOp::Hide {
                            key: cf,
                            from: Position::Front,
                            to: Position::Offscreen,
                        });
                        ops.push(SlotOp::Show {
                            key: cb,
                            from: Position::Back,
                            to: Position::Front,
                        });
                        Plan {
                            kind: TransitionKind::PromoteBack,
                            ops,
                            applied: DisplayedPair {
                                front: Some(cb),
                                back: None,
                            },
                        }
                    }
                    Some(cb) => {
                        ops.push(SlotOp::Hide {
                            key: cf,
                            from: Position::Front,
                            to: Position::Offscreen,
                        });
                        ops.push(SlotOp::Hide {
                            key: cb,
                            from: Position::Back,
                            to: Position::Offscreen,
                        });
                        Plan {
                            kind: TransitionKind::HideAll,
                            ops,
                            applied: DisplayedPair::empty(),
                        }
                    }
                    None => {
                        ops.push(SlotOp::Hide {
                            key: cf,
                            from: Position::Front,
                            to: Position::Offscreen,
                        });
                        Plan {
                            kind: TransitionKind::HideAll,
                            ops,
                            applied: DisplayedPair::empty(),
                        }
                    }
                }
            }
        }
    };
    Some(planned)
}
