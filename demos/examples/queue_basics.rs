// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message pool basics.
//!
//! Pool a few banners across two tabs with `pennon_queue`, toggle which tab
//! is in the foreground, and watch the candidate selection change.
//!
//! Run:
//! - `cargo run -p pennon_demos --example queue_basics`

use std::cell::RefCell;
use std::rc::Rc;

use pennon_queue::{
    AnimationHandle, Category, DismissReason, MessageHandler, MessageQueue, Position, Priority,
    ScopeActivity, ScopeKey, SharedMessageHandler,
};

struct Banner {
    label: &'static str,
}

impl MessageHandler for Banner {
    fn show(&mut self, _from: Position, _to: Position) -> AnimationHandle {
        AnimationHandle::new(0)
    }

    fn hide(&mut self, _from: Position, _to: Position, _animate: bool) -> Option<AnimationHandle> {
        None
    }

    fn dismiss(&mut self, reason: DismissReason) {
        println!("  [{}] dismissed ({reason:?})", self.label);
    }

    fn category(&self) -> Category {
        Category::new(0)
    }
}

fn banner(label: &'static str) -> SharedMessageHandler {
    Rc::new(RefCell::new(Banner { label }))
}

fn main() {
    let mut queue: MessageQueue<&'static str, u32> = MessageQueue::new();

    let downloads = ScopeKey::content(1);
    let settings = ScopeKey::content(2);

    for (key, scope, priority) in [
        ("download-started", downloads, Priority::Normal),
        ("download-blocked", downloads, Priority::High),
        ("password-saved", settings, Priority::Normal),
    ] {
        queue.enqueue(banner(key), key, scope, priority);
    }

    // New scopes start out ineligible, so nothing is selectable yet.
    println!("Pooled {} messages", queue.len());
    println!("Selection: {:?}", queue.next_candidates().keys());

    queue.set_scope_activity(downloads, ScopeActivity::Active);
    println!("Downloads tab foregrounded");
    println!("Selection: {:?}", queue.next_candidates().keys());

    queue.set_scope_activity(settings, ScopeActivity::Active);
    println!("Settings tab foregrounded too");
    println!("Selection: {:?}", queue.next_candidates().keys());

    // A hold empties the selection without touching the pool.
    let hold = queue.suspend();
    println!("Suspended");
    println!("Selection: {:?}", queue.next_candidates().keys());
    queue.resume(hold);

    // Dismissing the urgent banner lets enqueue order decide again.
    queue.dismiss("download-blocked", DismissReason::PrimaryAction);
    println!("Selection: {:?}", queue.next_candidates().keys());
}
