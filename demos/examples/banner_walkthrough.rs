// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end banner stacking.
//!
//! Drive a [`MessageDispatcher`] against a console-printing host: banners
//! enqueue, stack two deep, an urgent one preempts the front, and the whole
//! display drains when the tab closes.
//!
//! Run:
//! - `cargo run -p pennon_demos --example banner_walkthrough`

use std::cell::RefCell;
use std::rc::Rc;

use pennon_stack::{
    AnimationGroup, AnimationHandle, Category, DismissReason, GroupToken, LifecycleSource,
    MessageDispatcher, MessageHandler, MessageHost, NavigationFlags, Position, Priority,
    ScopeActivity, ScopeEvent, ScopeKey, SharedMessageHandler,
};

struct Banner {
    label: &'static str,
    minted: u64,
}

impl MessageHandler for Banner {
    fn show(&mut self, from: Position, to: Position) -> AnimationHandle {
        println!("  [{}] show {from:?} -> {to:?}", self.label);
        self.minted += 1;
        AnimationHandle::new(self.minted)
    }

    fn hide(&mut self, from: Position, to: Position, animate: bool) -> Option<AnimationHandle> {
        println!("  [{}] hide {from:?} -> {to:?}", self.label);
        if animate {
            self.minted += 1;
            Some(AnimationHandle::new(self.minted))
        } else {
            None
        }
    }

    fn dismiss(&mut self, reason: DismissReason) {
        println!("  [{}] dismissed ({reason:?})", self.label);
    }

    fn category(&self) -> Category {
        Category::new(0)
    }
}

fn banner(label: &'static str) -> SharedMessageHandler {
    Rc::new(RefCell::new(Banner { label, minted: 0 }))
}

/// A host whose animations finish whenever the demo pumps them.
#[derive(Default)]
struct ConsoleHost {
    unfinished: Vec<GroupToken>,
}

impl MessageHost for ConsoleHost {
    fn is_ready_for_showing(&self) -> bool {
        true
    }

    fn is_pending_show(&self) -> bool {
        false
    }

    fn request_showing(&mut self) {}

    fn finish_hiding(&mut self) {
        println!("  (host) display released");
    }

    fn on_animation_start(&mut self) {}

    fn on_animation_end(&mut self) {}

    fn is_destroyed(&self) -> bool {
        false
    }

    fn is_initializing_layout(&self) -> bool {
        false
    }

    fn run_after_initial_layout(&mut self) -> bool {
        false
    }

    fn play(&mut self, group: &AnimationGroup) {
        println!("  (host) playing {} handle(s)", group.len());
        self.unfinished.push(group.token());
    }

    fn fast_forward(&mut self, group: &AnimationGroup) {
        println!("  (host) fast-forwarding {} handle(s)", group.len());
        self.unfinished.retain(|&t| t != group.token());
    }
}

struct AlwaysActive;

impl LifecycleSource<u32> for AlwaysActive {
    fn subscribe(&mut self, scope: ScopeKey<u32>) -> ScopeActivity {
        println!("  (lifecycle) observing {scope:?}");
        ScopeActivity::Active
    }

    fn unsubscribe(&mut self, scope: ScopeKey<u32>) {
        println!("  (lifecycle) released {scope:?}");
    }
}

/// Reports completion for every played group, including the ones the
/// reports themselves cause to launch.
fn pump(dispatcher: &mut MessageDispatcher<&'static str, u32>, host: &mut ConsoleHost) {
    while let Some(token) = host.unfinished.pop() {
        dispatcher.animation_group_ended(host, token);
    }
}

fn main() {
    let mut host = ConsoleHost::default();
    let mut dispatcher: MessageDispatcher<&'static str, u32> =
        MessageDispatcher::new(Box::new(AlwaysActive));
    let tab = ScopeKey::content(1);

    println!("Enqueue \"saved\":");
    dispatcher.enqueue(&mut host, banner("saved"), "saved", tab, Priority::Normal);
    pump(&mut dispatcher, &mut host);

    println!("Enqueue \"synced\"; it stacks behind:");
    dispatcher.enqueue(&mut host, banner("synced"), "synced", tab, Priority::Normal);
    pump(&mut dispatcher, &mut host);

    println!("Enqueue \"offline\" (urgent); it preempts the front:");
    dispatcher.enqueue(&mut host, banner("offline"), "offline", tab, Priority::High);
    pump(&mut dispatcher, &mut host);
    println!("Displayed: {:?}", dispatcher.displayed());

    println!("Swipe the urgent banner away:");
    dispatcher.dismiss(&mut host, "offline", DismissReason::Gesture);
    pump(&mut dispatcher, &mut host);
    println!("Displayed: {:?}", dispatcher.displayed());

    println!("A navigation commits; banners bound to tab content ride through:");
    dispatcher.scope_event(
        &mut host,
        tab,
        ScopeEvent::Navigated(NavigationFlags::COMMITTED),
    );
    println!("Displayed: {:?}", dispatcher.displayed());

    println!("The tab closes:");
    dispatcher.scope_event(&mut host, tab, ScopeEvent::Destroyed);
    pump(&mut dispatcher, &mut host);
    println!("Displayed: {:?}", dispatcher.displayed());
}
