// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pennon_stack::{
    AnimationGroup, AnimationHandle, Category, DismissReason, DisplayedPair, GroupToken,
    LifecycleSource, MessageDispatcher, MessageHandler, MessageHost, Position, Priority,
    ScopeActivity, ScopeKey, SharedMessageHandler, plan,
};

struct Minting {
    next: u64,
}

impl MessageHandler for Minting {
    fn show(&mut self, _from: Position, _to: Position) -> AnimationHandle {
        self.next += 1;
        AnimationHandle::new(self.next)
    }

    fn hide(&mut self, _from: Position, _to: Position, animate: bool) -> Option<AnimationHandle> {
        if animate {
            self.next += 1;
            Some(AnimationHandle::new(self.next))
        } else {
            None
        }
    }

    fn dismiss(&mut self, _reason: DismissReason) {}

    fn category(&self) -> Category {
        Category::new(0)
    }
}

fn minting() -> SharedMessageHandler {
    Rc::new(RefCell::new(Minting { next: 0 }))
}

/// A host that is always ready and records played groups for completion.
#[derive(Default)]
struct NullHost {
    unfinished: Vec<GroupToken>,
}

impl MessageHost for NullHost {
    fn is_ready_for_showing(&self) -> bool {
        true
    }

    fn is_pending_show(&self) -> bool {
        false
    }

    fn request_showing(&mut self) {}

    fn finish_hiding(&mut self) {}

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
        self.unfinished.push(group.token());
    }

    fn fast_forward(&mut self, _group: &AnimationGroup) {}
}

struct AlwaysActive;

impl LifecycleSource<u32> for AlwaysActive {
    fn subscribe(&mut self, _scope: ScopeKey<u32>) -> ScopeActivity {
        ScopeActivity::Active
    }

    fn unsubscribe(&mut self, _scope: ScopeKey<u32>) {}
}

fn drain(dispatcher: &mut MessageDispatcher<u32, u32>, host: &mut NullHost) {
    while let Some(token) = host.unfinished.pop() {
        dispatcher.animation_group_ended(host, token);
    }
}

/// Every well-formed displayed pair over three distinct keys.
fn display_pairs() -> Vec<DisplayedPair<u32>> {
    let keys = [None, Some(1_u32), Some(2), Some(3)];
    let mut out = Vec::new();
    for &front in &keys {
        for &back in &keys {
            if front.is_none() && back.is_some() {
                continue;
            }
            if back.is_some() && front == back {
                continue;
            }
            out.push(DisplayedPair { front, back });
        }
    }
    out
}

fn bench_stacking(c: &mut Criterion) {
    let mut group = c.benchmark_group("pennon_stack");
    group.sample_size(50);

    for &depth in &[2_u32, 8, 32] {
        group.bench_function(format!("show_dismiss_cycle(depth={depth})"), |b| {
            b.iter_batched(
                || {
                    (
                        MessageDispatcher::<u32, u32>::new(Box::new(AlwaysActive)),
                        NullHost::default(),
                    )
                },
                |(mut dispatcher, mut host)| {
                    for key in 0..depth {
                        dispatcher.enqueue(
                            &mut host,
                            minting(),
                            key,
                            ScopeKey::content(7),
                            Priority::Normal,
                        );
                        drain(&mut dispatcher, &mut host);
                    }
                    for key in 0..depth {
                        dispatcher.dismiss(&mut host, key, DismissReason::Timer);
                        drain(&mut dispatcher, &mut host);
                    }
                    black_box(dispatcher.displayed().is_empty());
                },
                BatchSize::LargeInput,
            );
        });
    }

    let pairs = display_pairs();
    group.bench_function("plan_settle_sweep", |b| {
        b.iter(|| {
            for &from in &pairs {
                for &to in &pairs {
                    let mut current = from;
                    while let Some(step) = plan(current, to) {
                        current = step.applied;
                    }
                    black_box(current);
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_stacking);
criterion_main!(benches);
