// Copyright 2026 the Pennon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pennon_queue::{
    AnimationHandle, Category, DismissReason, MessageHandler, MessageQueue, Position, Priority,
    ScopeActivity, ScopeKey, SharedMessageHandler,
};

struct Quiet;

impl MessageHandler for Quiet {
    fn show(&mut self, _from: Position, _to: Position) -> AnimationHandle {
        AnimationHandle::new(0)
    }

    fn hide(&mut self, _from: Position, _to: Position, _animate: bool) -> Option<AnimationHandle> {
        None
    }

    fn dismiss(&mut self, _reason: DismissReason) {}

    fn category(&self) -> Category {
        Category::new(0)
    }
}

fn quiet() -> SharedMessageHandler {
    Rc::new(RefCell::new(Quiet))
}

fn build_pool(messages: u32, scopes: u32) -> MessageQueue<u32, u32> {
    let mut queue = MessageQueue::new();
    for key in 0..messages {
        let scope = ScopeKey::content(key % scopes);
        let priority = if key % 16 == 0 {
            Priority::High
        } else {
            Priority::Normal
        };
        queue.enqueue(quiet(), key, scope, priority);
    }
    // Half of the scopes are eligible, so selection filters as it scans.
    for scope in 0..scopes {
        let activity = if scope % 2 == 0 {
            ScopeActivity::Active
        } else {
            ScopeActivity::Inactive
        };
        queue.set_scope_activity(ScopeKey::content(scope), activity);
    }
    queue
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("pennon_queue");
    group.sample_size(50);

    for &(messages, scopes) in &[(16_u32, 2_u32), (256, 8), (4096, 64)] {
        let queue = build_pool(messages, scopes);
        group.bench_function(
            format!("next_candidates(n={messages},scopes={scopes})"),
            |b| {
                b.iter(|| {
                    let pair = queue.next_candidates();
                    black_box(pair.keys());
                });
            },
        );

        group.bench_function(
            format!("drain_by_dismissal(n={messages},scopes={scopes})"),
            |b| {
                b.iter_batched(
                    || build_pool(messages, scopes),
                    |mut queue| {
                        for key in 0..messages {
                            queue.dismiss(key, DismissReason::Timer);
                        }
                        black_box(queue.len());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
