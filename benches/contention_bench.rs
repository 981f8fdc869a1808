//! Hot-path benchmarks: the checkout/checkin critical section and the
//! lock-free trace hand-off.

use biblioteca_engine::recording::{EventQueue, TraceEvent, TraceEventKind};
use biblioteca_engine::simulation::LibraryRegistry;
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_checkout_checkin(c: &mut Criterion) {
    let registry = LibraryRegistry::new(3, 5);

    c.bench_function("registry_checkout_checkin", |b| {
        b.iter(|| {
            let book = registry.checkout(black_box(0), 0).unwrap();
            registry.checkin(0, book, 0);
        })
    });
}

fn bench_checkout_refusal(c: &mut Criterion) {
    // A drained library: every attempt scans all K copies and refuses.
    let registry = LibraryRegistry::new(1, 5);
    for reader in 0..5 {
        registry.checkout(0, reader).unwrap();
    }

    c.bench_function("registry_checkout_refusal", |b| {
        b.iter(|| {
            assert!(registry.checkout(black_box(0), 99).is_none());
        })
    });
}

fn bench_event_queue_push_pop(c: &mut Criterion) {
    let queue = EventQueue::new(1024);

    c.bench_function("event_queue_push_pop", |b| {
        b.iter(|| {
            let event = TraceEvent {
                seq: 0,
                run_id: "01HBENCH".to_string(),
                reader: 0,
                timestamp: Utc::now(),
                kind: TraceEventKind::CheckoutRequested { library: 0 },
            };
            queue.push(black_box(event)).unwrap();
            queue.try_pop().unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_checkout_checkin,
    bench_checkout_refusal,
    bench_event_queue_push_pop
);
criterion_main!(benches);
