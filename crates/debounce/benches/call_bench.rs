//! Call-path benchmarks for the debouncer

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use debounce::{Debouncer, ManualTimer, Options};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn bench_call_in_burst(c: &mut Criterion) {
    // Timer never fires: every call after the first only swaps pending args
    let timer = Arc::new(ManualTimer::new());
    let debouncer = Debouncer::with_services(
        |n: u64| n,
        Duration::from_millis(200),
        Options::default(),
        timer.clone(),
        timer.clone(),
    );

    c.bench_function("call_in_burst", |b| {
        b.iter(|| black_box(debouncer.call(black_box(7))));
    });
}

fn bench_throttle_with_virtual_time(c: &mut Criterion) {
    let timer = Arc::new(ManualTimer::new());
    let throttled = Debouncer::throttle_with_services(
        |n: u64| n.wrapping_mul(31),
        Duration::from_millis(10),
        timer.clone(),
        timer.clone(),
    );

    c.bench_function("throttle_call_and_advance", |b| {
        b.iter(|| {
            black_box(throttled.call(black_box(3)));
            timer.advance(Duration::from_millis(1));
        });
    });
}

fn bench_contended_call(c: &mut Criterion) {
    let debouncer = Debouncer::new(|n: u64| n, Duration::from_secs(60), Options::default());

    c.bench_function("call_contended_4_threads", |b| {
        b.iter(|| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let debouncer = debouncer.clone();
                    thread::spawn(move || {
                        for n in 0..1_000 {
                            black_box(debouncer.call(n));
                        }
                    })
                })
                .collect();
            for worker in workers {
                let _ = worker.join();
            }
        });
    });

    debouncer.cancel();
}

criterion_group!(
    benches,
    bench_call_in_burst,
    bench_throttle_with_virtual_time,
    bench_contended_call
);
criterion_main!(benches);
