use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::thread;

use tinyledger_ledger::SharedLedger;

/// Single-threaded cost of one deposit through the shared handle.
fn bench_uncontended_deposit(c: &mut Criterion) {
    let ledger = SharedLedger::new();

    c.bench_function("deposit_uncontended", |b| {
        b.iter(|| ledger.record_deposit(black_box(1.0)).unwrap())
    });
}

/// `threads` writers each record `per_thread` deposits against one ledger.
fn bench_contended_deposits(c: &mut Criterion) {
    let per_thread = 1_000usize;
    let mut group = c.benchmark_group("deposit_contended");

    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * per_thread) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let ledger = SharedLedger::new();
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let ledger = ledger.clone();
                        thread::spawn(move || {
                            for _ in 0..per_thread {
                                ledger.record_deposit(1.0).unwrap();
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
                black_box(ledger.balance())
            })
        });
    }

    group.finish();
}

/// Cost of cloning the history snapshot as it grows.
fn bench_history_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_snapshot");

    for size in [100usize, 1_000, 10_000] {
        let ledger = SharedLedger::new();
        for _ in 0..size {
            ledger.record_deposit(1.0).unwrap();
        }
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(ledger.history()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_uncontended_deposit,
    bench_contended_deposits,
    bench_history_snapshot
);
criterion_main!(benches);
