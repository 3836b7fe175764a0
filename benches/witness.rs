//! Benchmarks for the batch witness engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- process_batch
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use batch_witness::config::{CircuitParams, USER_ORDER_CAPS};
use batch_witness::engine::{get_max_fill, SlotOverlay};
use batch_witness::math::{round_to_float_value, FLOAT16};
use batch_witness::types::{OrderType, StartOrder};
use batch_witness::{Batch, BatchProcessor, Fill, InMemoryState, Order, StorageSlot, User};

// ============================================================================
// HELPER FUNCTIONS - Deterministic batch generation
// ============================================================================

/// Full batch: every user slot filled to its order cap
fn generate_full_batch(seed: u64) -> (Batch, InMemoryState) {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = InMemoryState::new(CircuitParams::default().storage_tree_depth);
    let mut users = Vec::with_capacity(USER_ORDER_CAPS.len());

    for (user_index, &cap) in USER_ORDER_CAPS.iter().enumerate() {
        let account_id = user_index as u32 + 1;
        let mut orders = Vec::with_capacity(cap);
        for order_index in 0..cap {
            let storage_id = order_index as u32 + 1;
            state.set_storage(
                account_id,
                StorageSlot {
                    storage_id,
                    data: rng.gen_range(0..10_000),
                    ..StorageSlot::default()
                },
            );
            let (token_s, token_b) = if rng.gen_bool(0.5) { (1, 2) } else { (2, 1) };
            let amount_s: u128 = rng.gen_range(1_000_000..=100_000_000);
            let amount_b: u128 = rng.gen_range(1_000_000..=100_000_000);
            let mut order = Order::new(account_id, storage_id, token_s, token_b, amount_s, amount_b)
                .with_fill(amount_s, amount_b)
                .with_fees(0, 0, 3, rng.gen_range(0..1_000_000));
            if rng.gen_bool(0.25) {
                order = order.with_auto_market(OrderType::AutoMarketFixedS, StartOrder::new(1, 2));
            }
            orders.push(order);
        }
        users.push(User::new(account_id, orders));
    }
    (Batch::new([1, 2, 3], users), state)
}

// ============================================================================
// BENCHMARK: Batch Processing
// ============================================================================

fn bench_process_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_batch");
    group.measurement_time(Duration::from_secs(10));

    let processor = BatchProcessor::new(CircuitParams::default()).unwrap();
    let (batch, state) = generate_full_batch(42);
    group.throughput(Throughput::Elements(batch.active_order_count() as u64));

    group.bench_function("full_batch", |b| {
        b.iter(|| black_box(processor.process(black_box(&batch), &state).unwrap()))
    });

    group.bench_function("full_batch_with_digest", |b| {
        b.iter(|| {
            let witness = processor.process(&batch, &state).unwrap();
            black_box(witness.digest().unwrap())
        })
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Many Batches
// ============================================================================

fn bench_batch_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_sequence");
    group.sample_size(50);

    let processor = BatchProcessor::new(CircuitParams::default()).unwrap();
    for count in [10usize, 100, 1_000] {
        let inputs: Vec<(Batch, InMemoryState)> =
            (0..count as u64).map(generate_full_batch).collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("batches", count), &inputs, |b, inputs| {
            b.iter(|| {
                for (batch, state) in inputs {
                    black_box(processor.process(batch, state).unwrap());
                }
            })
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Primitives
// ============================================================================

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    group.bench_function("round_to_float16", |b| {
        b.iter(|| black_box(round_to_float_value(black_box(123_456_789), FLOAT16).unwrap()))
    });

    group.bench_function("get_max_fill", |b| {
        let state = InMemoryState::new(14);
        let order = Order::new(1, 1, 1, 2, 100_000_000, 50_000_000).limit_by_b();
        b.iter(|| black_box(get_max_fill(&order, black_box(1_000), false, &state).unwrap()))
    });

    group.bench_function("overlay_fold_24_slots", |b| {
        let fill = Fill::new(10, 5);
        b.iter_batched(
            || SlotOverlay::with_capacity(24),
            |mut overlay| {
                for account_id in 0..6u32 {
                    for storage_id in 0..4u32 {
                        black_box(overlay.fold_filled(account_id, storage_id, false, 0, &fill).unwrap());
                    }
                }
                overlay
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(benches, bench_process_batch, bench_batch_sequence, bench_primitives);

criterion_main!(benches);
