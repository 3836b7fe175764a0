//! Integration tests for the batch witness engine.
//!
//! These tests verify:
//! 1. Witness digests are deterministic for a given batch and state
//! 2. Per-user fee buckets add up to the batch-wide sums
//! 3. Shared storage slots fold across orders of one batch
//! 4. Errors abort the whole batch
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test batch_test -- --nocapture
//! ```

use std::collections::HashMap;
use std::time::Instant;

use batch_witness::config::{CircuitParams, USER_ORDER_CAPS};
use batch_witness::math::calculate_fees;
use batch_witness::types::{OrderType, Signature, StartOrder, TokenSlot};
use batch_witness::{
    Batch, BatchProcessor, BatchWitness, FeeInBatch, InMemoryState, Order, StorageSlot, User,
    WitnessError,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Settlement tokens of every generated batch
const TOKENS: [u32; 3] = [1, 2, 3];

/// Number of batches for the throughput run
const STRESS_BATCH_COUNT: usize = 2_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn processor() -> BatchProcessor {
    BatchProcessor::new(CircuitParams::default()).unwrap()
}

fn random_signature(rng: &mut ChaCha8Rng) -> Signature {
    let mut sig = Signature::default();
    rng.fill(&mut sig.rx);
    rng.fill(&mut sig.ry);
    rng.fill(&mut sig.s);
    sig
}

/// Generate a valid order for `account_id`.
///
/// Storage IDs come from a small range so slots are shared now and then.
fn random_order(rng: &mut ChaCha8Rng, account_id: u32, with_grid: bool) -> Order {
    let token_s = TOKENS[rng.gen_range(0..3)];
    let token_b = loop {
        let t = TOKENS[rng.gen_range(0..3)];
        if t != token_s {
            break t;
        }
    };
    let amount_s: u128 = rng.gen_range(1_000..=1_000_000_000);
    let amount_b: u128 = rng.gen_range(1_000..=1_000_000_000);
    let delta_s = rng.gen_range(0..=amount_s);
    let delta_b = delta_s * amount_b / amount_s;

    let fee_bips: u16 = rng.gen_range(0..=50);
    let trading_fee = calculate_fees(delta_b, fee_bips).unwrap();
    let fee_token_id = TOKENS[rng.gen_range(0..3)];
    let fee: u128 = rng.gen_range(0..=1_000_000);

    let mut order = Order::new(account_id, rng.gen_range(1..=4), token_s, token_b, amount_s, amount_b)
        .with_fill(delta_s, delta_b)
        .with_fees(fee_bips, trading_fee, fee_token_id, fee)
        .with_signature(random_signature(rng));
    if rng.gen_bool(0.5) {
        order = order.limit_by_b();
    }
    if with_grid && rng.gen_bool(0.3) {
        let kind = if rng.gen_bool(0.5) {
            OrderType::AutoMarketFixedS
        } else {
            OrderType::AutoMarketFixedB
        };
        let start = if rng.gen_bool(0.5) {
            StartOrder::new(token_s, token_b)
        } else {
            StartOrder::new(token_b, token_s)
        };
        order = order.with_auto_market(kind, start);
    }
    order
}

/// Generate a deterministic batch and the state it runs against.
///
/// Same seed = same batch and state.
fn generate_batch(seed: u64, with_grid: bool) -> (Batch, InMemoryState) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = InMemoryState::new(CircuitParams::default().storage_tree_depth);

    let user_count = rng.gen_range(1..=USER_ORDER_CAPS.len());
    let mut users = Vec::with_capacity(user_count);
    for (user_index, &cap) in USER_ORDER_CAPS.iter().enumerate().take(user_count) {
        if rng.gen_bool(0.1) {
            users.push(User::noop());
            continue;
        }
        let account_id = user_index as u32 + 1;
        for storage_id in 1..=4u32 {
            if rng.gen_bool(0.5) {
                state.set_storage(
                    account_id,
                    StorageSlot {
                        storage_id,
                        data: rng.gen_range(0..1_000),
                        gas_fee: rng.gen_range(0..100),
                        forward: rng.gen_bool(0.5),
                        ..StorageSlot::default()
                    },
                );
            }
        }
        let order_count = rng.gen_range(1..=cap);
        let orders = (0..order_count)
            .map(|_| {
                if rng.gen_bool(0.1) {
                    Order::noop()
                } else {
                    random_order(&mut rng, account_id, with_grid)
                }
            })
            .collect();
        users.push(User::new(account_id, orders));
    }
    (Batch::new(TOKENS, users), state)
}

fn run_seed(seed: u64) -> BatchWitness {
    let (batch, state) = generate_batch(seed, true);
    processor().process(&batch, &state).unwrap()
}

fn sum_buckets(buckets: &[FeeInBatch]) -> FeeInBatch {
    let mut total = FeeInBatch::default();
    for bucket in buckets {
        for slot in TokenSlot::ALL {
            total.checked_add(slot, bucket.get(slot)).unwrap();
        }
    }
    total
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

/// Same batch and state give the same digest; different batches do not.
#[test]
fn verify_determinism() {
    for seed in 0..50u64 {
        let first = run_seed(seed).digest().unwrap();
        let second = run_seed(seed).digest().unwrap();
        assert_eq!(first, second, "digest differs for seed {}", seed);
    }
    assert_ne!(run_seed(1).digest().unwrap(), run_seed(2).digest().unwrap());
}

#[test]
fn fee_buckets_add_up() {
    for seed in 0..200u64 {
        let witness = run_seed(seed);
        assert_eq!(sum_buckets(&witness.trading_fee_user), witness.trading_fee_sum);
        assert_eq!(sum_buckets(&witness.gas_fee_user), witness.gas_fee_sum);

        // All fee tokens are batch tokens, so every rounded gas fee is booked
        let booked: u128 = witness
            .orders
            .iter()
            .flatten()
            .map(|o| o.gas_fee_order)
            .sum();
        assert_eq!(witness.gas_fee_sum.total(), Some(booked));
    }
}

#[test]
fn filled_folds_across_shared_slots() {
    for seed in 0..200u64 {
        let (batch, state) = generate_batch(seed, false);
        let witness = processor().process(&batch, &state).unwrap();

        let mut running: HashMap<(u32, u32), u128> = HashMap::new();
        for (user_index, user) in batch.users.iter().enumerate() {
            if user.is_noop {
                continue;
            }
            for (order_index, order) in user.active_orders() {
                let slot = witness.order(user_index, order_index).unwrap();
                let key = (order.account_id, order.storage_id);
                let start = *running.get(&key).unwrap_or(&slot.filled);
                let expected = start + slot.fill.amount(order.fill_amount_b_or_s);
                assert_eq!(slot.update.new_filled, expected, "seed {} slot {:?}", seed, key);
                running.insert(key, expected);
            }
        }
    }
}

#[test]
fn witness_shape_is_constant() {
    let empty = BatchWitness::new(TOKENS).to_ssz_bytes().unwrap().len();
    for seed in 0..20u64 {
        assert_eq!(run_seed(seed).to_ssz_bytes().unwrap().len(), empty);
    }
}

// ============================================================================
// SCENARIO TESTS
// ============================================================================

#[test]
fn single_order_scenario() {
    let order = Order::new(10, 1, 1, 2, 100, 50)
        .with_fill(100, 50)
        .with_fees(20, 0, 1, 10);
    let batch = Batch::new([1, 2, 3], vec![User::new(10, vec![order])]);
    let witness = processor()
        .process(&batch, &InMemoryState::new(14))
        .unwrap();

    assert_eq!(witness.trading_fee_user[0].second, 0);
    assert_eq!(witness.gas_fee_user[0].first, 10);
    assert_eq!(witness.trading_fee_sum.second, 0);
    assert_eq!(witness.gas_fee_sum.first, 10);
}

#[test]
fn third_token_aliasing_zeroes_helpers() {
    let order = Order::new(10, 1, 2, 1, 100, 50)
        .with_fill(100, 50)
        .with_fees(20, 0, 1, 10);
    let batch = Batch::new([1, 2, 1], vec![User::new(10, vec![order])]);
    let witness = processor()
        .process(&batch, &InMemoryState::new(14))
        .unwrap();

    // token 1 books under the first slot only
    assert_eq!(witness.gas_fee_sum, FeeInBatch::new(10, 0, 0));
    assert_eq!(witness.operator_third_balance().unwrap(), 0);
    assert_eq!(witness.user_third_balance(0).unwrap(), 0);
}

#[test]
fn late_error_aborts_batch() {
    let (mut batch, state) = generate_batch(7, true);
    let bad = Order::new(99, 1, 1, 2, 100, 50)
        .with_fill(100, 50)
        .with_fees(20, 1, 1, 10);
    let last = batch.users.len();
    if last < USER_ORDER_CAPS.len() {
        batch.users.push(User::new(99, vec![bad]));
    } else {
        batch.users[last - 1] = User::new(99, vec![bad]);
    }
    let user_index = batch.users.len() - 1;

    assert_eq!(
        processor().process(&batch, &state),
        Err(WitnessError::TradingFeeExceeded {
            user_index,
            order_index: 0,
            trading_fee: 1,
            calculated_fee: 0,
        })
    );
}

// ============================================================================
// STRESS TEST
// ============================================================================

/// Process many generated batches and report throughput.
#[test]
fn stress_generated_batches() {
    println!("\n=== STRESS TEST: {} Batches ===\n", STRESS_BATCH_COUNT);

    let inputs: Vec<(Batch, InMemoryState)> = (0..STRESS_BATCH_COUNT as u64)
        .map(|seed| generate_batch(seed, true))
        .collect();
    let processor = processor();

    let start = Instant::now();
    let mut order_count = 0;
    for (batch, state) in &inputs {
        processor.process(batch, state).unwrap();
        order_count += batch.active_order_count();
    }
    let elapsed = start.elapsed();

    println!("  Batches processed: {:>12}", STRESS_BATCH_COUNT);
    println!("  Orders processed:  {:>12}", order_count);
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    assert!(order_count > 0);
}
