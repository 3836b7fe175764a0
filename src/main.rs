//! Batch Witness - Binary Entry Point
//!
//! Builds a sample batch against an in-memory state, computes its witness and
//! prints the fee totals and digest. Set `RUST_LOG=batch_witness=trace` to
//! follow every order through the engine.

use batch_witness::state::InMemoryState;
use batch_witness::types::{Batch, Order, OrderType, StartOrder, StorageSlot, User};
use batch_witness::{BatchProcessor, CircuitParams, Result};
use tracing_subscriber::EnvFilter;

fn sample_state() -> InMemoryState {
    let mut state = InMemoryState::new(CircuitParams::default().storage_tree_depth);

    // Grid account: leaf 9 last traded in the start direction, 40 filled
    state.set_storage(
        3,
        StorageSlot {
            storage_id: 9,
            token_s_id: 1,
            token_b_id: 2,
            data: 40_000,
            gas_fee: 12,
            cancelled: false,
            forward: true,
        },
    );
    state.set_balance(1, 1, 1_000_000);
    state.set_balance(2, 2, 1_000_000);
    state.set_balance(3, 2, 1_000_000);
    state
}

fn sample_batch() -> Batch {
    // Taker sells 100k of token 1 for 50k of token 2
    let taker = Order::new(1, 1, 1, 2, 100_000, 50_000)
        .with_fill(100_000, 50_000)
        .with_fees(20, 100, 1, 2_048);

    // Two makers sell token 2 for token 1
    let maker = Order::new(2, 4, 2, 1, 30_000, 60_000)
        .with_fill(30_000, 60_000)
        .with_fees(10, 60, 2, 500);
    let grid = Order::new(3, 9, 2, 1, 20_000, 40_000)
        .with_fill(20_000, 40_000)
        .with_fees(10, 40, 3, 7)
        .with_auto_market(OrderType::AutoMarketFixedS, StartOrder::new(1, 2));

    Batch::new(
        [1, 2, 3],
        vec![
            User::new(1, vec![taker]),
            User::new(2, vec![maker]),
            User::new(3, vec![grid]),
        ],
    )
}

fn run() -> Result<()> {
    let processor = BatchProcessor::new(CircuitParams::default())?;
    let state = sample_state();
    let batch = sample_batch();

    println!("Processing batch of {} orders...", batch.active_order_count());
    let witness = processor.process(&batch, &state)?;

    println!("Trading fees: {:?}", witness.trading_fee_sum);
    println!("Gas fees:     {:?}", witness.gas_fee_sum);
    for (user_index, user) in batch.users.iter().enumerate() {
        for (order_index, _) in user.active_orders() {
            if let Some(order) = witness.order(user_index, order_index) {
                println!(
                    "  [{}][{}] fill ({}, {}) filled {} -> {} forward {} -> {}",
                    user_index,
                    order_index,
                    order.fill.s,
                    order.fill.b,
                    order.filled,
                    order.update.new_filled,
                    order.forward,
                    order.update.new_forward,
                );
            }
        }
    }
    println!("Operator third-token income: {}", witness.operator_third_balance()?);
    println!("SSZ size: {} bytes", witness.to_ssz_bytes()?.len());
    println!("Digest:   {}", witness.digest_hex()?);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("===========================================");
    println!("  Batch Witness");
    println!("===========================================");
    println!();

    if let Err(e) = run() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
