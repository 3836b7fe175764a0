//! Witness engine for batch spot trades.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same batch and state always produce the same witness
//! 2. **Integer Math**: Products widen to 256 bits, divisions floor
//! 3. **Synchronous Execution**: One batch, one thread, no shared state
//! 4. **Batch-Scoped Overlay**: Slot values fold per batch, never written back
//!
//! ## Components
//!
//! - [`fill`]: maximum fill and taker/maker settlement
//! - [`forward`]: auto-market direction tracking
//! - [`overlay`]: per-batch slot accumulators
//! - [`balance`]: per-token balance and third-token helpers
//! - [`batch`]: the orchestrator producing a [`crate::witness::BatchWitness`]

pub mod balance;
pub mod batch;
pub mod fill;
pub mod forward;
pub mod overlay;

pub use balance::{
    get_batch_order_balance, get_operator_third_balance, get_third_balance,
    third_balance_from_delta,
};
pub use batch::BatchProcessor;
pub use fill::{get_max_fill, match_fills};
pub use forward::{calculate_auto_market_forward, is_forward_flip};
pub use overlay::{SlotKey, SlotOverlay, TwoDimMap};
