//! # Batch Witness
//!
//! Witness computation for batched spot trades settled by a zero-knowledge
//! circuit.
//!
//! ## Architecture
//!
//! The crate consists of:
//! - **Types**: Orders, users, batches, fills and storage leaves
//! - **Math**: Fixed-point fee calculation and the circuit's float encodings
//! - **State**: Read-only account state and storage leaf resolution
//! - **Engine**: Fill resolution, grid direction tracking, slot overlay and
//!   the batch orchestrator
//! - **Witness**: The per-batch witness and its SSZ encoding
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical batch and state give an identical witness digest
//! 2. **No Floating Point**: Integer amounts, 256-bit intermediates, floor division
//! 3. **Fixed Layout**: Per-order outputs are `[6][4]` arrays shaped like the circuit
//! 4. **Synchronous Execution**: One batch per call, no process-wide state
//!
//! ## Example
//!
//! ```
//! use batch_witness::{Batch, BatchProcessor, CircuitParams, InMemoryState, Order, User};
//!
//! let processor = BatchProcessor::new(CircuitParams::default()).unwrap();
//! let state = InMemoryState::new(14);
//!
//! let taker = Order::new(1, 1, 1, 2, 100, 50).with_fill(100, 50).with_fees(20, 0, 1, 10);
//! let maker = Order::new(2, 1, 2, 1, 50, 100).with_fill(50, 100).with_fees(20, 0, 2, 5);
//! let batch = Batch::new(
//!     [1, 2, 3],
//!     vec![User::new(1, vec![taker]), User::new(2, vec![maker])],
//! );
//!
//! let witness = processor.process(&batch, &state).unwrap();
//! assert_eq!(witness.gas_fee_sum.first, 10);
//! assert_eq!(witness.gas_fee_sum.second, 5);
//! assert_eq!(witness.digest_hex().unwrap().len(), 64);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Circuit layout parameters
pub mod config;

/// Error type and result alias
pub mod error;

/// Fee arithmetic and float encodings
pub mod math;

/// Core data types: Order, User, Batch, Fill, StorageSlot
pub mod types;

/// Account state access
pub mod state;

/// Witness engine: fills, forward flags, overlay, orchestrator
pub mod engine;

/// Batch witness and its encoding
pub mod witness;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::CircuitParams;
pub use engine::BatchProcessor;
pub use error::{Result, WitnessError};
pub use state::{InMemoryState, StateReader};
pub use types::{Batch, FeeInBatch, Fill, Order, OrderType, StartOrder, StorageSlot, User};
pub use witness::BatchWitness;
