//! Core data types for batch witness computation
//!
//! All amounts are raw token units held in `u128`; products are widened to
//! 256 bits in [`crate::math`].
//!
//! ## Types
//!
//! - [`Order`]: A pre-matched order with its settled deltas
//! - [`User`]: One account's orders in a batch
//! - [`Batch`]: Settlement tokens plus users
//! - [`Fill`]: Settled S/B amounts
//! - [`FeeInBatch`]: Fee totals per settlement token
//! - [`StorageSlot`] / [`StorageData`]: Persisted and resolved storage leaves

mod order;
mod fill;
mod slot;
mod user;

// Re-export all types at module level
pub use order::{Order, OrderType, Signature, StartOrder, AUTO_MARKET_FIXED_B, AUTO_MARKET_FIXED_S};
pub use fill::{FeeInBatch, Fill, TokenSlot};
pub use slot::{StorageData, StorageSlot};
pub use user::{Batch, User};
