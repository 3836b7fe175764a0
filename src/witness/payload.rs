//! SSZ payload and digest of a batch witness.
//!
//! ## SSZ Layout
//!
//! The `[6][4]` grids are flattened row-major (user, then order) into
//! fixed-length vectors of 24 entries, and the `[6][3]` balance deltas into
//! 18 entries of sign plus magnitude. Every field is fixed size, so the
//! encoding of a witness has constant length.
//!
//! ## Digest
//!
//! The digest is the SHA-256 of the SSZ bytes, rendered as hex for logs.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::config::{BATCH_TOKENS, MAX_BATCH_USERS, MAX_USER_ORDERS};
use crate::error::WitnessError;
use crate::types::{FeeInBatch, Fill, Signature};
use crate::witness::{BatchWitness, OrderGrid};

/// Number of order slots in a witness
pub const WITNESS_ORDER_SLOTS: usize = MAX_BATCH_USERS * MAX_USER_ORDERS;

/// Number of balance delta entries in a witness
pub const WITNESS_BALANCE_SLOTS: usize = MAX_BATCH_USERS * BATCH_TOKENS;

/// Signed balance change as sign flag plus magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SimpleSerialize)]
pub struct BalanceDelta {
    pub negative: bool,
    pub magnitude: u128,
}

impl From<i128> for BalanceDelta {
    fn from(delta: i128) -> Self {
        Self {
            negative: delta < 0,
            magnitude: delta.unsigned_abs(),
        }
    }
}

/// Storage slot values after this order is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleSerialize)]
pub struct SlotUpdate {
    pub new_filled: u128,
    pub new_gas_fee: u128,
    pub new_forward: bool,
}

impl Default for SlotUpdate {
    fn default() -> Self {
        Self {
            new_filled: 0,
            new_gas_fee: 0,
            new_forward: true,
        }
    }
}

/// Witness values of one order slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleSerialize)]
pub struct OrderWitness {
    /// Prior slot token S (zero if the slot was recycled)
    pub token_s_id: u32,
    /// Prior slot token B (zero if the slot was recycled)
    pub token_b_id: u32,
    /// Prior filled amount, zeroed when a grid order flips
    pub filled: u128,
    /// Prior gas fee charged on the slot
    pub gas_fee: u128,
    pub cancelled: bool,
    /// Stored forward flag
    pub forward: bool,
    /// Settled amounts for this batch
    pub fill: Fill,
    pub trading_fee: u128,
    /// Gas fee after float rounding
    pub gas_fee_order: u128,
    pub update: SlotUpdate,
}

impl Default for OrderWitness {
    fn default() -> Self {
        Self {
            token_s_id: 0,
            token_b_id: 0,
            filled: 0,
            gas_fee: 0,
            cancelled: false,
            forward: true,
            fill: Fill::default(),
            trading_fee: 0,
            gas_fee_order: 0,
            update: SlotUpdate::default(),
        }
    }
}

/// Flattened SSZ container of a [`BatchWitness`]
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct WitnessPayload {
    pub tokens: Vector<u32, BATCH_TOKENS>,
    pub orders: Vector<OrderWitness, WITNESS_ORDER_SLOTS>,
    pub signatures: Vector<Signature, WITNESS_ORDER_SLOTS>,
    pub all_signatures: Vector<Signature, WITNESS_ORDER_SLOTS>,
    pub trading_fee_user: Vector<FeeInBatch, MAX_BATCH_USERS>,
    pub gas_fee_user: Vector<FeeInBatch, MAX_BATCH_USERS>,
    pub trading_fee_sum: FeeInBatch,
    pub gas_fee_sum: FeeInBatch,
    pub balance_deltas: Vector<BalanceDelta, WITNESS_BALANCE_SLOTS>,
}

fn vector<T: SimpleSerialize, const N: usize>(
    items: Vec<T>,
    field: &str,
) -> crate::error::Result<Vector<T, N>> {
    Vector::<T, N>::try_from(items)
        .map_err(|_| WitnessError::Serialization(format!("{} does not have {} entries", field, N)))
}

fn flatten<T: Clone>(grid: &OrderGrid<T>) -> Vec<T> {
    grid.iter().flat_map(|row| row.iter().cloned()).collect()
}

impl BatchWitness {
    /// Flatten into the SSZ container
    pub fn to_payload(&self) -> crate::error::Result<WitnessPayload> {
        Ok(WitnessPayload {
            tokens: vector(self.tokens.to_vec(), "tokens")?,
            orders: vector(flatten(&self.orders), "orders")?,
            signatures: vector(flatten(&self.signatures), "signatures")?,
            all_signatures: vector(flatten(&self.all_signatures), "all_signatures")?,
            trading_fee_user: vector(self.trading_fee_user.to_vec(), "trading_fee_user")?,
            gas_fee_user: vector(self.gas_fee_user.to_vec(), "gas_fee_user")?,
            trading_fee_sum: self.trading_fee_sum,
            gas_fee_sum: self.gas_fee_sum,
            balance_deltas: vector(
                self.balance_deltas
                    .iter()
                    .flatten()
                    .map(|&delta| BalanceDelta::from(delta))
                    .collect(),
                "balance_deltas",
            )?,
        })
    }

    /// Deterministic SSZ encoding of the witness
    pub fn to_ssz_bytes(&self) -> crate::error::Result<Vec<u8>> {
        let payload = self.to_payload()?;
        ssz_rs::serialize(&payload).map_err(|e| WitnessError::Serialization(format!("{:?}", e)))
    }

    /// SHA-256 of the SSZ encoding
    pub fn digest(&self) -> crate::error::Result<[u8; 32]> {
        let bytes = self.to_ssz_bytes()?;
        Ok(compute_hash(&bytes))
    }

    /// Digest as a hex string
    pub fn digest_hex(&self) -> crate::error::Result<String> {
        Ok(hex::encode(self.digest()?))
    }
}

/// Compute SHA-256 of the given data
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// ============================================================================
// Unit Tests
// ============================================================================
