//! Circuit layout parameters.
//!
//! The batch spot trade circuit has a fixed shape: six user slots, a
//! per-user order capacity, three settlement tokens and a storage tree of
//! `2^14` leaves per account. [`CircuitParams::default`] mirrors the
//! production circuit; tests can shrink it.

use crate::error::{Result, WitnessError};
use crate::math::float::{FloatEncoding, FLOAT16};

/// Depth of the per-account storage tree in binary levels
pub const STORAGE_TREE_DEPTH: u32 = 14;

/// Number of storage leaves per account: 2^14
pub const NUM_STORAGE_SLOTS: u32 = 1 << STORAGE_TREE_DEPTH;

/// Maximum number of users in one batch
pub const MAX_BATCH_USERS: usize = 6;

/// Width of the per-user order arrays
pub const MAX_USER_ORDERS: usize = 4;

/// Per-user order capacity, by user slot
pub const USER_ORDER_CAPS: [usize; MAX_BATCH_USERS] = [4, 2, 1, 1, 1, 1];

/// Maximum number of orders across all users
pub const MAX_BATCH_ORDERS: usize = 10;

/// Number of settlement tokens per batch
pub const BATCH_TOKENS: usize = 3;

/// Fee bips are expressed over this denominator
pub const FEE_BIPS_BASE: u128 = 10_000;

/// User slots whose compact signature array is shifted down by one
/// for every order after the first.
pub const SIGNATURE_SHIFTED_USERS: [usize; 2] = [0, 1];

/// Layout and encoding parameters for one batch circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitParams {
    /// Storage tree depth (physical slot = storage ID mod 2^depth)
    pub storage_tree_depth: u32,

    /// Order capacity of each user slot
    pub user_order_caps: [usize; MAX_BATCH_USERS],

    /// Encoding the order gas fee is rounded to
    pub gas_fee_encoding: FloatEncoding,

    /// User slots subject to the compact signature shift
    pub signature_shifted_users: Vec<usize>,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self {
            storage_tree_depth: STORAGE_TREE_DEPTH,
            user_order_caps: USER_ORDER_CAPS,
            gas_fee_encoding: FLOAT16,
            signature_shifted_users: SIGNATURE_SHIFTED_USERS.to_vec(),
        }
    }
}

impl CircuitParams {
    /// Number of physical storage slots per account
    #[inline]
    pub fn num_storage_slots(&self) -> u32 {
        1u32 << self.storage_tree_depth
    }

    /// Total order capacity across all user slots
    pub fn total_order_cap(&self) -> usize {
        self.user_order_caps.iter().sum()
    }

    /// Whether `user_index` writes its compact signatures shifted by one
    #[inline]
    pub fn is_signature_shifted(&self, user_index: usize) -> bool {
        self.signature_shifted_users.contains(&user_index)
    }

    /// Check the parameters describe a layout the witness arrays can hold
    pub fn validate(&self) -> Result<()> {
        if self.storage_tree_depth == 0 || self.storage_tree_depth > 31 {
            return Err(WitnessError::InvalidParams(format!(
                "storage tree depth {} out of range",
                self.storage_tree_depth
            )));
        }
        self.gas_fee_encoding.validate()?;
        if let Some(cap) = self.user_order_caps.iter().find(|&&c| c > MAX_USER_ORDERS) {
            return Err(WitnessError::InvalidParams(format!(
                "user order cap {} exceeds array width {}",
                cap, MAX_USER_ORDERS
            )));
        }
        if let Some(user) = self
            .signature_shifted_users
            .iter()
            .find(|&&u| u >= MAX_BATCH_USERS)
        {
            return Err(WitnessError::InvalidParams(format!(
                "signature shifted user {} out of range",
                user
            )));
        }
        Ok(())
    }
}
