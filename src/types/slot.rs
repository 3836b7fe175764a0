//! Storage slot records.
//!
//! Every account owns a fixed tree of storage leaves. A leaf tracks the
//! cumulative fill of one order; leaves are reused cyclically, so a leaf
//! remembers which logical storage ID last wrote it.

/// A storage leaf as persisted in account state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSlot {
    /// Logical storage ID that last wrote this leaf, 0 if never written
    pub storage_id: u32,
    pub token_s_id: u32,
    pub token_b_id: u32,
    /// Cumulative filled amount
    pub data: u128,
    /// Cumulative gas fee charged against this order
    pub gas_fee: u128,
    pub cancelled: bool,
    /// Auto-market direction, `true` while the grid is in its initial direction
    pub forward: bool,
}

impl Default for StorageSlot {
    fn default() -> Self {
        Self {
            storage_id: 0,
            token_s_id: 0,
            token_b_id: 0,
            data: 0,
            gas_fee: 0,
            cancelled: false,
            forward: true,
        }
    }
}

/// Slot fields as seen by one logical storage ID
///
/// Produced by [`crate::state::get_data`]; a recycled leaf yields
/// [`StorageData::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageData {
    pub token_s_id: u32,
    pub token_b_id: u32,
    pub filled: u128,
    pub gas_fee: u128,
    pub cancelled: bool,
    pub forward: bool,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            token_s_id: 0,
            token_b_id: 0,
            filled: 0,
            gas_fee: 0,
            cancelled: false,
            forward: true,
        }
    }
}

impl From<&StorageSlot> for StorageData {
    fn from(slot: &StorageSlot) -> Self {
        Self {
            token_s_id: slot.token_s_id,
            token_b_id: slot.token_b_id,
            filled: slot.data,
            gas_fee: slot.gas_fee,
            cancelled: slot.cancelled,
            forward: slot.forward,
        }
    }
}
