//! Logical storage lookup.
//!
//! A logical storage ID maps to physical leaf `storage_id mod 2^depth`.
//! Several logical IDs share a leaf over time, so a read only sees the
//! leaf's fields when the leaf was last written by the requested ID.
//! Otherwise the leaf has been recycled and the order starts from defaults.
//!
//! ```text
//! leaf 5: { storage_id: 5, data: 30 }
//!
//! get_data(storage_id = 5)          -> data 30   (live)
//! get_data(storage_id = 5 + 2^14)   -> data 0    (recycled, defaults)
//! ```

use tracing::trace;

use crate::state::StateReader;
use crate::types::{StorageData, StorageSlot};

/// Resolve the storage fields seen by `storage_id` of `account_id`
///
/// # Arguments
///
/// * `account_id` - Owning account
/// * `storage_id` - Logical storage ID
/// * `num_slots` - Leaves per account (`2^depth`)
/// * `state` - State snapshot
///
/// A leaf never written (recorded ID 0) resolves to the physical index, so
/// fresh leaves are live for the first logical ID that lands on them.
pub fn get_data<S: StateReader + ?Sized>(
    account_id: u32,
    storage_id: u32,
    num_slots: u32,
    state: &S,
) -> StorageData {
    let slot_index = storage_id % num_slots;
    let slot = state.storage_slot(account_id, slot_index);

    let leaf_storage_id = if slot.storage_id > 0 {
        slot.storage_id
    } else {
        slot_index
    };

    if leaf_storage_id == storage_id {
        StorageData::from(&slot)
    } else {
        trace!(account_id, storage_id, leaf_storage_id, "storage leaf recycled, using defaults");
        StorageData::default()
    }
}

/// Storage leaf to seed for one slot address
///
/// `cancelled` left as `None` is read from state; spot trades never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageEntry {
    pub address: u32,
    pub storage_id: u32,
    pub token_s_id: u32,
    pub token_b_id: u32,
    pub data: u128,
    pub gas_fee: u128,
    pub cancelled: Option<bool>,
    pub forward: bool,
}

/// Build full storage leaves for `entries` of `account_id`
///
/// Every field is taken from the entry except an unset `cancelled`, which
/// falls back to the flag currently stored at `address`.
pub fn storage_default_set<S: StateReader + ?Sized>(
    state: &S,
    account_id: u32,
    entries: &[StorageEntry],
) -> Vec<(u32, StorageSlot)> {
    entries
        .iter()
        .map(|entry| {
            let cancelled = match entry.cancelled {
                Some(flag) => flag,
                None => state.storage_slot(account_id, entry.address).cancelled,
            };
            let slot = StorageSlot {
                storage_id: entry.storage_id,
                token_s_id: entry.token_s_id,
                token_b_id: entry.token_b_id,
                data: entry.data,
                gas_fee: entry.gas_fee,
                cancelled,
                forward: entry.forward,
            };
            (entry.address, slot)
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
