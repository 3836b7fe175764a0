//! Read-only access to account state.
//!
//! ## Contract
//!
//! The witness engine never writes state. It reads storage leaves and token
//! balances through [`StateReader`], and a whole batch is computed against one
//! `&impl StateReader`, so reads are consistent for the duration of a batch.
//!
//! ## Components
//!
//! - [`StateReader`]: trait implemented by the host's state tree
//! - [`InMemoryState`]: map-backed implementation for tests and tooling
//! - [`accessor`]: logical storage lookup with leaf aliasing

pub mod accessor;

use std::collections::HashMap;

use crate::types::StorageSlot;

pub use accessor::{get_data, storage_default_set, StorageEntry};

/// Read-only view of account storage and balances
pub trait StateReader {
    /// Storage leaf at physical index `slot_index` of `account_id`
    ///
    /// Leaves that were never written must come back as
    /// [`StorageSlot::default`].
    fn storage_slot(&self, account_id: u32, slot_index: u32) -> StorageSlot;

    /// Balance of `token_id` held by `account_id`
    fn balance(&self, account_id: u32, token_id: u32) -> u128;
}

impl<T: StateReader + ?Sized> StateReader for &T {
    fn storage_slot(&self, account_id: u32, slot_index: u32) -> StorageSlot {
        (**self).storage_slot(account_id, slot_index)
    }

    fn balance(&self, account_id: u32, token_id: u32) -> u128 {
        (**self).balance(account_id, token_id)
    }
}

/// Leaves and balances of one account
#[derive(Debug, Clone, Default)]
pub struct Account {
    storage: HashMap<u32, StorageSlot>,
    balances: HashMap<u32, u128>,
}

impl Account {
    pub fn storage(&self, slot_index: u32) -> StorageSlot {
        self.storage.get(&slot_index).copied().unwrap_or_default()
    }

    pub fn balance(&self, token_id: u32) -> u128 {
        self.balances.get(&token_id).copied().unwrap_or(0)
    }
}

/// Map-backed account state
///
/// ## Example
///
/// ```
/// use batch_witness::state::{InMemoryState, StateReader};
/// use batch_witness::types::StorageSlot;
///
/// let mut state = InMemoryState::new(14);
/// state.set_balance(1, 2, 500);
/// state.set_storage(1, StorageSlot { storage_id: 5, data: 30, ..StorageSlot::default() });
///
/// assert_eq!(state.balance(1, 2), 500);
/// assert_eq!(state.storage_slot(1, 5).data, 30);
/// assert_eq!(state.storage_slot(9, 5), StorageSlot::default());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryState {
    accounts: HashMap<u32, Account>,
    num_slots: u32,
}

impl InMemoryState {
    /// Create empty state with `2^storage_tree_depth` leaves per account
    pub fn new(storage_tree_depth: u32) -> Self {
        Self {
            accounts: HashMap::new(),
            num_slots: 1u32 << storage_tree_depth,
        }
    }

    /// Write a leaf at the physical index derived from its storage ID
    pub fn set_storage(&mut self, account_id: u32, slot: StorageSlot) {
        let index = slot.storage_id % self.num_slots;
        self.accounts
            .entry(account_id)
            .or_default()
            .storage
            .insert(index, slot);
    }

    pub fn set_balance(&mut self, account_id: u32, token_id: u32, amount: u128) {
        self.accounts
            .entry(account_id)
            .or_default()
            .balances
            .insert(token_id, amount);
    }

    pub fn account(&self, account_id: u32) -> Option<&Account> {
        self.accounts.get(&account_id)
    }
}

impl StateReader for InMemoryState {
    fn storage_slot(&self, account_id: u32, slot_index: u32) -> StorageSlot {
        self.accounts
            .get(&account_id)
            .map(|account| account.storage(slot_index % self.num_slots))
            .unwrap_or_default()
    }

    fn balance(&self, account_id: u32, token_id: u32) -> u128 {
        self.accounts
            .get(&account_id)
            .map(|account| account.balance(token_id))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_account_reads_defaults() {
        let state = InMemoryState::new(14);
        assert_eq!(state.balance(1, 1), 0);
        assert_eq!(state.storage_slot(1, 0), StorageSlot::default());
        assert!(state.account(1).is_none());
    }

    #[test]
    fn test_set_storage_uses_physical_index() {
        let mut state = InMemoryState::new(14);
        let slot = StorageSlot {
            storage_id: 16_384 + 3,
            data: 11,
            ..StorageSlot::default()
        };
        state.set_storage(4, slot);
        assert_eq!(state.storage_slot(4, 3), slot);
        // writing a newer logical ID on the same leaf replaces it
        let newer = StorageSlot {
            storage_id: 2 * 16_384 + 3,
            ..StorageSlot::default()
        };
        state.set_storage(4, newer);
        assert_eq!(state.storage_slot(4, 3).storage_id, 2 * 16_384 + 3);
    }

    #[test]
    fn test_reader_through_reference() {
        let mut state = InMemoryState::new(4);
        state.set_balance(1, 7, 99);
        let by_ref: &InMemoryState = &state;
        fn read<S: StateReader>(s: S) -> u128 {
            s.balance(1, 7)
        }
        assert_eq!(read(by_ref), 99);
    }
}
