//! Per-batch overlay of storage slot values.
//!
//! ## Architecture
//!
//! Several orders in one batch can spend the same storage slot. The circuit
//! threads each slot's running values from one order to the next, so the
//! engine keeps an overlay keyed by `(account_id, storage_id)`:
//!
//! - **Slab**: pre-allocated value storage, O(1) insert and lookup
//! - **HashMap**: composite key to slab key
//!
//! The overlay lives for exactly one batch and is never written back to
//! state; the witness carries the folded values instead.
//!
//! ## Example
//!
//! ```
//! use batch_witness::engine::SlotOverlay;
//! use batch_witness::types::Fill;
//!
//! let mut overlay = SlotOverlay::new();
//! let fill = Fill::new(10, 5);
//!
//! // First touch starts from the stored value
//! assert_eq!(overlay.fold_filled(1, 1, false, 100, &fill).unwrap(), 110);
//! // Second touch starts from the folded value, not the stored one
//! assert_eq!(overlay.fold_filled(1, 1, false, 100, &fill).unwrap(), 120);
//! ```

use std::collections::HashMap;

use slab::Slab;

use crate::engine::forward::calculate_auto_market_forward;
use crate::error::{Result, WitnessError};
use crate::types::{Fill, Order};

/// Composite `(account_id, storage_id)` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub account_id: u32,
    pub storage_id: u32,
}

impl SlotKey {
    pub fn new(account_id: u32, storage_id: u32) -> Self {
        Self { account_id, storage_id }
    }
}

// ============================================================================
// TwoDimMap
// ============================================================================

/// Map from `(account_id, storage_id)` to a value
#[derive(Debug, Clone)]
pub struct TwoDimMap<V> {
    /// Value storage
    values: Slab<V>,

    /// Composite key to slab key
    index: HashMap<SlotKey, usize>,
}

impl<V> Default for TwoDimMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TwoDimMap<V> {
    pub fn new() -> Self {
        Self {
            values: Slab::new(),
            index: HashMap::new(),
        }
    }

    /// Create a map with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn get(&self, account_id: u32, storage_id: u32) -> Option<&V> {
        let key = *self.index.get(&SlotKey::new(account_id, storage_id))?;
        self.values.get(key)
    }

    /// Insert or replace the value for a key
    pub fn set(&mut self, account_id: u32, storage_id: u32, value: V) {
        let slot_key = SlotKey::new(account_id, storage_id);
        match self.index.get(&slot_key).copied() {
            Some(key) => self.values[key] = value,
            None => {
                let key = self.values.insert(value);
                self.index.insert(slot_key, key);
            }
        }
    }

    #[inline]
    pub fn contains(&self, account_id: u32, storage_id: u32) -> bool {
        self.index.contains_key(&SlotKey::new(account_id, storage_id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.index.clear();
    }

    /// Iterate over all entries, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &V)> {
        self.index.iter().map(|(k, &key)| (*k, &self.values[key]))
    }
}

impl<V: Copy> TwoDimMap<V> {
    /// Value for a key, or `fallback` if the key has not been folded yet
    #[inline]
    pub fn get_or(&self, account_id: u32, storage_id: u32, fallback: V) -> V {
        self.get(account_id, storage_id).copied().unwrap_or(fallback)
    }
}

// ============================================================================
// SlotOverlay
// ============================================================================

/// Running filled amount, gas fee and forward flag per storage slot
#[derive(Debug, Clone, Default)]
pub struct SlotOverlay {
    filled: TwoDimMap<u128>,
    gas_fee: TwoDimMap<u128>,
    forward: TwoDimMap<bool>,
}

impl SlotOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an overlay sized for `orders` slot touches
    pub fn with_capacity(orders: usize) -> Self {
        Self {
            filled: TwoDimMap::with_capacity(orders),
            gas_fee: TwoDimMap::with_capacity(orders),
            forward: TwoDimMap::with_capacity(orders),
        }
    }

    /// Add this fill to the slot's running filled amount
    ///
    /// # Arguments
    ///
    /// * `fill_amount_b_or_s` - Accumulate `fill.b` when set, `fill.s` otherwise
    /// * `prior_filled` - Stored filled amount, used on the first touch only
    ///
    /// # Returns
    ///
    /// The new running filled amount, which is also written back
    pub fn fold_filled(
        &mut self,
        account_id: u32,
        storage_id: u32,
        fill_amount_b_or_s: bool,
        prior_filled: u128,
        fill: &Fill,
    ) -> Result<u128> {
        let start = self.filled.get_or(account_id, storage_id, prior_filled);
        let new_filled = start
            .checked_add(fill.amount(fill_amount_b_or_s))
            .ok_or_else(|| WitnessError::overflow("fold_filled"))?;
        self.filled.set(account_id, storage_id, new_filled);
        Ok(new_filled)
    }

    /// Add `gas_fee_current` to the slot's running gas fee
    pub fn fold_gas_fee(
        &mut self,
        account_id: u32,
        storage_id: u32,
        gas_fee_saved: u128,
        gas_fee_current: u128,
    ) -> Result<u128> {
        let start = self.gas_fee.get_or(account_id, storage_id, gas_fee_saved);
        let new_gas_fee = start
            .checked_add(gas_fee_current)
            .ok_or_else(|| WitnessError::overflow("fold_gas_fee"))?;
        self.gas_fee.set(account_id, storage_id, new_gas_fee);
        Ok(new_gas_fee)
    }

    /// Advance the slot's forward flag for an auto-market order
    ///
    /// # Returns
    ///
    /// `(new_forward, previous_forward)`, where the previous value is the
    /// folded one if the slot was already touched, else `saved_forward`.
    /// `None` if the order has no start order.
    pub fn fold_forward(&mut self, order: &Order, saved_forward: bool) -> Option<(bool, bool)> {
        let previous = self
            .forward
            .get_or(order.account_id, order.storage_id, saved_forward);
        let new_forward = calculate_auto_market_forward(previous, order)?;
        self.forward.set(order.account_id, order.storage_id, new_forward);
        Some((new_forward, previous))
    }

    /// Restart the slot's running filled amount at zero
    ///
    /// Used when a grid order flips direction after the slot was already
    /// folded in this batch.
    pub fn reset_filled(&mut self, account_id: u32, storage_id: u32) {
        if self.filled.contains(account_id, storage_id) {
            self.filled.set(account_id, storage_id, 0);
        }
    }

    pub fn filled(&self) -> &TwoDimMap<u128> {
        &self.filled
    }

    pub fn gas_fee(&self) -> &TwoDimMap<u128> {
        &self.gas_fee
    }

    pub fn forward(&self) -> &TwoDimMap<bool> {
        &self.forward
    }

    /// Drop every folded value
    pub fn clear(&mut self) {
        self.filled.clear();
        self.gas_fee.clear();
        self.forward.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
