//! Settled fill amounts and per-token fee totals.
//!
//! ## SSZ Serialization
//!
//! Both types are fixed-size containers so they can be embedded directly
//! in the witness payload.

use ssz_rs::prelude::*;

/// Amounts of token S and token B settled for one order in one match
///
/// ## Example
///
/// ```
/// use batch_witness::types::Fill;
///
/// let fill = Fill::new(100, 50);
/// assert_eq!(fill.amount(false), 100); // S-side limit
/// assert_eq!(fill.amount(true), 50);   // B-side limit
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Fill {
    /// Amount of token S
    pub s: u128,

    /// Amount of token B
    pub b: u128,
}

impl Fill {
    pub fn new(s: u128, b: u128) -> Self {
        Self { s, b }
    }

    /// Amount on the side an order limits its fills by
    #[inline]
    pub fn amount(&self, fill_amount_b_or_s: bool) -> u128 {
        if fill_amount_b_or_s {
            self.b
        } else {
            self.s
        }
    }

    pub fn is_zero(&self) -> bool {
        self.s == 0 && self.b == 0
    }
}

/// Which of the batch's three settlement tokens a fee belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSlot {
    First,
    Second,
    Third,
}

impl TokenSlot {
    pub const ALL: [TokenSlot; 3] = [TokenSlot::First, TokenSlot::Second, TokenSlot::Third];

    /// First slot whose token equals `token_id`, in strict priority order
    ///
    /// Settlement tokens are expected to be distinct. If two coincide, the
    /// earlier slot wins so a fee is never attributed twice.
    ///
    /// ```
    /// use batch_witness::types::TokenSlot;
    ///
    /// assert_eq!(TokenSlot::select(&[1, 2, 3], 2), Some(TokenSlot::Second));
    /// assert_eq!(TokenSlot::select(&[1, 1, 3], 1), Some(TokenSlot::First));
    /// assert_eq!(TokenSlot::select(&[1, 2, 3], 9), None);
    /// ```
    pub fn select(tokens: &[u32; 3], token_id: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .zip(tokens.iter())
            .find(|(_, &t)| t == token_id)
            .map(|(slot, _)| slot)
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            TokenSlot::First => 0,
            TokenSlot::Second => 1,
            TokenSlot::Third => 2,
        }
    }
}

/// Fee totals for the three settlement tokens of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SimpleSerialize)]
pub struct FeeInBatch {
    pub first: u128,
    pub second: u128,
    pub third: u128,
}

impl FeeInBatch {
    pub fn new(first: u128, second: u128, third: u128) -> Self {
        Self { first, second, third }
    }

    /// Total for one token slot
    pub fn get(&self, slot: TokenSlot) -> u128 {
        match slot {
            TokenSlot::First => self.first,
            TokenSlot::Second => self.second,
            TokenSlot::Third => self.third,
        }
    }

    /// Add `amount` to one token slot
    ///
    /// Returns `None` on overflow, leaving the totals unchanged.
    pub fn checked_add(&mut self, slot: TokenSlot, amount: u128) -> Option<u128> {
        let total = match slot {
            TokenSlot::First => &mut self.first,
            TokenSlot::Second => &mut self.second,
            TokenSlot::Third => &mut self.third,
        };
        *total = total.checked_add(amount)?;
        Some(*total)
    }

    /// Sum across all three tokens
    pub fn total(&self) -> Option<u128> {
        self.first.checked_add(self.second)?.checked_add(self.third)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
