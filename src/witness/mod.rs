//! Batch witness produced by the engine.
//!
//! ## Layout
//!
//! Per-order values live in fixed `[6][4]` arrays indexed by
//! `(user_index, order_index)`, matching the circuit's slot layout. Slots of
//! noop users and noop orders keep their defaults (zero amounts, forward
//! flag set, empty signature).
//!
//! ## Encoding
//!
//! [`BatchWitness::to_ssz_bytes`] flattens the witness into an SSZ container
//! (see [`payload`]); [`BatchWitness::digest`] is the SHA-256 of that
//! encoding and identifies the witness across processes.

pub mod payload;

use crate::config::{BATCH_TOKENS, MAX_BATCH_USERS, MAX_USER_ORDERS};
use crate::engine::balance::{get_operator_third_balance, third_balance_from_delta};
use crate::error::{Result, WitnessError};
use crate::types::{FeeInBatch, Fill, Signature, TokenSlot};

pub use payload::{
    BalanceDelta, OrderWitness, SlotUpdate, WitnessPayload, WITNESS_BALANCE_SLOTS,
    WITNESS_ORDER_SLOTS,
};

/// Per-order array shaped like the circuit's user/order slots
pub type OrderGrid<T> = [[T; MAX_USER_ORDERS]; MAX_BATCH_USERS];

/// Complete witness for one batch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchWitness {
    /// Settlement tokens: first, second, third
    pub tokens: [u32; BATCH_TOKENS],

    /// Prior slot state, fill, fees and slot update per order
    pub orders: OrderGrid<OrderWitness>,

    /// Compact signature layout (shifted for the first two users)
    pub signatures: OrderGrid<Signature>,

    /// Signatures at their `(user, order)` position
    pub all_signatures: OrderGrid<Signature>,

    /// Trading fees paid per user, by settlement token
    pub trading_fee_user: [FeeInBatch; MAX_BATCH_USERS],

    /// Gas fees paid per user, by settlement token
    pub gas_fee_user: [FeeInBatch; MAX_BATCH_USERS],

    /// Trading fees across the batch, by settlement token
    pub trading_fee_sum: FeeInBatch,

    /// Gas fees across the batch, by settlement token
    pub gas_fee_sum: FeeInBatch,

    /// Net token movement per user, by settlement token, before fees
    pub balance_deltas: [[i128; BATCH_TOKENS]; MAX_BATCH_USERS],
}

impl BatchWitness {
    /// Empty witness for a batch over `tokens`
    pub fn new(tokens: [u32; BATCH_TOKENS]) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    #[inline]
    pub fn first_token_id(&self) -> u32 {
        self.tokens[0]
    }

    #[inline]
    pub fn second_token_id(&self) -> u32 {
        self.tokens[1]
    }

    #[inline]
    pub fn third_token_id(&self) -> u32 {
        self.tokens[2]
    }

    /// Witness of one order slot
    pub fn order(&self, user_index: usize, order_index: usize) -> Option<&OrderWitness> {
        self.orders.get(user_index)?.get(order_index)
    }

    /// Settled fill of one order slot
    pub fn fill(&self, user_index: usize, order_index: usize) -> Option<Fill> {
        self.order(user_index, order_index).map(|o| o.fill)
    }

    /// Operator's third-token income, zero when the third token aliases
    /// the first or second
    pub fn operator_third_balance(&self) -> Result<u128> {
        get_operator_third_balance(
            self.first_token_id(),
            self.second_token_id(),
            self.third_token_id(),
            self.gas_fee_sum.get(TokenSlot::Third),
            self.trading_fee_sum.get(TokenSlot::Third),
        )
    }

    /// A user's net third-token change after fees, zero when the third
    /// token aliases the first or second
    pub fn user_third_balance(&self, user_index: usize) -> Result<i128> {
        if user_index >= MAX_BATCH_USERS {
            return Err(WitnessError::TooManyUsers {
                count: user_index + 1,
                max: MAX_BATCH_USERS,
            });
        }
        third_balance_from_delta(
            self.first_token_id(),
            self.second_token_id(),
            self.third_token_id(),
            self.balance_deltas[user_index][TokenSlot::Third.index()],
            self.trading_fee_user[user_index].get(TokenSlot::Third),
            self.gas_fee_user[user_index].get(TokenSlot::Third),
        )
    }
}
