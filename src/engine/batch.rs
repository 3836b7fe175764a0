//! Batch orchestrator: turns a pre-matched batch into its witness.
//!
//! ## Processing Order
//!
//! Users are walked in slot order, and each user's orders in slot order.
//! Noop users and noop orders are skipped and keep their witness defaults.
//! For every remaining order:
//!
//! 1. Round the gas fee to the circuit's float encoding
//! 2. Resolve the prior storage leaf
//! 3. Grid orders: recompute the forward flag, drop the fill history on a flip
//! 4. Take the settled amounts as the fill
//! 5. Check the declared trading fee against the recomputed one
//! 6. Book the trading fee under the token bought
//! 7. Book the gas fee under the fee token
//! 8. Lay out the signature in both signature grids
//! 9. Fold filled, gas fee and forward through the per-batch overlay
//!
//! ## State
//!
//! A [`BatchProcessor`] holds configuration only. Every call to
//! [`BatchProcessor::process`] gets a fresh accumulator, and an error drops
//! it, so no partial witness is ever returned.

use tracing::{debug, info, trace, warn};

use crate::config::CircuitParams;
use crate::engine::balance::get_batch_order_balance;
use crate::engine::forward::is_forward_flip;
use crate::engine::overlay::SlotOverlay;
use crate::error::{Result, WitnessError};
use crate::math::{calculate_fees, round_to_float_value, RoundingFn};
use crate::state::{get_data, StateReader};
use crate::types::{Batch, FeeInBatch, Fill, Order, TokenSlot};
use crate::witness::{BatchWitness, OrderWitness, SlotUpdate};

// ============================================================================
// BatchProcessor
// ============================================================================

/// Builds batch witnesses for one circuit layout
///
/// ## Example
///
/// ```
/// use batch_witness::config::CircuitParams;
/// use batch_witness::engine::BatchProcessor;
/// use batch_witness::state::InMemoryState;
/// use batch_witness::types::{Batch, FeeInBatch, Order, User};
///
/// let processor = BatchProcessor::new(CircuitParams::default()).unwrap();
/// let state = InMemoryState::new(14);
///
/// let order = Order::new(7, 1, 1, 2, 100, 50)
///     .with_fill(100, 50)
///     .with_fees(20, 0, 1, 10);
/// let batch = Batch::new([1, 2, 3], vec![User::new(7, vec![order])]);
///
/// let witness = processor.process(&batch, &state).unwrap();
/// assert_eq!(witness.gas_fee_sum, FeeInBatch::new(10, 0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    params: CircuitParams,
    round: RoundingFn,
}

impl BatchProcessor {
    /// Create a processor rounding gas fees with [`round_to_float_value`]
    ///
    /// # Errors
    ///
    /// [`WitnessError::InvalidParams`] if `params` fails validation.
    pub fn new(params: CircuitParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            round: round_to_float_value,
        })
    }

    /// Replace the gas fee rounding function
    pub fn with_rounding(mut self, round: RoundingFn) -> Self {
        self.round = round;
        self
    }

    pub fn params(&self) -> &CircuitParams {
        &self.params
    }

    /// Round the gas fee of every active order in place
    ///
    /// All fees are rounded before any is written, so on error the batch is
    /// left untouched. Rounding is idempotent, so a rounded batch processes
    /// to the same witness.
    pub fn round_fees(&self, batch: &mut Batch) -> Result<()> {
        let mut rounded = Vec::with_capacity(batch.active_order_count());
        for (user_index, user) in batch.users.iter().enumerate() {
            if user.is_noop {
                continue;
            }
            for (order_index, order) in user.active_orders() {
                let fee = (self.round)(order.fee, self.params.gas_fee_encoding)?;
                rounded.push((user_index, order_index, fee));
            }
        }
        for (user_index, order_index, fee) in rounded {
            batch.users[user_index].orders[order_index].fee = fee;
        }
        Ok(())
    }

    /// Position of an order's signature in the compact signature grid
    ///
    /// Shifted users write order `o > 0` at `o - 1`, so their second order
    /// overwrites the first.
    #[inline]
    pub fn compact_signature_index(&self, user_index: usize, order_index: usize) -> (usize, usize) {
        if order_index > 0 && self.params.is_signature_shifted(user_index) {
            (user_index, order_index - 1)
        } else {
            (user_index, order_index)
        }
    }

    /// Compute the witness of `batch` against a state snapshot
    ///
    /// The batch is not modified: rounded gas fees appear in the witness as
    /// `gas_fee_order`, while `order.fee` keeps its submitted value. Use
    /// [`Self::process_mut`] to also overwrite the fees in the batch.
    ///
    /// # Errors
    ///
    /// * [`WitnessError::TooManyUsers`] / [`WitnessError::TooManyOrders`] if
    ///   the batch does not fit the layout
    /// * [`WitnessError::TradingFeeExceeded`] if an order declares a trading
    ///   fee above the recomputed one
    /// * [`WitnessError::MissingStartOrder`] for a grid order without its
    ///   start order
    /// * Arithmetic errors from fee rounding and folding
    pub fn process<S: StateReader + ?Sized>(&self, batch: &Batch, state: &S) -> Result<BatchWitness> {
        batch.validate_shape(&self.params)?;

        let order_count = batch.active_order_count();
        info!(
            users = batch.users.len(),
            orders = order_count,
            tokens = ?batch.tokens,
            "processing batch"
        );

        let mut acc = BatchAccumulator::new(batch.tokens, order_count);
        for (user_index, user) in batch.users.iter().enumerate() {
            if user.is_noop {
                trace!(user_index, "skipping noop user");
                continue;
            }
            for (order_index, order) in user.active_orders() {
                self.apply_order(&mut acc, user_index, order_index, order, state)?;
            }
            acc.record_balance_deltas(user_index, &user.orders)?;
        }

        let witness = acc.finish();
        info!(
            trading_fee_sum = ?witness.trading_fee_sum,
            gas_fee_sum = ?witness.gas_fee_sum,
            "batch processed"
        );
        Ok(witness)
    }

    /// Round every order's `fee` in place, then compute the witness
    ///
    /// Fees are only written once all of them rounded successfully; a
    /// processing error after that leaves the batch with rounded fees.
    pub fn process_mut<S: StateReader + ?Sized>(
        &self,
        batch: &mut Batch,
        state: &S,
    ) -> Result<BatchWitness> {
        self.round_fees(batch)?;
        self.process(batch, state)
    }

    fn apply_order<S: StateReader + ?Sized>(
        &self,
        acc: &mut BatchAccumulator,
        user_index: usize,
        order_index: usize,
        order: &Order,
        state: &S,
    ) -> Result<()> {
        // 1. gas fee rounding
        let gas_fee_order = (self.round)(order.fee, self.params.gas_fee_encoding)?;

        // 2. prior storage
        let data = get_data(
            order.account_id,
            order.storage_id,
            self.params.num_storage_slots(),
            state,
        );
        let mut filled = data.filled;

        // 3. grid direction
        let new_forward = if order.is_auto_market() {
            let (new_forward, previous) = acc
                .overlay
                .fold_forward(order, data.forward)
                .ok_or(WitnessError::MissingStartOrder {
                    user_index,
                    order_index,
                })?;
            // stored history no longer applies once the grid turned
            if is_forward_flip(data.forward, order) == Some(true) {
                filled = 0;
            }
            if new_forward != previous {
                debug!(
                    user_index,
                    order_index,
                    account_id = order.account_id,
                    storage_id = order.storage_id,
                    new_forward,
                    "grid order flipped, fill history reset"
                );
                acc.overlay.reset_filled(order.account_id, order.storage_id);
            }
            new_forward
        } else {
            acc.overlay
                .forward()
                .get_or(order.account_id, order.storage_id, data.forward)
        };

        // 4. fill
        let fill = Fill::new(order.delta_filled_s, order.delta_filled_b);

        // 5. trading fee consistency
        let calculated_fee = calculate_fees(fill.b, order.fee_bips)?;
        if order.trading_fee > calculated_fee {
            warn!(
                user_index,
                order_index,
                trading_fee = %order.trading_fee,
                calculated_fee = %calculated_fee,
                "trading fee exceeds calculated fee"
            );
            return Err(WitnessError::TradingFeeExceeded {
                user_index,
                order_index,
                trading_fee: order.trading_fee,
                calculated_fee,
            });
        }

        // 6-7. fee buckets
        acc.book_trading_fee(user_index, order.token_b, order.trading_fee)?;
        acc.book_gas_fee(user_index, order.fee_token_id, gas_fee_order)?;

        // 8. signatures
        let (su, so) = self.compact_signature_index(user_index, order_index);
        acc.witness.signatures[su][so] = order.signature.clone();
        acc.witness.all_signatures[user_index][order_index] = order.signature.clone();

        // 9. slot updates
        let new_filled = acc.overlay.fold_filled(
            order.account_id,
            order.storage_id,
            order.fill_amount_b_or_s,
            filled,
            &fill,
        )?;
        let new_gas_fee =
            acc.overlay
                .fold_gas_fee(order.account_id, order.storage_id, data.gas_fee, gas_fee_order)?;

        trace!(
            user_index,
            order_index,
            account_id = order.account_id,
            storage_id = order.storage_id,
            fill_s = %fill.s,
            fill_b = %fill.b,
            new_filled = %new_filled,
            "order applied"
        );

        acc.witness.orders[user_index][order_index] = OrderWitness {
            token_s_id: data.token_s_id,
            token_b_id: data.token_b_id,
            filled,
            gas_fee: data.gas_fee,
            cancelled: data.cancelled,
            forward: data.forward,
            fill,
            trading_fee: order.trading_fee,
            gas_fee_order,
            update: SlotUpdate {
                new_filled,
                new_gas_fee,
                new_forward,
            },
        };
        Ok(())
    }
}

// ============================================================================
// BatchAccumulator
// ============================================================================

/// Witness under construction plus the per-batch slot overlay
struct BatchAccumulator {
    witness: BatchWitness,
    overlay: SlotOverlay,
}

impl BatchAccumulator {
    fn new(tokens: [u32; 3], order_count: usize) -> Self {
        Self {
            witness: BatchWitness::new(tokens),
            overlay: SlotOverlay::with_capacity(order_count),
        }
    }

    fn book_trading_fee(&mut self, user_index: usize, token_b: u32, amount: u128) -> Result<()> {
        let tokens = self.witness.tokens;
        match TokenSlot::select(&tokens, token_b) {
            Some(slot) => book(
                &mut self.witness.trading_fee_user[user_index],
                &mut self.witness.trading_fee_sum,
                slot,
                amount,
                "trading fee",
            ),
            None => {
                warn!(user_index, token_b, %amount, "trading fee token not in batch, skipped");
                Ok(())
            }
        }
    }

    fn book_gas_fee(&mut self, user_index: usize, fee_token_id: u32, amount: u128) -> Result<()> {
        let tokens = self.witness.tokens;
        match TokenSlot::select(&tokens, fee_token_id) {
            Some(slot) => book(
                &mut self.witness.gas_fee_user[user_index],
                &mut self.witness.gas_fee_sum,
                slot,
                amount,
                "gas fee",
            ),
            None => {
                warn!(user_index, fee_token_id, %amount, "gas fee token not in batch, skipped");
                Ok(())
            }
        }
    }

    fn record_balance_deltas(&mut self, user_index: usize, orders: &[Order]) -> Result<()> {
        for slot in TokenSlot::ALL {
            let token_id = self.witness.tokens[slot.index()];
            self.witness.balance_deltas[user_index][slot.index()] =
                get_batch_order_balance(orders, token_id)?;
        }
        Ok(())
    }

    fn finish(self) -> BatchWitness {
        self.witness
    }
}

fn book(
    user: &mut FeeInBatch,
    sum: &mut FeeInBatch,
    slot: TokenSlot,
    amount: u128,
    context: &'static str,
) -> Result<()> {
    user.checked_add(slot, amount)
        .ok_or_else(|| WitnessError::overflow(context))?;
    sum.checked_add(slot, amount)
        .ok_or_else(|| WitnessError::overflow(context))?;
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
