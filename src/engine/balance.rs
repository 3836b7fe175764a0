//! Token balance helpers for the circuit's per-token bookkeeping.
//!
//! The circuit tracks three settlement tokens per batch. When the third
//! token coincides with the first or second, its balance has already been
//! accounted for and the third-token helpers report zero.

use crate::error::{Result, WitnessError};
use crate::types::Order;

/// Net balance change of `token_id` across `orders`
///
/// Each non-noop order debits `delta_filled_s` when it sells the token and
/// credits `delta_filled_b` when it buys it.
pub fn get_batch_order_balance(orders: &[Order], token_id: u32) -> Result<i128> {
    let mut delta: i128 = 0;
    for order in orders.iter().filter(|o| !o.is_noop) {
        if order.token_s == token_id {
            delta = delta
                .checked_sub(to_signed(order.delta_filled_s)?)
                .ok_or_else(|| WitnessError::overflow("get_batch_order_balance"))?;
        }
        if order.token_b == token_id {
            delta = delta
                .checked_add(to_signed(order.delta_filled_b)?)
                .ok_or_else(|| WitnessError::overflow("get_batch_order_balance"))?;
        }
    }
    Ok(delta)
}

/// Net third-token balance change of one user after fees
///
/// Zero when the third token is also the first or second token.
pub fn get_third_balance(
    first_token_id: u32,
    second_token_id: u32,
    third_token_id: u32,
    orders: &[Order],
    third_trading_fee: u128,
    third_gas_fee: u128,
) -> Result<i128> {
    if third_token_id == first_token_id || third_token_id == second_token_id {
        return Ok(0);
    }
    let delta = get_batch_order_balance(orders, third_token_id)?;
    third_balance_from_delta(
        first_token_id,
        second_token_id,
        third_token_id,
        delta,
        third_trading_fee,
        third_gas_fee,
    )
}

/// [`get_third_balance`] for an already aggregated third-token delta
pub fn third_balance_from_delta(
    first_token_id: u32,
    second_token_id: u32,
    third_token_id: u32,
    third_delta: i128,
    third_trading_fee: u128,
    third_gas_fee: u128,
) -> Result<i128> {
    if third_token_id == first_token_id || third_token_id == second_token_id {
        return Ok(0);
    }
    let trading_fee = to_signed(third_trading_fee)?;
    let gas_fee = to_signed(third_gas_fee)?;
    third_delta
        .checked_sub(trading_fee)
        .and_then(|b| b.checked_sub(gas_fee))
        .ok_or_else(|| WitnessError::overflow("get_third_balance"))
}

/// Third-token fees collected by the operator across the batch
///
/// Zero when the third token is also the first or second token.
pub fn get_operator_third_balance(
    first_token_id: u32,
    second_token_id: u32,
    third_token_id: u32,
    third_token_gas_fee_sum: u128,
    third_token_trading_fee_sum: u128,
) -> Result<u128> {
    if third_token_id == first_token_id || third_token_id == second_token_id {
        return Ok(0);
    }
    third_token_gas_fee_sum
        .checked_add(third_token_trading_fee_sum)
        .ok_or_else(|| WitnessError::overflow("get_operator_third_balance"))
}

#[inline]
fn to_signed(amount: u128) -> Result<i128> {
    i128::try_from(amount).map_err(|_| WitnessError::overflow("balance"))
}
