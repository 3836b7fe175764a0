//! Fill resolution for pre-matched orders.
//!
//! ## Rules
//!
//! - Capacity is measured on the side the order limits by
//!   (`amount_b` when `fill_amount_b_or_s`, else `amount_s`)
//! - A B-side remainder is converted to S before capping by balance
//! - The B amount is always derived from the S amount with the order's own
//!   ratio, never rounded independently
//! - All divisions floor
//!
//! ## Example
//!
//! ```
//! use batch_witness::engine::get_max_fill;
//! use batch_witness::state::InMemoryState;
//! use batch_witness::types::{Fill, Order};
//!
//! let state = InMemoryState::new(14);
//! let order = Order::new(1, 1, 1, 2, 100, 50);
//!
//! assert_eq!(get_max_fill(&order, 30, false, &state).unwrap(), Fill::new(70, 35));
//! ```

use crate::error::{Result, WitnessError};
use crate::math::mul_div;
use crate::state::StateReader;
use crate::types::{Fill, Order};

/// Largest fill `order` can still take
///
/// # Arguments
///
/// * `order` - The order to fill
/// * `filled` - Amount already filled, on the order's limit side
/// * `balance_limit` - Cap the S amount by the account's live token S balance
/// * `state` - Balance source when `balance_limit` is set
///
/// # Errors
///
/// [`WitnessError::DivisionByZero`] if `amount_s` or `amount_b` is zero.
pub fn get_max_fill<S: StateReader + ?Sized>(
    order: &Order,
    filled: u128,
    balance_limit: bool,
    state: &S,
) -> Result<Fill> {
    let balance_s = if balance_limit {
        state.balance(order.account_id, order.token_s)
    } else {
        order.amount_s
    };

    let limit = if order.fill_amount_b_or_s {
        order.amount_b
    } else {
        order.amount_s
    };
    let remaining = limit - limit.min(filled);

    let remaining_s = if order.fill_amount_b_or_s {
        mul_div(remaining, order.amount_s, order.amount_b, "get_max_fill")?
    } else {
        remaining
    };

    let fill_s = balance_s.min(remaining_s);
    let fill_b = mul_div(fill_s, order.amount_b, order.amount_s, "get_max_fill")?;
    Ok(Fill::new(fill_s, fill_b))
}

/// Settle a taker fill against a maker fill, in place
///
/// The side with less to give caps the other: if the taker wants less B
/// than the maker offers S, the maker is scaled down to the taker's B;
/// otherwise the taker is scaled down to the maker's S.
///
/// # Returns
///
/// `(spread, matchable)` where `spread = taker_fill.s - maker_fill.b` and
/// `matchable` is `maker_fill.b <= taker_fill.s`. A negative spread is
/// returned as is; rejecting it is up to the caller.
///
/// On error both fills are left unchanged.
pub fn match_fills(
    taker: &Order,
    taker_fill: &mut Fill,
    maker: &Order,
    maker_fill: &mut Fill,
) -> Result<(i128, bool)> {
    if taker_fill.b < maker_fill.s {
        let maker_b = mul_div(taker_fill.b, maker.amount_b, maker.amount_s, "match_fills")?;
        maker_fill.s = taker_fill.b;
        maker_fill.b = maker_b;
    } else {
        let taker_s = mul_div(maker_fill.s, taker.amount_s, taker.amount_b, "match_fills")?;
        taker_fill.s = taker_s;
        taker_fill.b = maker_fill.s;
    }

    let matchable = maker_fill.b <= taker_fill.s;
    let spread = signed(taker_fill.s)?
        .checked_sub(signed(maker_fill.b)?)
        .ok_or_else(|| WitnessError::overflow("match_fills"))?;
    Ok((spread, matchable))
}

#[inline]
fn signed(amount: u128) -> Result<i128> {
    i128::try_from(amount).map_err(|_| WitnessError::overflow("match_fills"))
}

// ============================================================================
// Unit Tests
// ============================================================================
