//! Fixed-point fee arithmetic.
//!
//! ## Overview
//!
//! The circuit computes fees and proportional fills with integer-only
//! floor division. Amounts are 128-bit in this crate but products of two
//! amounts are taken in 256 bits so no intermediate can wrap.
//!
//! ## Examples
//!
//! ```
//! use batch_witness::math::fee::{calculate_fees, mul_div};
//!
//! // 50 * 20 / 10000 = 0.1 -> 0
//! assert_eq!(calculate_fees(50, 20).unwrap(), 0);
//! assert_eq!(calculate_fees(1_000_000, 25).unwrap(), 2_500);
//!
//! assert_eq!(mul_div(70, 50, 100, "example").unwrap(), 35);
//! ```

use alloy_primitives::U256;

use crate::config::FEE_BIPS_BASE;
use crate::error::{Result, WitnessError};

// ============================================================================
// Fee Calculation
// ============================================================================

/// Trading fee owed on `amount_b` at `fee_bips` basis points
///
/// `floor(amount_b * fee_bips / 10000)`
///
/// # Example
///
/// ```
/// use batch_witness::math::fee::calculate_fees;
///
/// assert_eq!(calculate_fees(0, 20).unwrap(), 0);
/// assert_eq!(calculate_fees(10_000, 0).unwrap(), 0);
/// assert_eq!(calculate_fees(9_999, 1).unwrap(), 0);
/// assert_eq!(calculate_fees(10_000, 1).unwrap(), 1);
/// ```
pub fn calculate_fees(amount_b: u128, fee_bips: u16) -> Result<u128> {
    mul_div(amount_b, u128::from(fee_bips), FEE_BIPS_BASE, "calculate_fees")
}

// ============================================================================
// Proportional Arithmetic
// ============================================================================

/// Compute `floor(a * b / denominator)` with a 256-bit intermediate
///
/// # Arguments
///
/// * `a`, `b` - Factors
/// * `denominator` - Divisor, must be non-zero
/// * `context` - Operation name carried in the error
///
/// # Errors
///
/// * [`WitnessError::DivisionByZero`] if `denominator == 0`
/// * [`WitnessError::Overflow`] if the quotient exceeds `u128`
pub fn mul_div(a: u128, b: u128, denominator: u128, context: &'static str) -> Result<u128> {
    if denominator == 0 {
        return Err(WitnessError::div_by_zero(context));
    }
    // u128 * u128 always fits in 256 bits
    let product = U256::from(a) * U256::from(b);
    let quotient = product / U256::from(denominator);
    u128::try_from(quotient).map_err(|_| WitnessError::overflow(context))
}

// ============================================================================
// Unit Tests
// ============================================================================
