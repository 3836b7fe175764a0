//! Error type for witness computation.
//!
//! Every failure here is a data or logic error in batch construction, never a
//! transient condition. Callers must discard the batch and rebuild it.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, WitnessError>;

/// Errors raised while computing a batch witness
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    /// Submitted trading fee is larger than the fee the circuit recomputes
    #[error(
        "user {user_index} order {order_index}: trading fee {trading_fee} exceeds calculated fee {calculated_fee}"
    )]
    TradingFeeExceeded {
        user_index: usize,
        order_index: usize,
        trading_fee: u128,
        calculated_fee: u128,
    },

    /// Integer division with a zero denominator
    #[error("division by zero in {context}")]
    DivisionByZero { context: &'static str },

    /// Intermediate or final value does not fit the amount width
    #[error("arithmetic overflow in {context}")]
    Overflow { context: &'static str },

    /// Value cannot be represented by the float encoding
    #[error("value {value} exceeds float encoding maximum")]
    FloatOutOfRange { value: u128 },

    /// Batch carries more users than the circuit layout allows
    #[error("batch has {count} users, maximum is {max}")]
    TooManyUsers { count: usize, max: usize },

    /// A user carries more orders than its slot allows
    #[error("user {user_index} has {count} orders, maximum is {max}")]
    TooManyOrders {
        user_index: usize,
        count: usize,
        max: usize,
    },

    /// Auto-market order submitted without its originating start order
    #[error("user {user_index} order {order_index}: auto-market order has no start order")]
    MissingStartOrder {
        user_index: usize,
        order_index: usize,
    },

    /// Circuit parameters are inconsistent
    #[error("invalid circuit parameters: {0}")]
    InvalidParams(String),

    /// SSZ encoding of the witness failed
    #[error("witness serialization failed: {0}")]
    Serialization(String),
}

impl WitnessError {
    pub(crate) fn div_by_zero(context: &'static str) -> Self {
        Self::DivisionByZero { context }
    }

    pub(crate) fn overflow(context: &'static str) -> Self {
        Self::Overflow { context }
    }
}
