//! Integer arithmetic shared with the circuit.
//!
//! - [`fee`]: trading fee and proportional floor division
//! - [`float`]: decimal float encodings and amount rounding

pub mod fee;
pub mod float;

pub use fee::{calculate_fees, mul_div};
pub use float::{round_to_float_value, FloatEncoding, RoundingFn, FLOAT16};
