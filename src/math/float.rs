//! Decimal float encodings used by the circuit for compressed amounts.
//!
//! A float value is `mantissa * base^exponent`, packed as
//! `(exponent << mantissa_bits) | mantissa`. Encoding truncates, so
//! [`round_to_float_value`] returns the largest representable value that is
//! not greater than the input (within the encoding's precision).
//!
//! ```
//! use batch_witness::math::float::{round_to_float_value, FLOAT16};
//!
//! assert_eq!(round_to_float_value(10, FLOAT16).unwrap(), 10);
//! assert_eq!(round_to_float_value(123_456, FLOAT16).unwrap(), 123_400);
//! ```

use alloy_primitives::U256;

use crate::error::{Result, WitnessError};

/// Bit layout of a decimal float
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatEncoding {
    pub num_bits_exponent: u32,
    pub num_bits_mantissa: u32,
    pub exponent_base: u32,
}

pub const FLOAT32: FloatEncoding = FloatEncoding::new(7, 25, 10);
pub const FLOAT31: FloatEncoding = FloatEncoding::new(7, 24, 10);
pub const FLOAT30: FloatEncoding = FloatEncoding::new(5, 25, 10);
pub const FLOAT29: FloatEncoding = FloatEncoding::new(5, 24, 10);
pub const FLOAT24: FloatEncoding = FloatEncoding::new(5, 19, 10);
pub const FLOAT23: FloatEncoding = FloatEncoding::new(5, 18, 10);
/// Gas fee encoding
pub const FLOAT16: FloatEncoding = FloatEncoding::new(5, 11, 10);

/// Signature of an amount rounding function
///
/// Callers that carry their own float implementation can hand one of these
/// to the batch processor instead of [`round_to_float_value`].
pub type RoundingFn = fn(u128, FloatEncoding) -> Result<u128>;

impl FloatEncoding {
    pub const fn new(num_bits_exponent: u32, num_bits_mantissa: u32, exponent_base: u32) -> Self {
        Self {
            num_bits_exponent,
            num_bits_mantissa,
            exponent_base,
        }
    }

    /// Check the layout can encode values at all
    ///
    /// # Errors
    ///
    /// [`WitnessError::InvalidParams`] for a base below 2, an empty mantissa,
    /// or a mantissa or exponent too wide for 128-bit amounts.
    pub fn validate(&self) -> Result<()> {
        if self.exponent_base < 2 {
            return Err(WitnessError::InvalidParams(format!(
                "float exponent base {} must be at least 2",
                self.exponent_base
            )));
        }
        if self.num_bits_mantissa == 0 || self.num_bits_mantissa > 127 {
            return Err(WitnessError::InvalidParams(format!(
                "float mantissa width {} out of range",
                self.num_bits_mantissa
            )));
        }
        if self.num_bits_exponent > 31 {
            return Err(WitnessError::InvalidParams(format!(
                "float exponent width {} out of range",
                self.num_bits_exponent
            )));
        }
        Ok(())
    }

    /// Total encoded width in bits
    pub const fn num_bits(&self) -> u32 {
        self.num_bits_exponent + self.num_bits_mantissa
    }

    #[inline]
    fn max_exponent(&self) -> u32 {
        (1u32 << self.num_bits_exponent) - 1
    }

    #[inline]
    fn max_mantissa(&self) -> u128 {
        (1u128 << self.num_bits_mantissa) - 1
    }

    /// Largest decodable value, `None` when it exceeds 256 bits
    pub fn max_value(&self) -> Option<U256> {
        let base = U256::from(self.exponent_base);
        let mut scale = U256::from(1u8);
        for _ in 0..self.max_exponent() {
            scale = scale.checked_mul(base)?;
        }
        scale.checked_mul(U256::from(self.max_mantissa()))
    }
}

/// Encode `value` into its packed float representation
///
/// # Errors
///
/// * [`WitnessError::FloatOutOfRange`] if the value cannot be represented
/// * [`WitnessError::InvalidParams`] if the encoding fails
///   [`FloatEncoding::validate`]
pub fn to_float(value: u128, encoding: FloatEncoding) -> Result<u128> {
    encoding.validate()?;
    if let Some(max) = encoding.max_value() {
        if U256::from(value) > max {
            return Err(WitnessError::FloatOutOfRange { value });
        }
    }

    let base = U256::from(encoding.exponent_base);
    let max_mantissa = U256::from(encoding.max_mantissa());
    let target = U256::from(value);

    let mut exponent: u32 = 0;
    let mut r = target / max_mantissa;
    let mut d = U256::from(1u8);
    while r >= base || d * max_mantissa < target {
        r /= base;
        exponent += 1;
        d *= base;
    }

    let mantissa = target / d;
    if exponent > encoding.max_exponent() || mantissa > max_mantissa {
        return Err(WitnessError::FloatOutOfRange { value });
    }
    let mantissa = u128::try_from(mantissa).map_err(|_| WitnessError::FloatOutOfRange { value })?;
    Ok((u128::from(exponent) << encoding.num_bits_mantissa) | mantissa)
}

/// Decode a packed float back to an integer amount
pub fn from_float(packed: u128, encoding: FloatEncoding) -> Result<u128> {
    let exponent = packed >> encoding.num_bits_mantissa;
    let mantissa = packed & encoding.max_mantissa();
    let exponent = u32::try_from(exponent).map_err(|_| WitnessError::overflow("from_float"))?;

    let scale = U256::from(encoding.exponent_base)
        .checked_pow(U256::from(exponent))
        .ok_or_else(|| WitnessError::overflow("from_float"))?;
    let value = scale
        .checked_mul(U256::from(mantissa))
        .ok_or_else(|| WitnessError::overflow("from_float"))?;
    u128::try_from(value).map_err(|_| WitnessError::overflow("from_float"))
}

/// Quantize `value` to what the circuit will see after a float round trip
pub fn round_to_float_value(value: u128, encoding: FloatEncoding) -> Result<u128> {
    let packed = to_float(value, encoding)?;
    from_float(packed, encoding)
}
