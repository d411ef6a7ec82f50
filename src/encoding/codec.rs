//! Real value ↔ fixed-width bit vector mapping.
//!
//! A value in `[low, high]` is quantized onto `2^bits` evenly spaced levels
//! and the level index is written big-endian, left-padded with zeros to
//! exactly `bits` bits.
//!
//! # Quantization
//!
//! `step = (high - low) / (2^bits - 1)`. Level `0` decodes to `low` and
//! level `2^bits - 1` decodes to `high`, so both bounds are representable.

use crate::error::{Error, Result};

/// Widest supported segment. Every level below `2^52` is an exact `f64`.
pub const MAX_BITS: u32 = 52;

/// Returns the quantization step of `[low, high]` at `bits` resolution.
pub fn quantization_step(low: f64, high: f64, bits: u32) -> Result<f64> {
    check_bounds(low, high)?;
    check_bits(bits)?;
    Ok((high - low) / max_level(bits) as f64)
}

/// Encodes `value` into a big-endian bit vector of length `bits`.
///
/// The level is rounded half to even. Values outside `[low, high]`
/// (including NaN) are rejected rather than clamped.
///
/// ```
/// use u_bitga::encoding::encode;
///
/// let bits = encode(9.0, -10.0, 14.0, 5).unwrap();
/// assert_eq!(bits, vec![true, true, false, false, true]);
/// ```
pub fn encode(value: f64, low: f64, high: f64, bits: u32) -> Result<Vec<bool>> {
    let step = quantization_step(low, high, bits)?;
    if !(low..=high).contains(&value) {
        return Err(Error::OutOfRange { value, low, high });
    }

    // Division can land half a level past the top for wide segments.
    let level = ((value - low) / step)
        .round_ties_even()
        .clamp(0.0, max_level(bits) as f64) as u64;

    Ok((0..bits).rev().map(|i| (level >> i) & 1 == 1).collect())
}

/// Decodes a big-endian bit vector of length `bits` back into `[low, high]`.
pub fn decode(encoded: &[bool], low: f64, high: f64, bits: u32) -> Result<f64> {
    let step = quantization_step(low, high, bits)?;
    if encoded.len() != bits as usize {
        return Err(Error::SizeMismatch(format!(
            "expected {bits} bits, got {}",
            encoded.len()
        )));
    }
    Ok(low + level_of(encoded) as f64 * step)
}

/// Unsigned big-endian value of a bit slice.
pub(crate) fn level_of(encoded: &[bool]) -> u64 {
    encoded
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

fn max_level(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

fn check_bits(bits: u32) -> Result<()> {
    if bits == 0 || bits > MAX_BITS {
        return Err(Error::Configuration(format!(
            "bit width must be in 1..={MAX_BITS}, got {bits}"
        )));
    }
    Ok(())
}

fn check_bounds(low: f64, high: f64) -> Result<()> {
    if !low.is_finite() || !high.is_finite() || low >= high {
        return Err(Error::Configuration(format!(
            "invalid range [{low}, {high}]: bounds must be finite with low < high"
        )));
    }
    Ok(())
}
