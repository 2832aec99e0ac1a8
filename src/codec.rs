// src/codec.rs
//
// Arbitrary-base (2..=36) digit strings <-> unbounded integers

use num_bigint::BigUint;

use crate::error::{Error, Result};

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

fn check_base(base: u32) -> Result<()> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(Error::InvalidBase(base));
    }
    Ok(())
}

/// Decode `digits` written in `base`. Letters are accepted in either case.
/// No sign, no separators.
pub fn decode(digits: &str, base: u32) -> Result<BigUint> {
    check_base(base)?;
    if digits.is_empty() {
        return Err(Error::EmptyValue);
    }

    let mut buf = Vec::with_capacity(digits.len());
    for (position, ch) in digits.chars().enumerate() {
        match ch.to_digit(base) {
            Some(d) => buf.push(d as u8),
            None => return Err(Error::InvalidDigit { ch, position, base }),
        }
    }

    // every digit is < base at this point
    BigUint::from_radix_be(&buf, base).ok_or(Error::InvalidBase(base))
}

/// Canonical lowercase representation of `value` in `base`, no leading zeros.
pub fn encode(value: &BigUint, base: u32) -> Result<String> {
    check_base(base)?;
    Ok(value.to_str_radix(base))
}

/// Outcome of re-encoding a decoded value and comparing it with its source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundTrip {
    pub original: String,
    pub reencoded: String,
}

impl RoundTrip {
    /// Case-insensitive comparison. Leading zeros in the source count as a mismatch.
    pub fn is_consistent(&self) -> bool {
        self.original.eq_ignore_ascii_case(&self.reencoded)
    }
}

/// Decode `digits` and re-encode the result for validation.
pub fn round_trip(digits: &str, base: u32) -> Result<(BigUint, RoundTrip)> {
    let value = decode(digits, base)?;
    let reencoded = encode(&value, base)?;
    let rt = RoundTrip { original: digits.to_string(), reencoded };
    Ok((value, rt))
}
