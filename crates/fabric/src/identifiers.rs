//! Partition key identifier and its text codec.
//!
//! A partition key (PKey) is a 15-bit unsigned identifier and the sole identity
//! of an IB network. The canonical text form is `0x` followed by lowercase hex
//! digits with no padding (`0x20`, `0x7fff`); the UFM REST API uses that form
//! both in resource paths and as the key of its listing maps.
//!
//! [`PKey`] can only hold valid values, so anything that accepts a `PKey` is
//! validated by construction. The free functions [`parse_pkey`] and
//! [`format_pkey`] are the codec entry points for raw text and raw integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, UfmError};

/// Mask of the bits a partition key may occupy.
pub const PKEY_MASK: i32 = 0x7fff;

/// Returns `true` if `value` fits in 15 bits and is non-negative.
pub fn is_pkey_valid(value: i32) -> bool {
    value == value & PKEY_MASK
}

// The UFM documentation quotes 0x0001 - 0xFFFE as the valid range, but the
// enforced check is the 15-bit mask; messages report what is enforced.
fn out_of_range(value: impl fmt::UpperHex) -> UfmError {
    UfmError::invalid_pkey(format!(
        "invalid pkey 0x{value:04X}, out of range 0x0000 - 0x{PKEY_MASK:04X}"
    ))
}

// ---------------------------------------------------------------------------
// PKey
// ---------------------------------------------------------------------------

/// A validated 15-bit InfiniBand partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct PKey(u16);

impl PKey {
    /// The fabric's default partition, which every port is a member of.
    pub const DEFAULT: PKey = PKey(0x7fff);

    /// Creates a [`PKey`], failing with [`UfmError::InvalidPKey`] if `value`
    /// is negative or does not fit in 15 bits.
    pub fn new(value: i32) -> Result<Self> {
        if !is_pkey_valid(value) {
            return Err(out_of_range(value));
        }
        // The mask check bounds the value to 0..=0x7fff.
        Ok(Self(value as u16))
    }

    /// Returns the underlying integer value.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns `true` for the fabric's default partition.
    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl fmt::Display for PKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl FromStr for PKey {
    type Err = UfmError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| {
                UfmError::invalid_pkey(format!("invalid pkey '{s}', expected 0x<hex digits>"))
            })?;

        // Anything wider than 32 bits is out of range long before it overflows.
        let value = u32::from_str_radix(digits, 16).map_err(|_| {
            UfmError::invalid_pkey(format!("invalid pkey '{s}', value is out of range"))
        })?;

        match i32::try_from(value) {
            Ok(v) => Self::new(v),
            Err(_) => Err(out_of_range(value)),
        }
    }
}

impl TryFrom<i32> for PKey {
    type Error = UfmError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PKey> for i32 {
    fn from(pkey: PKey) -> Self {
        i32::from(pkey.0)
    }
}

// ---------------------------------------------------------------------------
// Codec entry points
// ---------------------------------------------------------------------------

/// Parses the `0x<hex>` text form of a partition key.
pub fn parse_pkey(text: &str) -> Result<PKey> {
    text.parse()
}

/// Formats a raw integer as a canonical partition key string.
pub fn format_pkey(value: i32) -> Result<String> {
    PKey::new(value).map(|pkey| pkey.to_string())
}
