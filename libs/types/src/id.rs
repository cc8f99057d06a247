//! # 32-Byte Identifier
//!
//! ## Purpose
//!
//! Fixed-size identifier for chains, containers, and subnets. Identifiers are
//! plain 32-byte values with a total ordering and a hex textual form; they are
//! produced by hashing elsewhere in the system and treated as opaque here.
//!
//! ## Integration Points
//!
//! - **Codec**: serialized as a raw 32-byte run (no length prefix)
//! - **Consensus**: ordering and hashing for frontier/vote bookkeeping
//! - **Zero-Copy**: `zerocopy` traits allow viewing an `Id` as its bytes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Errors constructing an [`Id`] from external input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Byte slice had the wrong length for a fixed-size identifier
    #[error("invalid identifier length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Textual form was not valid hex
    #[error("invalid identifier hex: {0}")]
    InvalidHex(String),
}

/// A 32-byte identifier with total ordering and a byte-slice view
#[repr(transparent)]
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    AsBytes,
    FromBytes,
    FromZeroes,
    Serialize,
    Deserialize,
)]
pub struct Id([u8; Id::LEN]);

impl Id {
    /// Length of an identifier in bytes
    pub const LEN: usize = 32;

    /// The all-zero identifier
    pub const EMPTY: Id = Id([0u8; Id::LEN]);

    /// Construct from a fixed-size array
    pub const fn new(bytes: [u8; Id::LEN]) -> Self {
        Id(bytes)
    }

    /// Construct from a byte slice, validating length
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        let array: [u8; Id::LEN] =
            bytes
                .try_into()
                .map_err(|_| IdError::InvalidLength {
                    expected: Id::LEN,
                    got: bytes.len(),
                })?;
        Ok(Id(array))
    }

    /// View the identifier as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the underlying array
    pub const fn into_bytes(self) -> [u8; Id::LEN] {
        self.0
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; Id::LEN]> for Id {
    fn from(bytes: [u8; Id::LEN]) -> Self {
        Id(bytes)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| IdError::InvalidHex(e.to_string()))?;
        Id::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_roundtrip() {
        let bytes = [0xABu8; Id::LEN];
        let id = Id::from_slice(&bytes).unwrap();
        assert_eq!(id.as_slice(), &bytes);
        assert_eq!(id.into_bytes(), bytes);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        let err = Id::from_slice(&[0u8; 31]).unwrap_err();
        assert_eq!(
            err,
            IdError::InvalidLength {
                expected: 32,
                got: 31
            }
        );
    }

    #[test]
    fn test_hex_display_parse() {
        let mut bytes = [0u8; Id::LEN];
        bytes[31] = 0x01;
        let id = Id::new(bytes);
        let text = id.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.ends_with("01"));
        assert_eq!(text.parse::<Id>().unwrap(), id);
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let a = Id::new([0u8; Id::LEN]);
        let mut high = [0u8; Id::LEN];
        high[0] = 1;
        let b = Id::new(high);
        assert!(a < b);
        assert_eq!(Id::EMPTY, a);
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = Id::new([0x22; Id::LEN]);
        let json = serde_json::to_string(&id).unwrap();
        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_zero_copy_view() {
        use zerocopy::AsBytes;
        let id = Id::new([0x11; Id::LEN]);
        assert_eq!(id.as_bytes(), id.as_slice());
    }
}
