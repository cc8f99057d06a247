//! # Codec Errors
//!
//! Error taxonomy for frame encoding and decoding. All variants are local,
//! non-retriable failures: there is no partial success, and the codec never
//! retries or logs. `pack` failures generally indicate a caller bug (the
//! caller controls its own arguments); `unpack` failures generally indicate a
//! protocol violation by a remote peer, which the transport layer handles by
//! dropping the message or the connection.

use thiserror::Error;

use crate::fields::Field;
use crate::ops::Op;

/// Encode/decode errors with diagnostic context
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A field symbol has no entry in the active registry
    #[error("unknown field {field:?}: not declared in this protocol version's registry")]
    UnknownField { field: Field },

    /// An opcode is not recognized by the active catalogue
    #[error("unknown message type: opcode {opcode:#04x} is not in this protocol version's catalogue")]
    UnknownMessageType { opcode: u8 },

    /// The supplied field-value set does not match the descriptor exactly
    #[error("field set mismatch for {op:?}: {context}")]
    FieldSetMismatch { op: Op, context: String },

    /// Encoded size exceeds a configured or structural limit
    #[error("payload too large: {size} bytes exceeds limit {limit} ({context})")]
    PayloadTooLarge {
        size: usize,
        limit: usize,
        context: String,
    },

    /// The compressor rejected a payload at encode time
    #[error("compression failed: {context}")]
    CompressionFailed { context: String },

    /// Compressed payload is corrupt or would exceed the maximum message size
    #[error("decompression failed: {context}")]
    DecompressionFailed { context: String },

    /// Field bytes violate the wire type's value constraints
    #[error("malformed field {field:?}: {context}")]
    MalformedField { field: Field, context: String },

    /// Frame ran out of bytes mid-field
    #[error("truncated frame: need {need} bytes, have {got} ({context})")]
    TruncatedFrame {
        need: usize,
        got: usize,
        context: String,
    },

    /// Bytes remain after the last declared field was read
    #[error("trailing bytes after {op:?}: {remaining} bytes left undecoded")]
    TrailingBytes { op: Op, remaining: usize },
}

impl CodecError {
    /// A required field is absent from the supplied values
    pub fn missing_field(op: Op, field: Field) -> Self {
        CodecError::FieldSetMismatch {
            op,
            context: format!("required field {field:?} is missing"),
        }
    }

    /// The supplied values contain a field the descriptor does not declare
    pub fn extra_field(op: Op, field: Field) -> Self {
        CodecError::FieldSetMismatch {
            op,
            context: format!("field {field:?} is not declared for this message type"),
        }
    }

    /// A value's tag does not match the field's declared wire type
    pub fn wrong_tag(op: Op, field: Field, expected: &str, got: &str) -> Self {
        CodecError::FieldSetMismatch {
            op,
            context: format!("field {field:?} expects {expected}, got {got}"),
        }
    }

    /// A fixed-size list element has the wrong length
    pub fn bad_list_element(op: Op, field: Field, expected: usize, got: usize) -> Self {
        CodecError::FieldSetMismatch {
            op,
            context: format!(
                "field {field:?} expects {expected}-byte list elements, got {got}"
            ),
        }
    }

    pub fn payload_too_large(size: usize, limit: usize, context: impl Into<String>) -> Self {
        CodecError::PayloadTooLarge {
            size,
            limit,
            context: context.into(),
        }
    }

    pub fn truncated(need: usize, got: usize, context: impl Into<String>) -> Self {
        CodecError::TruncatedFrame {
            need,
            got,
            context: context.into(),
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
