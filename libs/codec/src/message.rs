//! # Message Handles
//!
//! Immutable value objects a pack or unpack call hands to the next layer.
//! An [`OutboundMessage`] travels from the builder to the transport; an
//! [`InboundMessage`] travels from the transport to the bootstrap/consensus
//! consumer. Neither outlives a single send/receive cycle and neither is
//! mutated after construction.

use bytes::Bytes;
use types::{Id, IpPort, SignedPeerRecord};

use crate::fields::{Field, FieldValue, FieldValues};
use crate::ops::Op;

/// An encoded message ready for transport
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    op: Op,
    bytes: Bytes,
    fields: FieldValues,
    compressed: bool,
    bytes_saved_compression: i64,
}

impl OutboundMessage {
    pub(crate) fn new(
        op: Op,
        bytes: Bytes,
        fields: FieldValues,
        compressed: bool,
        bytes_saved_compression: i64,
    ) -> Self {
        OutboundMessage {
            op,
            bytes,
            fields,
            compressed,
            bytes_saved_compression,
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the frame for transport without copying
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Bytes the compression pass saved; negative if compression grew the
    /// payload, zero when uncompressed. Feeds bandwidth accounting upstream.
    pub fn bytes_saved_compression(&self) -> i64 {
        self.bytes_saved_compression
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A decoded message as received from a peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    op: Op,
    fields: FieldValues,
    compressed: bool,
    frame_len: usize,
}

impl InboundMessage {
    pub(crate) fn new(op: Op, fields: FieldValues, compressed: bool, frame_len: usize) -> Self {
        InboundMessage {
            op,
            fields,
            compressed,
            frame_len,
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Whether the sender compressed the payload
    pub fn was_compressed(&self) -> bool {
        self.compressed
    }

    /// Size of the frame as received, before decompression
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    // Typed accessors so consumers don't pattern-match FieldValue at every
    // call site. Each returns None when the field is absent or the tag
    // differs, which cannot happen for a message the codec decoded.

    pub fn u32_field(&self, field: Field) -> Option<u32> {
        match self.get(field)? {
            FieldValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn u64_field(&self, field: Field) -> Option<u64> {
        match self.get(field)? {
            FieldValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn str_field(&self, field: Field) -> Option<&str> {
        match self.get(field)? {
            FieldValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn id_field(&self, field: Field) -> Option<Id> {
        match self.get(field)? {
            FieldValue::FixedBytes(v) => Some(*v),
            _ => None,
        }
    }

    pub fn bytes_field(&self, field: Field) -> Option<&Bytes> {
        match self.get(field)? {
            FieldValue::VarBytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn bytes_list_field(&self, field: Field) -> Option<&[Bytes]> {
        match self.get(field)? {
            FieldValue::BytesList(v) => Some(v),
            _ => None,
        }
    }

    pub fn ip_field(&self, field: Field) -> Option<IpPort> {
        match self.get(field)? {
            FieldValue::IpPort(v) => Some(*v),
            _ => None,
        }
    }

    pub fn peers_field(&self, field: Field) -> Option<&[SignedPeerRecord]> {
        match self.get(field)? {
            FieldValue::SignedPeerList(v) => Some(v),
            _ => None,
        }
    }
}
