//! # Field Registry - Typed Message Fields
//!
//! ## Purpose
//!
//! Every message field has a symbol ([`Field`]), a declared wire type
//! ([`WireType`]), and a runtime value ([`FieldValue`]). The registry maps
//! symbols to wire types for one protocol version; the codec consults it to
//! serialize and deserialize values, and rejects any value whose tag does not
//! match the declared type before a single byte is written.
//!
//! Field symbols never appear on the wire. On-wire order comes from the
//! message catalogue, never from the caller's insertion order.

use std::collections::HashMap;

use bytes::Bytes;
use types::{Id, IpPort, SignedPeerRecord};

use crate::error::{CodecError, CodecResult};

/// Field symbols, stable across protocol versions
///
/// A field's wire type never changes across versions; a changed encoding gets
/// a new symbol.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    VersionStr = 0,
    NetworkId = 1,
    NodeId = 2,
    MyTime = 3,
    Ip = 4,
    ChainId = 5,
    RequestId = 6,
    Deadline = 7,
    ContainerId = 8,
    ContainerBytes = 9,
    ContainerIds = 10,
    MultiContainerBytes = 11,
    SigBytes = 12,
    VersionTime = 13,
    SignedPeers = 14,
    TrackedSubnets = 15,
    AppRequestBytes = 16,
    AppResponseBytes = 17,
    AppGossipBytes = 18,
}

/// Wire encodings a field can use
///
/// Identifier lists and container-bytes lists are distinct wire types: the
/// former packs raw fixed-size runs after the count, the latter prefixes each
/// element with its own length. Both are carried by the single
/// [`FieldValue::BytesList`] tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Big-endian u32
    U32,
    /// Big-endian u64
    U64,
    /// u16 length prefix + UTF-8 bytes
    Str,
    /// Raw 32-byte run, no prefix
    FixedBytes,
    /// u32 length prefix + bytes
    VarBytes,
    /// u32 count + raw 32-byte elements
    FixedBytesList,
    /// u32 count + u32-prefixed elements
    VarBytesList,
    /// 16 IPv6 octets + big-endian port
    IpPort,
    /// u32 count + signed peer records
    SignedPeerList,
}

impl WireType {
    /// Human name used in tag-mismatch diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            WireType::U32 => "u32",
            WireType::U64 => "u64",
            WireType::Str => "string",
            WireType::FixedBytes => "fixed bytes",
            WireType::VarBytes => "variable bytes",
            WireType::FixedBytesList => "identifier list",
            WireType::VarBytesList => "byte-array list",
            WireType::IpPort => "ip+port",
            WireType::SignedPeerList => "signed peer list",
        }
    }
}

/// A field's runtime value, tagged by wire shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    U32(u32),
    U64(u64),
    Str(String),
    FixedBytes(Id),
    VarBytes(Bytes),
    BytesList(Vec<Bytes>),
    IpPort(IpPort),
    SignedPeerList(Vec<SignedPeerRecord>),
}

impl FieldValue {
    /// Whether this value's tag is serializable as the given wire type
    pub fn matches(&self, wire: WireType) -> bool {
        matches!(
            (self, wire),
            (FieldValue::U32(_), WireType::U32)
                | (FieldValue::U64(_), WireType::U64)
                | (FieldValue::Str(_), WireType::Str)
                | (FieldValue::FixedBytes(_), WireType::FixedBytes)
                | (FieldValue::VarBytes(_), WireType::VarBytes)
                | (FieldValue::BytesList(_), WireType::FixedBytesList)
                | (FieldValue::BytesList(_), WireType::VarBytesList)
                | (FieldValue::IpPort(_), WireType::IpPort)
                | (FieldValue::SignedPeerList(_), WireType::SignedPeerList)
        )
    }

    /// Human name used in tag-mismatch diagnostics
    pub fn tag_name(&self) -> &'static str {
        match self {
            FieldValue::U32(_) => "u32",
            FieldValue::U64(_) => "u64",
            FieldValue::Str(_) => "string",
            FieldValue::FixedBytes(_) => "fixed bytes",
            FieldValue::VarBytes(_) => "variable bytes",
            FieldValue::BytesList(_) => "byte-array list",
            FieldValue::IpPort(_) => "ip+port",
            FieldValue::SignedPeerList(_) => "signed peer list",
        }
    }
}

/// Immutable Field → WireType table for one protocol version
///
/// Built once at process start and passed into the codec; multiple versions
/// can coexist in one process for compatibility testing.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    table: HashMap<Field, WireType>,
}

impl FieldRegistry {
    /// Build a registry from explicit entries
    pub fn new(entries: impl IntoIterator<Item = (Field, WireType)>) -> Self {
        FieldRegistry {
            table: entries.into_iter().collect(),
        }
    }

    /// The v1 registry, covering every declared field
    pub fn v1() -> Self {
        use Field::*;
        use WireType::*;
        FieldRegistry::new([
            (VersionStr, Str),
            (NetworkId, U32),
            (NodeId, U32),
            (MyTime, U64),
            (Ip, IpPort),
            (ChainId, FixedBytes),
            (RequestId, U32),
            (Deadline, U64),
            (ContainerId, FixedBytes),
            (ContainerBytes, VarBytes),
            (ContainerIds, FixedBytesList),
            (MultiContainerBytes, VarBytesList),
            (SigBytes, VarBytes),
            (VersionTime, U64),
            (SignedPeers, SignedPeerList),
            (TrackedSubnets, FixedBytesList),
            (AppRequestBytes, VarBytes),
            (AppResponseBytes, VarBytes),
            (AppGossipBytes, VarBytes),
        ])
    }

    /// Wire type of a field, failing for fields this version does not declare
    pub fn wire_type_of(&self, field: Field) -> CodecResult<WireType> {
        self.table
            .get(&field)
            .copied()
            .ok_or(CodecError::UnknownField { field })
    }

    /// Whether the field is declared in this registry
    pub fn contains(&self, field: Field) -> bool {
        self.table.contains_key(&field)
    }
}

/// Ordered Field → FieldValue mapping for one message
///
/// Backed by a small vector (messages carry at most eight fields). Equality
/// is set equality: two mappings with the same entries compare equal
/// regardless of insertion order, matching the determinism contract of the
/// codec.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    entries: Vec<(Field, FieldValue)>,
}

impl FieldValues {
    pub fn new() -> Self {
        FieldValues::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        FieldValues {
            entries: Vec::with_capacity(n),
        }
    }

    /// Insert a value, replacing any previous value for the field
    pub fn insert(&mut self, field: Field, value: FieldValue) -> Option<FieldValue> {
        for entry in &mut self.entries {
            if entry.0 == field {
                return Some(std::mem::replace(&mut entry.1, value));
            }
        }
        self.entries.push((field, value));
        None
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }
}

impl PartialEq for FieldValues {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(f, v)| other.get(*f) == Some(v))
    }
}

impl Eq for FieldValues {}

impl FromIterator<(Field, FieldValue)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (Field, FieldValue)>>(iter: T) -> Self {
        let mut values = FieldValues::new();
        for (field, value) in iter {
            values.insert(field, value);
        }
        values
    }
}
