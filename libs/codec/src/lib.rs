//! # Wire-Message Codec
//!
//! ## Purpose
//!
//! The wire-message layer of a peer-to-peer consensus node: a closed
//! catalogue of message types for bootstrap, gossip, and Snow-family
//! consensus, plus the typed field-packing codec underneath it. Any frame
//! packed here decodes on any other node to the identical logical message.
//!
//! ## Architecture Role
//!
//! ```text
//! engines → [Builder] → [Codec.pack] → OutboundMessage → transport
//!                                                            ↓
//! engines ← InboundMessage ← [Codec.unpack] ← frame bytes ← transport
//! ```
//!
//! ## What This Crate Contains
//! - [`fields`]: field symbols, wire types, tagged values, the field registry
//! - [`ops`]: the opcode catalogue with per-type field order and
//!   compressibility
//! - [`Codec`]: deterministic pack/unpack with per-type compression policy
//! - [`Builder`]: one typed constructor per message type
//! - [`OutboundMessage`] / [`InboundMessage`]: immutable handles for the
//!   transport and consumer layers
//!
//! ## What This Crate Does NOT Contain
//! - Socket transport, peer handshake, or authentication
//! - Signature or certificate verification
//! - The consensus algorithm (it only consumes decoded messages)
//!
//! ## Concurrency
//!
//! Everything here is immutable after construction; `Codec` and `Builder`
//! are `Send + Sync` and safe for unsynchronized concurrent use.

pub mod builder;
pub mod codec;
pub mod compression;
pub mod constants;
pub mod error;
pub mod fields;
pub mod message;
pub mod ops;

mod wire;

pub use builder::Builder;
pub use codec::Codec;
pub use compression::{Compressor, ZstdCompressor};
pub use constants::DEFAULT_MAX_MESSAGE_SIZE;
pub use error::{CodecError, CodecResult};
pub use fields::{Field, FieldRegistry, FieldValue, FieldValues, WireType};
pub use message::{InboundMessage, OutboundMessage};
pub use ops::{Catalogue, Descriptor, Op};
