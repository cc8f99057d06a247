//! # Wire Protocol Constants
//!
//! Core constants of the wire-message layer. Every node in a network must
//! agree on these values; they are fixed per protocol version and negotiated
//! via the version-handshake message, not at runtime.

/// Default cap on a single encoded frame, pre- or post-compression (2 MiB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1 << 21;

/// Length prefix width for string fields (u16, big-endian)
pub const STR_LEN_PREFIX_BYTES: usize = 2;

/// Length prefix width for variable byte-array fields and list counts (u32, big-endian)
pub const BYTES_LEN_PREFIX_BYTES: usize = 4;

/// Wire size of an IP descriptor: 16 IPv6 octets + big-endian port
pub const IP_WIRE_BYTES: usize = 18;

/// Default zstd compression level for compressible message payloads
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;
