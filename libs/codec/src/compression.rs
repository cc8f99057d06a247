//! # Payload Compression
//!
//! Block compression for compressible message payloads behind a trait, so
//! tests can substitute a stub and a future protocol version can switch
//! algorithms without touching the codec. The production implementation is
//! zstd in block mode; decompression enforces the caller's output bound to
//! stop a small corrupt frame from ballooning into an allocation attack.

use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::error::{CodecError, CodecResult};

/// Block compressor/decompressor used for compressible payloads
pub trait Compressor: Send + Sync {
    /// Compress a payload
    fn compress(&self, data: &[u8]) -> CodecResult<Vec<u8>>;

    /// Decompress a payload, failing if the output would exceed `max_size`
    fn decompress(&self, data: &[u8], max_size: usize) -> CodecResult<Vec<u8>>;
}

/// zstd block compression at a fixed level
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Self {
        ZstdCompressor { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        ZstdCompressor::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> CodecResult<Vec<u8>> {
        zstd::bulk::compress(data, self.level).map_err(|e| CodecError::CompressionFailed {
            context: format!("zstd level {}: {e}", self.level),
        })
    }

    fn decompress(&self, data: &[u8], max_size: usize) -> CodecResult<Vec<u8>> {
        zstd::bulk::decompress(data, max_size).map_err(|e| CodecError::DecompressionFailed {
            context: format!("zstd (output capped at {max_size} bytes): {e}"),
        })
    }
}
