//! # Frame Primitives
//!
//! Bounds-checked big-endian read/write primitives the codec is built on.
//! The writer appends to a growable buffer; the reader walks a borrowed slice
//! and fails with `TruncatedFrame` the moment a read would pass the end.
//! Neither side touches compression or the catalogue.

use bytes::{BufMut, Bytes, BytesMut};
use types::{Id, IpPort, SignedPeerRecord};

use crate::constants::IP_WIRE_BYTES;
use crate::error::{CodecError, CodecResult};

/// Append-only frame writer
pub(crate) struct FrameWriter {
    buf: BytesMut,
}

impl FrameWriter {
    pub fn new() -> Self {
        FrameWriter {
            buf: BytesMut::with_capacity(256),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    /// Raw bytes, no prefix
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.put_u64(v);
    }

    /// u16 length prefix + UTF-8 bytes
    pub fn put_str(&mut self, s: &str) -> CodecResult<()> {
        let len = s.len();
        if len > u16::MAX as usize {
            return Err(CodecError::payload_too_large(
                len,
                u16::MAX as usize,
                "string field length prefix",
            ));
        }
        self.buf.put_u16(len as u16);
        self.buf.put_slice(s.as_bytes());
        Ok(())
    }

    /// Raw fixed-size identifier, no prefix
    pub fn put_id(&mut self, id: &Id) {
        self.buf.put_slice(id.as_slice());
    }

    /// u32 length prefix + bytes
    pub fn put_var_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let len = bytes.len();
        if len > u32::MAX as usize {
            return Err(CodecError::payload_too_large(
                len,
                u32::MAX as usize,
                "byte-array field length prefix",
            ));
        }
        self.buf.put_u32(len as u32);
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// 16 IPv6 octets + big-endian port
    pub fn put_ip(&mut self, ip: &IpPort) {
        self.buf.put_slice(&ip.ipv6_octets());
        self.buf.put_u16(ip.port());
    }

    /// Certificate, address, timestamp, signature in that order
    pub fn put_peer_record(&mut self, record: &SignedPeerRecord) -> CodecResult<()> {
        self.put_var_bytes(&record.certificate)?;
        self.put_ip(&record.ip);
        self.put_u64(record.timestamp);
        self.put_var_bytes(&record.signature)
    }
}

/// Bounds-checked frame reader over a borrowed slice
pub(crate) struct FrameReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        FrameReader { buf, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    fn take(&mut self, n: usize, context: &str) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::truncated(n, self.remaining(), context));
        }
        let slice = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    pub fn u32(&mut self, context: &str) -> CodecResult<u32> {
        let bytes = self.take(4, context)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn u64(&mut self, context: &str) -> CodecResult<u64> {
        let bytes = self.take(8, context)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(array))
    }

    pub fn u16(&mut self, context: &str) -> CodecResult<u16> {
        let bytes = self.take(2, context)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn str(&mut self, context: &str) -> CodecResult<Vec<u8>> {
        let len = self.u16(context)? as usize;
        Ok(self.take(len, context)?.to_vec())
    }

    pub fn id(&mut self, context: &str) -> CodecResult<Id> {
        let bytes = self.take(Id::LEN, context)?;
        let mut array = [0u8; Id::LEN];
        array.copy_from_slice(bytes);
        Ok(Id::new(array))
    }

    pub fn var_bytes(&mut self, context: &str) -> CodecResult<Bytes> {
        let len = self.u32(context)? as usize;
        Ok(Bytes::copy_from_slice(self.take(len, context)?))
    }

    pub fn ip(&mut self, context: &str) -> CodecResult<IpPort> {
        let octet_slice = self.take(16, context)?;
        let mut octets = [0u8; 16];
        octets.copy_from_slice(octet_slice);
        let port = self.u16(context)?;
        Ok(IpPort::from_ipv6_octets(octets, port))
    }

    /// u32 count + raw fixed-size identifier runs
    pub fn id_list(&mut self, context: &str) -> CodecResult<Vec<Bytes>> {
        let count = self.u32(context)? as usize;
        // One bounds check for the whole run prevents count-driven overallocation.
        let run = self.take(count.saturating_mul(Id::LEN), context)?;
        Ok(run.chunks_exact(Id::LEN).map(Bytes::copy_from_slice).collect())
    }

    /// u32 count + u32-prefixed elements
    pub fn var_bytes_list(&mut self, context: &str) -> CodecResult<Vec<Bytes>> {
        let count = self.u32(context)? as usize;
        // Each element costs at least its 4-byte prefix; reject impossible counts
        // before allocating.
        if count > self.remaining() / 4 {
            return Err(CodecError::truncated(count * 4, self.remaining(), context));
        }
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.var_bytes(context)?);
        }
        Ok(elements)
    }

    /// u32 count + signed peer records
    pub fn peer_list(&mut self, context: &str) -> CodecResult<Vec<SignedPeerRecord>> {
        let count = self.u32(context)? as usize;
        // Minimum record size: cert prefix + ip + timestamp + signature prefix.
        let min_record = 4 + IP_WIRE_BYTES + 8 + 4;
        if count > self.remaining() / min_record {
            return Err(CodecError::truncated(
                count * min_record,
                self.remaining(),
                context,
            ));
        }
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let certificate = self.var_bytes(context)?.to_vec();
            let ip = self.ip(context)?;
            let timestamp = self.u64(context)?;
            let signature = self.var_bytes(context)?.to_vec();
            records.push(SignedPeerRecord::new(certificate, ip, timestamp, signature));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_scalar_roundtrip() {
        let mut writer = FrameWriter::new();
        writer.put_u32(0xDEAD_BEEF);
        writer.put_u64(42);
        writer.put_str("avalanche/1.0.0").unwrap();
        let bytes = writer.into_bytes();

        let mut reader = FrameReader::new(&bytes);
        assert_eq!(reader.u32("t").unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.u64("t").unwrap(), 42);
        assert_eq!(reader.str("t").unwrap(), b"avalanche/1.0.0");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_truncated_read_fails() {
        let mut writer = FrameWriter::new();
        writer.put_u32(7);
        let bytes = writer.into_bytes();

        let mut reader = FrameReader::new(&bytes);
        let err = reader.u64("deadline").unwrap_err();
        assert!(matches!(err, CodecError::TruncatedFrame { need: 8, got: 4, .. }));
    }

    #[test]
    fn test_id_list_roundtrip() {
        let a = Id::new([0x0A; Id::LEN]);
        let b = Id::new([0x0B; Id::LEN]);
        let mut writer = FrameWriter::new();
        writer.put_u32(2);
        writer.put_id(&a);
        writer.put_id(&b);
        let bytes = writer.into_bytes();

        let mut reader = FrameReader::new(&bytes);
        let list = reader.id_list("t").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(&list[0][..], a.as_slice());
        assert_eq!(&list[1][..], b.as_slice());
    }

    #[test]
    fn test_id_list_rejects_absurd_count() {
        // Count claims 2^31 identifiers but the frame holds none of them.
        let mut writer = FrameWriter::new();
        writer.put_u32(1 << 31);
        let bytes = writer.into_bytes();

        let mut reader = FrameReader::new(&bytes);
        assert!(reader.id_list("t").is_err());
    }

    #[test]
    fn test_var_bytes_list_rejects_absurd_count() {
        let mut writer = FrameWriter::new();
        writer.put_u32(u32::MAX);
        let bytes = writer.into_bytes();

        let mut reader = FrameReader::new(&bytes);
        assert!(reader.var_bytes_list("t").is_err());
    }

    #[test]
    fn test_peer_record_roundtrip() {
        let record = SignedPeerRecord::new(
            vec![1, 2, 3, 4],
            IpPort::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)), 9651),
            1_700_000_000,
            vec![0xFF; 64],
        );
        let mut writer = FrameWriter::new();
        writer.put_u32(1);
        writer.put_peer_record(&record).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = FrameReader::new(&bytes);
        let records = reader.peer_list("t").unwrap();
        assert_eq!(records, vec![record]);
        assert_eq!(reader.remaining(), 0);
    }
}
