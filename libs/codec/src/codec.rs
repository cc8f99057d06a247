//! # Frame Codec - Pack and Unpack
//!
//! ## Purpose
//!
//! Turns a (message type, field→value mapping) pair into a byte frame and
//! back. Packing validates the field set against the catalogue, serializes in
//! declared order, and optionally compresses; unpacking reverses every step
//! and is total: any byte stream either decodes to the identical logical
//! message or fails with a typed error, never with partial state.
//!
//! Frame layout: `[opcode][flag byte, compressible ops only][payload]`.
//! The flag byte is written only for message types the catalogue marks
//! compressible, so small control messages carry zero compression overhead.
//!
//! ## Concurrency
//!
//! A `Codec` is immutable after construction. `pack` and `unpack` share no
//! mutable state across calls and are safe for unsynchronized concurrent use.

use crate::compression::{Compressor, ZstdCompressor};
use crate::constants::DEFAULT_MAX_MESSAGE_SIZE;
use crate::error::{CodecError, CodecResult};
use crate::fields::{Field, FieldValue, FieldValues, WireType};
use crate::message::{InboundMessage, OutboundMessage};
use crate::ops::{Catalogue, Op};
use crate::wire::{FrameReader, FrameWriter};

use types::Id;

/// Stateless frame encoder/decoder for one protocol version
pub struct Codec {
    catalogue: Catalogue,
    compressor: Box<dyn Compressor>,
    max_message_size: usize,
}

impl Codec {
    /// Build a codec over an explicit catalogue, size cap, and compressor
    pub fn new(
        catalogue: Catalogue,
        max_message_size: usize,
        compressor: Box<dyn Compressor>,
    ) -> Self {
        Codec {
            catalogue,
            compressor,
            max_message_size,
        }
    }

    /// The v1 codec: v1 catalogue, 2 MiB cap, default zstd compressor
    pub fn v1() -> Self {
        Codec::new(
            Catalogue::v1(),
            DEFAULT_MAX_MESSAGE_SIZE,
            Box::new(ZstdCompressor::default()),
        )
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Encode a message, compressing when both the catalogue capability and
    /// the caller's request allow it
    pub fn pack(
        &self,
        op: Op,
        fields: FieldValues,
        want_compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let descriptor = self.catalogue.descriptor_of(op)?;
        let registry = self.catalogue.registry();

        // Exact field set: every required field present with a matching tag,
        // nothing extra. Validated in full before any serialization.
        for &field in &descriptor.fields {
            let value = fields
                .get(field)
                .ok_or_else(|| CodecError::missing_field(op, field))?;
            let wire = registry.wire_type_of(field)?;
            if !value.matches(wire) {
                return Err(CodecError::wrong_tag(op, field, wire.name(), value.tag_name()));
            }
        }
        if fields.len() != descriptor.fields.len() {
            for (field, _) in fields.iter() {
                if !descriptor.fields.contains(&field) {
                    return Err(CodecError::extra_field(op, field));
                }
            }
        }

        let mut payload = FrameWriter::new();
        for &field in &descriptor.fields {
            let wire = registry.wire_type_of(field)?;
            // Presence was validated above.
            let value = fields
                .get(field)
                .ok_or_else(|| CodecError::missing_field(op, field))?;
            write_value(&mut payload, op, field, wire, value)?;
        }
        let payload = payload.into_bytes();

        let flag_len = usize::from(descriptor.compressible);
        let uncompressed_len = 1 + flag_len + payload.len();
        if uncompressed_len > self.max_message_size {
            return Err(CodecError::payload_too_large(
                uncompressed_len,
                self.max_message_size,
                format!("uncompressed {op} frame"),
            ));
        }

        // Compression needs both the per-type capability and the per-call
        // request; non-compressible types ignore the caller's preference.
        let compress = want_compress && descriptor.compressible;

        let mut frame = FrameWriter::new();
        frame.put_u8(op.into());
        let mut bytes_saved = 0i64;
        if descriptor.compressible {
            frame.put_u8(u8::from(compress));
        }
        if compress {
            let compressed = self.compressor.compress(&payload)?;
            bytes_saved = payload.len() as i64 - compressed.len() as i64;
            frame.put_slice(&compressed);
        } else {
            frame.put_slice(&payload);
        }

        let frame_len = frame.len();
        if frame_len > self.max_message_size {
            return Err(CodecError::payload_too_large(
                frame_len,
                self.max_message_size,
                format!("encoded {op} frame"),
            ));
        }

        Ok(OutboundMessage::new(
            op,
            frame.into_bytes(),
            fields,
            compress,
            bytes_saved,
        ))
    }

    /// Decode a frame received from a peer
    pub fn unpack(&self, frame: &[u8]) -> CodecResult<InboundMessage> {
        let (&raw_op, rest) = frame
            .split_first()
            .ok_or_else(|| CodecError::truncated(1, 0, "opcode"))?;
        let op = Op::try_from(raw_op)
            .map_err(|_| CodecError::UnknownMessageType { opcode: raw_op })?;
        let descriptor = self.catalogue.descriptor_of(op)?;
        let registry = self.catalogue.registry();

        let (compressed, body) = if descriptor.compressible {
            let (&flag, body) = rest
                .split_first()
                .ok_or_else(|| CodecError::truncated(1, 0, "compression flag"))?;
            // Any nonzero flag value counts as set.
            (flag != 0, body)
        } else {
            (false, rest)
        };

        let decompressed;
        let payload: &[u8] = if compressed {
            decompressed = self.compressor.decompress(body, self.max_message_size)?;
            &decompressed
        } else {
            body
        };

        let mut reader = FrameReader::new(payload);
        let mut fields = FieldValues::with_capacity(descriptor.fields.len());
        for &field in &descriptor.fields {
            let wire = registry.wire_type_of(field)?;
            let value = read_value(&mut reader, field, wire)?;
            fields.insert(field, value);
        }

        let remaining = reader.remaining();
        if remaining > 0 {
            return Err(CodecError::TrailingBytes { op, remaining });
        }

        Ok(InboundMessage::new(op, fields, compressed, frame.len()))
    }
}

/// Serialize one field value under its declared wire type
fn write_value(
    writer: &mut FrameWriter,
    op: Op,
    field: Field,
    wire: WireType,
    value: &FieldValue,
) -> CodecResult<()> {
    match (wire, value) {
        (WireType::U32, FieldValue::U32(v)) => {
            writer.put_u32(*v);
            Ok(())
        }
        (WireType::U64, FieldValue::U64(v)) => {
            writer.put_u64(*v);
            Ok(())
        }
        (WireType::Str, FieldValue::Str(v)) => writer.put_str(v),
        (WireType::FixedBytes, FieldValue::FixedBytes(v)) => {
            writer.put_id(v);
            Ok(())
        }
        (WireType::VarBytes, FieldValue::VarBytes(v)) => writer.put_var_bytes(v),
        (WireType::FixedBytesList, FieldValue::BytesList(list)) => {
            for element in list {
                if element.len() != Id::LEN {
                    return Err(CodecError::bad_list_element(op, field, Id::LEN, element.len()));
                }
            }
            writer.put_u32(list.len() as u32);
            for element in list {
                writer.put_slice(element);
            }
            Ok(())
        }
        (WireType::VarBytesList, FieldValue::BytesList(list)) => {
            writer.put_u32(list.len() as u32);
            for element in list {
                writer.put_var_bytes(element)?;
            }
            Ok(())
        }
        (WireType::IpPort, FieldValue::IpPort(v)) => {
            writer.put_ip(v);
            Ok(())
        }
        (WireType::SignedPeerList, FieldValue::SignedPeerList(records)) => {
            writer.put_u32(records.len() as u32);
            for record in records {
                writer.put_peer_record(record)?;
            }
            Ok(())
        }
        // Tags were validated before serialization began.
        _ => Err(CodecError::wrong_tag(op, field, wire.name(), value.tag_name())),
    }
}

/// Deserialize one field value under its declared wire type
fn read_value(reader: &mut FrameReader<'_>, field: Field, wire: WireType) -> CodecResult<FieldValue> {
    let context = format!("field {field:?}");
    match wire {
        WireType::U32 => Ok(FieldValue::U32(reader.u32(&context)?)),
        WireType::U64 => Ok(FieldValue::U64(reader.u64(&context)?)),
        WireType::Str => {
            let bytes = reader.str(&context)?;
            let text = String::from_utf8(bytes).map_err(|e| CodecError::MalformedField {
                field,
                context: format!("string is not valid UTF-8: {e}"),
            })?;
            Ok(FieldValue::Str(text))
        }
        WireType::FixedBytes => Ok(FieldValue::FixedBytes(reader.id(&context)?)),
        WireType::VarBytes => Ok(FieldValue::VarBytes(reader.var_bytes(&context)?)),
        WireType::FixedBytesList => Ok(FieldValue::BytesList(reader.id_list(&context)?)),
        WireType::VarBytesList => Ok(FieldValue::BytesList(reader.var_bytes_list(&context)?)),
        WireType::IpPort => Ok(FieldValue::IpPort(reader.ip(&context)?)),
        WireType::SignedPeerList => Ok(FieldValue::SignedPeerList(reader.peer_list(&context)?)),
    }
}
