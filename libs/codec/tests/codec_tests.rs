//! # Codec Integration Tests
//!
//! Exercises the pack/unpack contract end to end: round-trips, determinism,
//! the per-type compression policy, the rejection taxonomy, and byte-exact
//! frame fixtures.

use std::net::{IpAddr, Ipv4Addr};

use bytes::Bytes;
use codec::{
    Codec, CodecError, Field, FieldValue, FieldValues, Op, DEFAULT_MAX_MESSAGE_SIZE,
};
use codec::{Catalogue, ZstdCompressor};
use hex_literal::hex;
use types::{Id, IpPort};

fn chain_id() -> Id {
    let mut bytes = [0u8; Id::LEN];
    bytes[31] = 0x01;
    Id::new(bytes)
}

fn container_id() -> Id {
    let mut bytes = [0u8; Id::LEN];
    bytes[31] = 0x02;
    Id::new(bytes)
}

fn get_fields() -> FieldValues {
    let mut fields = FieldValues::new();
    fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));
    fields.insert(Field::RequestId, FieldValue::U32(42));
    fields.insert(Field::Deadline, FieldValue::U64(1000));
    fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id()));
    fields
}

fn version_fields(version: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    fields.insert(Field::NetworkId, FieldValue::U32(1337));
    fields.insert(Field::NodeId, FieldValue::U32(7));
    fields.insert(Field::MyTime, FieldValue::U64(1_700_000_000));
    fields.insert(
        Field::Ip,
        FieldValue::IpPort(IpPort::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 9651)),
    );
    fields.insert(Field::VersionStr, FieldValue::Str(version.to_owned()));
    fields.insert(Field::VersionTime, FieldValue::U64(1_650_000_000));
    fields.insert(Field::SigBytes, FieldValue::VarBytes(Bytes::from_static(&[0xAB; 4])));
    fields.insert(Field::TrackedSubnets, FieldValue::BytesList(vec![]));
    fields
}

#[test]
fn test_get_roundtrip_decodes_exact_fields() {
    let codec = Codec::v1();
    let outbound = codec.pack(Op::Get, get_fields(), false).unwrap();

    let inbound = codec.unpack(outbound.bytes()).unwrap();
    assert_eq!(inbound.op(), Op::Get);
    assert_eq!(inbound.id_field(Field::ChainId), Some(chain_id()));
    assert_eq!(inbound.u32_field(Field::RequestId), Some(42));
    assert_eq!(inbound.u64_field(Field::Deadline), Some(1000));
    assert_eq!(inbound.id_field(Field::ContainerId), Some(container_id()));
    assert_eq!(inbound.fields(), outbound.fields());
}

#[test]
fn test_get_frame_is_byte_exact() {
    let codec = Codec::v1();
    let outbound = codec.pack(Op::Get, get_fields(), false).unwrap();

    // [opcode 0x0c][chain 32B][request u32 BE][deadline u64 BE][container 32B]
    let mut expected = vec![0x0c];
    expected.extend_from_slice(&hex!(
        "0000000000000000000000000000000000000000000000000000000000000001"
    ));
    expected.extend_from_slice(&hex!("0000002a"));
    expected.extend_from_slice(&hex!("00000000000003e8"));
    expected.extend_from_slice(&hex!(
        "0000000000000000000000000000000000000000000000000000000000000002"
    ));
    assert_eq!(outbound.bytes(), expected.as_slice());
    assert_eq!(outbound.bytes().len(), 45);
}

#[test]
fn test_non_compressible_op_ignores_compress_request() {
    let codec = Codec::v1();
    // Get is declared non-compressible: asking for compression must be a no-op.
    let plain = codec.pack(Op::Get, get_fields(), false).unwrap();
    let requested = codec.pack(Op::Get, get_fields(), true).unwrap();

    assert!(!requested.is_compressed());
    assert_eq!(requested.bytes(), plain.bytes());
    assert_eq!(requested.bytes_saved_compression(), 0);
}

#[test]
fn test_pack_is_deterministic_regardless_of_insertion_order() {
    let codec = Codec::v1();

    let mut reversed = FieldValues::new();
    reversed.insert(Field::ContainerId, FieldValue::FixedBytes(container_id()));
    reversed.insert(Field::Deadline, FieldValue::U64(1000));
    reversed.insert(Field::RequestId, FieldValue::U32(42));
    reversed.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));

    let a = codec.pack(Op::Get, get_fields(), false).unwrap();
    let b = codec.pack(Op::Get, reversed, false).unwrap();
    assert_eq!(a.bytes(), b.bytes());
}

#[test]
fn test_id_list_order_is_significant_and_preserved() {
    let codec = Codec::v1();
    let a = Bytes::copy_from_slice(&[0xAA; Id::LEN]);
    let b = Bytes::copy_from_slice(&[0xBB; Id::LEN]);

    let mut forward = FieldValues::new();
    forward.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));
    forward.insert(Field::RequestId, FieldValue::U32(1));
    forward.insert(
        Field::ContainerIds,
        FieldValue::BytesList(vec![a.clone(), b.clone()]),
    );

    let mut backward = FieldValues::new();
    backward.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));
    backward.insert(Field::RequestId, FieldValue::U32(1));
    backward.insert(
        Field::ContainerIds,
        FieldValue::BytesList(vec![b.clone(), a.clone()]),
    );

    let fwd = codec.pack(Op::Accepted, forward, false).unwrap();
    let bwd = codec.pack(Op::Accepted, backward, false).unwrap();
    assert_ne!(fwd.bytes(), bwd.bytes());

    let fwd_in = codec.unpack(fwd.bytes()).unwrap();
    assert_eq!(
        fwd_in.bytes_list_field(Field::ContainerIds).unwrap(),
        &[a.clone(), b.clone()][..]
    );
    let bwd_in = codec.unpack(bwd.bytes()).unwrap();
    assert_eq!(bwd_in.bytes_list_field(Field::ContainerIds).unwrap(), &[b, a][..]);
}

#[test]
fn test_compressible_op_roundtrips_compressed_and_plain() {
    let codec = Codec::v1();
    let container = Bytes::from(vec![0x42u8; 16 * 1024]);

    let mut fields = FieldValues::new();
    fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));
    fields.insert(Field::RequestId, FieldValue::U32(9));
    fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id()));
    fields.insert(Field::ContainerBytes, FieldValue::VarBytes(container.clone()));

    let plain = codec.pack(Op::Put, fields.clone(), false).unwrap();
    assert!(!plain.is_compressed());
    // Flag byte present even when uncompressed for compressible ops.
    assert_eq!(plain.bytes()[1], 0);

    let packed = codec.pack(Op::Put, fields, true).unwrap();
    assert!(packed.is_compressed());
    assert_eq!(packed.bytes()[1], 1);
    assert!(packed.bytes().len() < plain.bytes().len());
    assert!(packed.bytes_saved_compression() > 0);

    for frame in [plain.bytes(), packed.bytes()] {
        let inbound = codec.unpack(frame).unwrap();
        assert_eq!(inbound.op(), Op::Put);
        assert_eq!(inbound.bytes_field(Field::ContainerBytes), Some(&container));
    }
}

#[test]
fn test_pack_rejects_missing_field() {
    let codec = Codec::v1();
    let mut fields = get_fields();
    // Drop Deadline by rebuilding without it.
    let mut incomplete = FieldValues::new();
    for (field, value) in fields.iter() {
        if field != Field::Deadline {
            incomplete.insert(field, value.clone());
        }
    }
    fields = incomplete;

    let err = codec.pack(Op::Get, fields, false).unwrap_err();
    assert!(matches!(err, CodecError::FieldSetMismatch { op: Op::Get, .. }));
}

#[test]
fn test_pack_rejects_extra_field() {
    let codec = Codec::v1();
    let mut fields = get_fields();
    fields.insert(Field::NodeId, FieldValue::U32(5));

    let err = codec.pack(Op::Get, fields, false).unwrap_err();
    assert!(matches!(err, CodecError::FieldSetMismatch { op: Op::Get, .. }));
}

#[test]
fn test_pack_rejects_wrong_tag() {
    let codec = Codec::v1();
    let mut fields = get_fields();
    fields.insert(Field::Deadline, FieldValue::U32(1000)); // u32 where u64 is declared

    let err = codec.pack(Op::Get, fields, false).unwrap_err();
    assert!(matches!(err, CodecError::FieldSetMismatch { op: Op::Get, .. }));
}

#[test]
fn test_pack_rejects_bad_list_element_length() {
    let codec = Codec::v1();
    let mut fields = FieldValues::new();
    fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));
    fields.insert(Field::RequestId, FieldValue::U32(1));
    fields.insert(
        Field::ContainerIds,
        FieldValue::BytesList(vec![Bytes::from_static(b"short")]),
    );

    let err = codec.pack(Op::Chits, fields, false).unwrap_err();
    assert!(matches!(err, CodecError::FieldSetMismatch { op: Op::Chits, .. }));
}

#[test]
fn test_unpack_rejects_unknown_opcode() {
    let codec = Codec::v1();
    let err = codec.unpack(&[0xEE, 0x00, 0x00]).unwrap_err();
    assert_eq!(err, CodecError::UnknownMessageType { opcode: 0xEE });
}

#[test]
fn test_unpack_rejects_empty_frame() {
    let codec = Codec::v1();
    assert!(matches!(
        codec.unpack(&[]).unwrap_err(),
        CodecError::TruncatedFrame { .. }
    ));
}

#[test]
fn test_unpack_rejects_truncated_mid_field() {
    let codec = Codec::v1();
    let outbound = codec.pack(Op::Get, get_fields(), false).unwrap();

    // Cut the frame inside the Deadline field.
    let err = codec.unpack(&outbound.bytes()[..40]).unwrap_err();
    assert!(matches!(err, CodecError::TruncatedFrame { .. }));
}

#[test]
fn test_unpack_rejects_trailing_bytes() {
    let codec = Codec::v1();
    let outbound = codec.pack(Op::Get, get_fields(), false).unwrap();

    let mut padded = outbound.bytes().to_vec();
    padded.push(0x00);
    let err = codec.unpack(&padded).unwrap_err();
    assert_eq!(err, CodecError::TrailingBytes { op: Op::Get, remaining: 1 });
}

#[test]
fn test_unpack_rejects_non_utf8_string() {
    let codec = Codec::v1();
    let outbound = codec
        .pack(Op::Version, version_fields("node/1.0.0"), false)
        .unwrap();

    // VersionStr bytes start after the opcode, NetworkId, NodeId, MyTime,
    // the 18-byte IP descriptor, and the u16 length prefix.
    let str_start = 1 + 4 + 4 + 8 + 18 + 2;
    let mut frame = outbound.bytes().to_vec();
    frame[str_start] = 0xFF; // never valid in UTF-8

    let err = codec.unpack(&frame).unwrap_err();
    assert!(matches!(
        err,
        CodecError::MalformedField { field: Field::VersionStr, .. }
    ));
}

#[test]
fn test_pack_rejects_string_over_prefix_limit() {
    let codec = Codec::v1();
    // 70,000 bytes cannot be described by the u16 string length prefix even
    // though the frame stays well under the 2 MiB cap.
    let err = codec
        .pack(Op::Version, version_fields(&"v".repeat(70_000)), false)
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::PayloadTooLarge { size: 70_000, limit: 65_535, .. }
    ));
}

#[test]
fn test_unpack_rejects_corrupt_compressed_payload() {
    let codec = Codec::v1();
    // Put frame claiming compression over garbage bytes.
    let frame = [Op::Put as u8, 1, 0xDE, 0xAD, 0xBE, 0xEF];
    let err = codec.unpack(&frame).unwrap_err();
    assert!(matches!(err, CodecError::DecompressionFailed { .. }));
}

#[test]
fn test_pack_rejects_oversized_payload() {
    let small = Codec::new(Catalogue::v1(), 128, Box::new(ZstdCompressor::default()));
    let container = Bytes::from(vec![0u8; 4096]);

    let mut fields = FieldValues::new();
    fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id()));
    fields.insert(Field::RequestId, FieldValue::U32(1));
    fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id()));
    fields.insert(Field::ContainerBytes, FieldValue::VarBytes(container));

    let err = small.pack(Op::Put, fields, false).unwrap_err();
    assert!(matches!(err, CodecError::PayloadTooLarge { .. }));
}

#[test]
fn test_default_size_cap_is_two_mib() {
    let codec = Codec::v1();
    assert_eq!(codec.max_message_size(), DEFAULT_MAX_MESSAGE_SIZE);
    assert_eq!(DEFAULT_MAX_MESSAGE_SIZE, 2 * 1024 * 1024);
}

#[test]
fn test_empty_field_ops_roundtrip() {
    let codec = Codec::v1();
    for op in [Op::GetVersion, Op::GetPeerList, Op::Ping, Op::Pong] {
        let outbound = codec.pack(op, FieldValues::new(), false).unwrap();
        assert_eq!(outbound.bytes().len(), 1);
        let inbound = codec.unpack(outbound.bytes()).unwrap();
        assert_eq!(inbound.op(), op);
        assert!(inbound.fields().is_empty());
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_id() -> impl Strategy<Value = Id> {
        any::<[u8; 32]>().prop_map(Id::new)
    }

    proptest! {
        #[test]
        fn prop_put_roundtrips(
            chain in arb_id(),
            container in arb_id(),
            request_id in any::<u32>(),
            payload in proptest::collection::vec(any::<u8>(), 0..2048),
            compress in any::<bool>(),
        ) {
            let codec = Codec::v1();
            let mut fields = FieldValues::new();
            fields.insert(Field::ChainId, FieldValue::FixedBytes(chain));
            fields.insert(Field::RequestId, FieldValue::U32(request_id));
            fields.insert(Field::ContainerId, FieldValue::FixedBytes(container));
            fields.insert(Field::ContainerBytes, FieldValue::VarBytes(Bytes::from(payload)));

            let outbound = codec.pack(Op::Put, fields.clone(), compress).unwrap();
            let inbound = codec.unpack(outbound.bytes()).unwrap();
            prop_assert_eq!(inbound.op(), Op::Put);
            prop_assert_eq!(inbound.fields(), &fields);
        }

        #[test]
        fn prop_chits_roundtrips(
            chain in arb_id(),
            request_id in any::<u32>(),
            ids in proptest::collection::vec(any::<[u8; 32]>(), 0..32),
        ) {
            let codec = Codec::v1();
            let list: Vec<Bytes> = ids.iter().map(|b| Bytes::copy_from_slice(b)).collect();
            let mut fields = FieldValues::new();
            fields.insert(Field::ChainId, FieldValue::FixedBytes(chain));
            fields.insert(Field::RequestId, FieldValue::U32(request_id));
            fields.insert(Field::ContainerIds, FieldValue::BytesList(list));

            let outbound = codec.pack(Op::Chits, fields.clone(), false).unwrap();
            let inbound = codec.unpack(outbound.bytes()).unwrap();
            prop_assert_eq!(inbound.fields(), &fields);
        }
    }
}
