//! # Message Catalogue - Opcode Registry
//!
//! ## Purpose
//!
//! The closed set of message types a node exchanges, keyed by opcode. Each
//! descriptor fixes the message's field list (which is also its on-wire
//! order) and whether its payload may be compressed. Two independent
//! implementations handed the same logical message must produce byte-identical
//! frames, so the declared order is the only order.
//!
//! Compressibility is a per-type capability declared here once, gated at pack
//! time by the caller's per-call request; both must hold for compression to
//! occur. Latency-sensitive control messages (pings, handshake probes) are
//! declared non-compressible so they never pay compression overhead.

use std::collections::HashMap;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use tracing::trace;

use crate::error::{CodecError, CodecResult};
use crate::fields::{Field, FieldRegistry};

/// Message opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum Op {
    // Handshake
    GetVersion = 0,
    Version = 1,
    GetPeerList = 2,
    PeerList = 3,

    // Liveness
    Ping = 4,
    Pong = 5,

    // Bootstrapping
    GetAcceptedFrontier = 6,
    AcceptedFrontier = 7,
    GetAccepted = 8,
    Accepted = 9,
    GetAncestors = 10,
    MultiPut = 11,

    // Consensus
    Get = 12,
    Put = 13,
    PushQuery = 14,
    PullQuery = 15,
    Chits = 16,

    // Application
    AppRequest = 17,
    AppResponse = 18,
    AppGossip = 19,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::GetVersion => "GetVersion",
            Op::Version => "Version",
            Op::GetPeerList => "GetPeerList",
            Op::PeerList => "PeerList",
            Op::Ping => "Ping",
            Op::Pong => "Pong",
            Op::GetAcceptedFrontier => "GetAcceptedFrontier",
            Op::AcceptedFrontier => "AcceptedFrontier",
            Op::GetAccepted => "GetAccepted",
            Op::Accepted => "Accepted",
            Op::GetAncestors => "GetAncestors",
            Op::MultiPut => "MultiPut",
            Op::Get => "Get",
            Op::Put => "Put",
            Op::PushQuery => "PushQuery",
            Op::PullQuery => "PullQuery",
            Op::Chits => "Chits",
            Op::AppRequest => "AppRequest",
            Op::AppResponse => "AppResponse",
            Op::AppGossip => "AppGossip",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One message type's shape: ordered field list and compression capability
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Fields in on-wire order
    pub fields: Vec<Field>,
    /// Whether the payload may be compressed when the caller asks for it
    pub compressible: bool,
}

impl Descriptor {
    fn new(fields: &[Field], compressible: bool) -> Self {
        Descriptor {
            fields: fields.to_vec(),
            compressible,
        }
    }
}

/// Immutable Op → Descriptor table plus the field registry for one protocol version
#[derive(Debug, Clone)]
pub struct Catalogue {
    registry: FieldRegistry,
    table: HashMap<Op, Descriptor>,
}

impl Catalogue {
    /// Build a catalogue, validating every descriptor field against the registry
    pub fn new(
        registry: FieldRegistry,
        entries: impl IntoIterator<Item = (Op, Descriptor)>,
    ) -> CodecResult<Self> {
        let table: HashMap<Op, Descriptor> = entries.into_iter().collect();
        for descriptor in table.values() {
            for &field in &descriptor.fields {
                if !registry.contains(field) {
                    return Err(CodecError::UnknownField { field });
                }
            }
        }
        trace!(ops = table.len(), "message catalogue built");
        Ok(Catalogue { registry, table })
    }

    /// The v1 catalogue, covering all twenty message types
    pub fn v1() -> Self {
        use Field::*;
        let entries = [
            (Op::GetVersion, Descriptor::new(&[], false)),
            (
                Op::Version,
                Descriptor::new(
                    &[
                        NetworkId,
                        NodeId,
                        MyTime,
                        Ip,
                        VersionStr,
                        VersionTime,
                        SigBytes,
                        TrackedSubnets,
                    ],
                    false,
                ),
            ),
            (Op::GetPeerList, Descriptor::new(&[], false)),
            (Op::PeerList, Descriptor::new(&[SignedPeers], true)),
            (Op::Ping, Descriptor::new(&[], false)),
            (Op::Pong, Descriptor::new(&[], false)),
            (
                Op::GetAcceptedFrontier,
                Descriptor::new(&[ChainId, RequestId, Deadline], false),
            ),
            (
                Op::AcceptedFrontier,
                Descriptor::new(&[ChainId, RequestId, ContainerIds], false),
            ),
            (
                Op::GetAccepted,
                Descriptor::new(&[ChainId, RequestId, Deadline, ContainerIds], false),
            ),
            (
                Op::Accepted,
                Descriptor::new(&[ChainId, RequestId, ContainerIds], false),
            ),
            (
                Op::GetAncestors,
                Descriptor::new(&[ChainId, RequestId, Deadline, ContainerId], false),
            ),
            (
                Op::MultiPut,
                Descriptor::new(&[ChainId, RequestId, MultiContainerBytes], true),
            ),
            (
                Op::Get,
                Descriptor::new(&[ChainId, RequestId, Deadline, ContainerId], false),
            ),
            (
                Op::Put,
                Descriptor::new(&[ChainId, RequestId, ContainerId, ContainerBytes], true),
            ),
            (
                Op::PushQuery,
                Descriptor::new(
                    &[ChainId, RequestId, Deadline, ContainerId, ContainerBytes],
                    true,
                ),
            ),
            (
                Op::PullQuery,
                Descriptor::new(&[ChainId, RequestId, Deadline, ContainerId], false),
            ),
            (
                Op::Chits,
                Descriptor::new(&[ChainId, RequestId, ContainerIds], false),
            ),
            (
                Op::AppRequest,
                Descriptor::new(&[ChainId, RequestId, Deadline, AppRequestBytes], true),
            ),
            (
                Op::AppResponse,
                Descriptor::new(&[ChainId, RequestId, AppResponseBytes], true),
            ),
            (Op::AppGossip, Descriptor::new(&[ChainId, AppGossipBytes], true)),
        ];
        Catalogue::new(FieldRegistry::v1(), entries)
            .expect("v1 catalogue fields are all declared in the v1 registry")
    }

    /// Descriptor for an opcode, failing for ops this version does not carry
    pub fn descriptor_of(&self, op: Op) -> CodecResult<&Descriptor> {
        self.table.get(&op).ok_or(CodecError::UnknownMessageType {
            opcode: op.into(),
        })
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }
}
