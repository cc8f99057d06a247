//! # Message Builder - One Constructor Per Message Type
//!
//! ## Purpose
//!
//! The typed construction surface consumed by the handshake, bootstrap,
//! consensus, and application-gossip layers. Each method accepts domain
//! arguments, performs only the shape transformation the wire types need
//! (flattening identifier lists into byte arrays, preserving order), and
//! hands the codec exactly the field set the catalogue prescribes.
//!
//! The builder holds no state beyond its codec handle, never blocks, never
//! performs I/O, and introduces no error kinds of its own; codec errors pass
//! through unchanged. What message may legally follow what is the calling
//! engine's business, not this layer's.

use std::sync::Arc;

use bytes::Bytes;
use types::{Id, IpPort, SignedPeerRecord};

use crate::codec::Codec;
use crate::error::CodecResult;
use crate::fields::{Field, FieldValue, FieldValues};
use crate::message::OutboundMessage;
use crate::ops::Op;

/// Flatten an identifier slice into byte-array list form, preserving order
///
/// Order is significant: responses are positionally correlated with requests.
fn id_list(ids: &[Id]) -> FieldValue {
    FieldValue::BytesList(
        ids.iter()
            .map(|id| Bytes::copy_from_slice(id.as_slice()))
            .collect(),
    )
}

/// Per-type message constructors over a shared codec
#[derive(Clone)]
pub struct Builder {
    codec: Arc<Codec>,
}

impl Builder {
    pub fn new(codec: Arc<Codec>) -> Self {
        Builder { codec }
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn get_version(&self) -> CodecResult<OutboundMessage> {
        self.codec.pack(Op::GetVersion, FieldValues::new(), false)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn version(
        &self,
        network_id: u32,
        node_id: u32,
        my_time: u64,
        ip: IpPort,
        my_version: &str,
        my_version_time: u64,
        sig: &[u8],
        tracked_subnets: &[Id],
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(8);
        fields.insert(Field::NetworkId, FieldValue::U32(network_id));
        fields.insert(Field::NodeId, FieldValue::U32(node_id));
        fields.insert(Field::MyTime, FieldValue::U64(my_time));
        fields.insert(Field::Ip, FieldValue::IpPort(ip));
        fields.insert(Field::VersionStr, FieldValue::Str(my_version.to_owned()));
        fields.insert(Field::VersionTime, FieldValue::U64(my_version_time));
        fields.insert(Field::SigBytes, FieldValue::VarBytes(Bytes::copy_from_slice(sig)));
        fields.insert(Field::TrackedSubnets, id_list(tracked_subnets));
        self.codec.pack(Op::Version, fields, false)
    }

    pub fn get_peer_list(&self) -> CodecResult<OutboundMessage> {
        self.codec.pack(Op::GetPeerList, FieldValues::new(), false)
    }

    pub fn peer_list(
        &self,
        peers: Vec<SignedPeerRecord>,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(1);
        fields.insert(Field::SignedPeers, FieldValue::SignedPeerList(peers));
        self.codec.pack(Op::PeerList, fields, compress)
    }

    pub fn ping(&self) -> CodecResult<OutboundMessage> {
        self.codec.pack(Op::Ping, FieldValues::new(), false)
    }

    pub fn pong(&self) -> CodecResult<OutboundMessage> {
        self.codec.pack(Op::Pong, FieldValues::new(), false)
    }

    pub fn get_accepted_frontier(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(3);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        self.codec.pack(Op::GetAcceptedFrontier, fields, false)
    }

    pub fn accepted_frontier(
        &self,
        chain_id: Id,
        request_id: u32,
        container_ids: &[Id],
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(3);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::ContainerIds, id_list(container_ids));
        self.codec.pack(Op::AcceptedFrontier, fields, false)
    }

    pub fn get_accepted(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
        container_ids: &[Id],
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(4);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        fields.insert(Field::ContainerIds, id_list(container_ids));
        self.codec.pack(Op::GetAccepted, fields, false)
    }

    pub fn accepted(
        &self,
        chain_id: Id,
        request_id: u32,
        container_ids: &[Id],
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(3);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::ContainerIds, id_list(container_ids));
        self.codec.pack(Op::Accepted, fields, false)
    }

    pub fn get_ancestors(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
        container_id: Id,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(4);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id));
        self.codec.pack(Op::GetAncestors, fields, false)
    }

    pub fn multi_put(
        &self,
        chain_id: Id,
        request_id: u32,
        containers: Vec<Bytes>,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(3);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::MultiContainerBytes, FieldValue::BytesList(containers));
        self.codec.pack(Op::MultiPut, fields, compress)
    }

    pub fn get(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
        container_id: Id,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(4);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id));
        self.codec.pack(Op::Get, fields, false)
    }

    pub fn put(
        &self,
        chain_id: Id,
        request_id: u32,
        container_id: Id,
        container: Bytes,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(4);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id));
        fields.insert(Field::ContainerBytes, FieldValue::VarBytes(container));
        self.codec.pack(Op::Put, fields, compress)
    }

    pub fn push_query(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
        container_id: Id,
        container: Bytes,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(5);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id));
        fields.insert(Field::ContainerBytes, FieldValue::VarBytes(container));
        self.codec.pack(Op::PushQuery, fields, compress)
    }

    pub fn pull_query(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
        container_id: Id,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(4);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        fields.insert(Field::ContainerId, FieldValue::FixedBytes(container_id));
        self.codec.pack(Op::PullQuery, fields, false)
    }

    pub fn chits(
        &self,
        chain_id: Id,
        request_id: u32,
        container_ids: &[Id],
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(3);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::ContainerIds, id_list(container_ids));
        self.codec.pack(Op::Chits, fields, false)
    }

    pub fn app_request(
        &self,
        chain_id: Id,
        request_id: u32,
        deadline: u64,
        msg: Bytes,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(4);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::Deadline, FieldValue::U64(deadline));
        fields.insert(Field::AppRequestBytes, FieldValue::VarBytes(msg));
        self.codec.pack(Op::AppRequest, fields, compress)
    }

    pub fn app_response(
        &self,
        chain_id: Id,
        request_id: u32,
        msg: Bytes,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(3);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::RequestId, FieldValue::U32(request_id));
        fields.insert(Field::AppResponseBytes, FieldValue::VarBytes(msg));
        self.codec.pack(Op::AppResponse, fields, compress)
    }

    pub fn app_gossip(
        &self,
        chain_id: Id,
        msg: Bytes,
        compress: bool,
    ) -> CodecResult<OutboundMessage> {
        let mut fields = FieldValues::with_capacity(2);
        fields.insert(Field::ChainId, FieldValue::FixedBytes(chain_id));
        fields.insert(Field::AppGossipBytes, FieldValue::VarBytes(msg));
        self.codec.pack(Op::AppGossip, fields, compress)
    }
}
