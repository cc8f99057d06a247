//! Builds a handful of messages and decodes them again, logging what happens
//! on the wire. Run with `RUST_LOG=trace` to see catalogue construction.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use bytes::Bytes;
use codec::{Builder, Codec, Field};
use tracing::info;
use types::{Id, IpPort};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let builder = Builder::new(Arc::new(Codec::v1()));
    let chain = Id::new([0x01; Id::LEN]);

    let ping = builder.ping().expect("ping packs");
    info!(op = %ping.op(), len = ping.len(), "control message");

    let version = builder
        .version(
            1337,
            7,
            1_700_000_000,
            IpPort::new(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)), 9651),
            "node/1.2.3",
            1_650_000_000,
            &[0xAB; 64],
            &[Id::new([0x51; Id::LEN])],
        )
        .expect("version packs");
    info!(op = %version.op(), len = version.len(), "handshake message");

    let gossip = builder
        .app_gossip(chain, Bytes::from(vec![0x42u8; 8 * 1024]), true)
        .expect("gossip packs");
    info!(
        op = %gossip.op(),
        len = gossip.len(),
        compressed = gossip.is_compressed(),
        saved = gossip.bytes_saved_compression(),
        "bulk message"
    );

    let inbound = builder.codec().unpack(gossip.bytes()).expect("gossip decodes");
    let payload = inbound
        .bytes_field(Field::AppGossipBytes)
        .expect("gossip payload present");
    info!(op = %inbound.op(), payload_len = payload.len(), "decoded");
}
