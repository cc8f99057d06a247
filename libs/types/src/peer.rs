//! # Signed Peer Record
//!
//! A peer's self-reported reachability claim as gossiped in peer-list
//! exchange: the peer's TLS certificate, the address it claims, when the
//! claim was signed, and the signature over claim and time. This layer only
//! transports the record; the handshake layer verifies the signature.

use serde::{Deserialize, Serialize};

use crate::ip::IpPort;

/// A gossiped peer claim: certificate, address, signing time, signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPeerRecord {
    /// DER-encoded TLS certificate of the peer
    pub certificate: Vec<u8>,
    /// Address the peer claims to be reachable at
    pub ip: IpPort,
    /// Unix time (seconds) the claim was signed
    pub timestamp: u64,
    /// Signature over the address and timestamp, made with the certificate's key
    pub signature: Vec<u8>,
}

impl SignedPeerRecord {
    pub fn new(certificate: Vec<u8>, ip: IpPort, timestamp: u64, signature: Vec<u8>) -> Self {
        SignedPeerRecord {
            certificate,
            ip,
            timestamp,
            signature,
        }
    }
}
