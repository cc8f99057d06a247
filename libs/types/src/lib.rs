//! # Shared Wire-Layer Types
//!
//! ## Purpose
//!
//! Pure data types shared between the wire-message codec and its consumers
//! (bootstrap, consensus, transport). This crate carries no protocol logic:
//! how these values are laid out on the wire is the codec crate's business.
//!
//! ## What This Crate Contains
//! - [`Id`]: the 32-byte identifier used for chains, containers, and subnets
//! - [`IpPort`]: an IP address + port descriptor
//! - [`SignedPeerRecord`]: a gossiped peer claim (certificate, IP, time, signature)
//!
//! ## What This Crate Does NOT Contain
//! - Message encoding/decoding (belongs in `codec`)
//! - Socket management or connection handling
//! - Certificate or signature verification (belongs in the handshake layer)

pub mod id;
pub mod ip;
pub mod peer;

pub use id::{Id, IdError};
pub use ip::IpPort;
pub use peer::SignedPeerRecord;
