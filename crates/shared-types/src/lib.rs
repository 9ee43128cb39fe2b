//! # Shared Types Crate
//!
//! Chain primitives consumed by the service-node protocol crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hashes, outpoints and transactions are defined
//!   once here and reused by every crate.
//! - **Canonical Encoding**: `encoding` is both the wire format and the
//!   preimage format for every signed hash.

pub mod encoding;
pub mod entities;

pub use encoding::{
    write_compact_size, write_var_bytes, write_var_string, write_vec, CodecError, WireDecode,
    WireEncode, WireReader, MAX_VECTOR_LEN, OUTPOINT_SIZE,
};
pub use entities::*;
