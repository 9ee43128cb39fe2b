//! # Hashing
//!
//! SHA-256 based digests used for signing preimages and key identities.
//!
//! | Function | Output | Use Case |
//! |----------|--------|----------|
//! | `sha256d` | 32 bytes | Sighashes, record identity hashes, txids |
//! | `hash160` | 20 bytes | Key identities, script identities |

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use shared_types::{Hash, KeyId};

/// SHA-256 of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Double SHA-256: `sha256(sha256(data))`.
#[inline]
pub fn sha256d(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}

/// `RIPEMD160(SHA256(data))`.
#[inline]
pub fn hash160(data: &[u8]) -> KeyId {
    Ripemd160::digest(sha256(data)).into()
}
