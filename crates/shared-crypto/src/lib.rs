//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256d, RIPEMD160∘SHA-256 | Sighashes, key identities |
//! | `ecdsa` | secp256k1 compact recoverable | Record signing, signer recovery |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization
//! - **Recovery**: signer identity derived from the signature itself

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{
    recover_compact, CompactSignature, RecoveredKey, Secp256k1KeyPair, Secp256k1PublicKey,
    COMPACT_SIGNATURE_SIZE, COMPRESSED_PUBLIC_KEY_SIZE,
};
pub use errors::CryptoError;
pub use hashing::{hash160, sha256, sha256d};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
