//! # Recoverable ECDSA Signatures (secp256k1)
//!
//! Compact 65-byte signatures from which the signer's public key can be
//! recovered. A verifier never needs the key supplied alongside the
//! signature: it recovers one and compares key identities.
//!
//! ## Compact Format
//!
//! `header || r || s` where `header = 27 + recovery_id + (4 if compressed)`.
//! The compressed flag decides which public key serialization the recovered
//! key identity is computed over.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization on signing; high-S signatures fail recovery
//! - Secret key bytes handed out are wrapped in `Zeroizing`

use crate::hashing::hash160;
use crate::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Hash, KeyId};
use std::fmt;
use zeroize::Zeroizing;

/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Length of a compact recoverable signature.
pub const COMPACT_SIGNATURE_SIZE: usize = 65;

const HEADER_BASE: u8 = 27;
const HEADER_COMPRESSED: u8 = 4;

/// Compressed secp256k1 public key (33 bytes).
///
/// Holds raw bytes as received from the wire. Whether the bytes are a point
/// on the curve is a separate question answered by [`is_fully_valid`]; a
/// record carrying an invalid key must still decode so validation can reject it.
///
/// [`is_fully_valid`]: Secp256k1PublicKey::is_fully_valid
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Secp256k1PublicKey([u8; COMPRESSED_PUBLIC_KEY_SIZE]);

impl Secp256k1PublicKey {
    /// Create from compressed bytes, rejecting anything that is not a curve point.
    pub fn from_bytes(bytes: [u8; COMPRESSED_PUBLIC_KEY_SIZE]) -> Result<Self, CryptoError> {
        let key = Self(bytes);
        if !key.is_fully_valid() {
            return Err(CryptoError::InvalidPublicKey);
        }
        Ok(key)
    }

    /// Wrap raw bytes without checking them.
    pub fn from_raw(bytes: [u8; COMPRESSED_PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// True if the leading byte is a compressed-point tag (0x02 or 0x03).
    ///
    /// Says nothing about whether the x coordinate is on the curve.
    pub fn has_compressed_prefix(&self) -> bool {
        matches!(self.0[0], 0x02 | 0x03)
    }

    /// True if the bytes are a compressed SEC1 point on secp256k1.
    ///
    /// Other 33-byte SEC1 forms (the 0x05 compact tag) are rejected so each
    /// point has exactly one identity encoding.
    pub fn is_fully_valid(&self) -> bool {
        self.has_compressed_prefix() && VerifyingKey::from_sec1_bytes(&self.0).is_ok()
    }

    /// Key identity: `hash160` of the compressed encoding.
    pub fn key_id(&self) -> KeyId {
        hash160(&self.0)
    }
}

impl Default for Secp256k1PublicKey {
    fn default() -> Self {
        Self([0u8; COMPRESSED_PUBLIC_KEY_SIZE])
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey(")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Compact recoverable signature (65 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompactSignature([u8; COMPACT_SIGNATURE_SIZE]);

impl CompactSignature {
    /// Create from exactly 65 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; COMPACT_SIGNATURE_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSignatureLength {
                    expected: COMPACT_SIGNATURE_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; COMPACT_SIGNATURE_SIZE] {
        &self.0
    }

    /// Copy into an owned byte vector (the form records store).
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Recover the signer of `hash`.
    pub fn recover(&self, hash: &Hash) -> Result<RecoveredKey, CryptoError> {
        let header = self.0[0];
        if !(HEADER_BASE..HEADER_BASE + 8).contains(&header) {
            return Err(CryptoError::InvalidRecoveryHeader(header));
        }
        let flags = header - HEADER_BASE;
        let compressed = flags & HEADER_COMPRESSED != 0;
        let recovery_id =
            RecoveryId::try_from(flags & 3).map_err(|_| CryptoError::InvalidRecoveryHeader(header))?;

        let sig =
            Signature::from_slice(&self.0[1..]).map_err(|_| CryptoError::InvalidSignatureFormat)?;

        let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
            .map_err(|_| CryptoError::RecoveryFailed)?;

        Ok(RecoveredKey { key, compressed })
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature(header={})", self.0[0])
    }
}

/// Recover the signer of `hash` from raw compact signature bytes.
///
/// Fails on anything other than a well-formed 65-byte signature that
/// recovers to a valid key.
pub fn recover_compact(hash: &Hash, signature: &[u8]) -> Result<RecoveredKey, CryptoError> {
    CompactSignature::from_slice(signature)?.recover(hash)
}

/// A public key recovered from a compact signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredKey {
    key: VerifyingKey,
    compressed: bool,
}

impl RecoveredKey {
    /// Whether the signer flagged its key as compressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The key serialized the way the signer flagged it (33 or 65 bytes).
    pub fn serialize(&self) -> Vec<u8> {
        self.key.to_encoded_point(self.compressed).as_bytes().to_vec()
    }

    /// Key identity over the flagged serialization.
    pub fn key_id(&self) -> KeyId {
        hash160(&self.serialize())
    }

}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
    compressed: bool,
}

impl Secp256k1KeyPair {
    /// Generate random keypair using compressed public keys.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
            compressed: true,
        }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self {
            signing_key,
            compressed: true,
        })
    }

    /// Switch between compressed and uncompressed public key identity.
    pub fn with_compression(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Whether signatures from this key flag a compressed public key.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        let mut bytes = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(self.signing_key.verifying_key().to_encoded_point(true).as_bytes());
        Secp256k1PublicKey(bytes)
    }

    /// Key identity matching what signature recovery yields for this key.
    pub fn key_id(&self) -> KeyId {
        let point = self
            .signing_key
            .verifying_key()
            .to_encoded_point(self.compressed);
        hash160(point.as_bytes())
    }

    /// Produce a compact recoverable signature over a 32-byte hash.
    pub fn sign_compact(&self, hash: &Hash) -> Result<CompactSignature, CryptoError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|_| CryptoError::SigningFailed)?;

        let mut out = [0u8; COMPACT_SIGNATURE_SIZE];
        out[0] = HEADER_BASE
            + recovery_id.to_byte()
            + if self.compressed { HEADER_COMPRESSED } else { 0 };
        out[1..].copy_from_slice(&sig.to_bytes());
        Ok(CompactSignature(out))
    }

    /// Get secret key bytes.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }
}

impl fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key())
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}
