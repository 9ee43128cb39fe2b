//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes are not a point on secp256k1
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Private key bytes are zero or not below the curve order
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Compact signature has the wrong length
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Compact signature header byte outside 27..=34
    #[error("Invalid recovery header: {0}")]
    InvalidRecoveryHeader(u8),

    /// r or s is not a valid scalar
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// No public key could be recovered from the signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Signing failed
    #[error("Signing failed")]
    SigningFailed,
}
