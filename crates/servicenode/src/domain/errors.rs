//! # Rejection Reasons
//!
//! Why a registration or ping failed validation. The public contract is a
//! single accept/reject bit; these variants exist so callers and tests can
//! tell the causes apart.

use shared_types::{Amount, OutPoint};
use thiserror::Error;

/// Cause of a validation failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectReason {
    /// Anchor is unknown, on another chain, stale or too far ahead
    #[error("Stale or unknown anchor at height {height}")]
    StaleOrUnknownAnchor { height: u32 },

    /// Identity key is not a point on the curve
    #[error("Invalid identity key")]
    InvalidKey,

    /// No key could be recovered from the signature
    #[error("Bad signature")]
    BadSignature,

    /// Recovered key does not match the required signer
    #[error("Signer mismatch")]
    SignerMismatch,

    /// Paid tier without a payment key hash
    #[error("Missing payment key hash")]
    MissingPaymentKeyHash,

    /// Paid tier with no collateral, or more than allowed
    #[error("Collateral count {count} outside 1..={max}")]
    EmptyOrExcessiveCollateral { count: usize, max: usize },

    /// The same outpoint appears more than once
    #[error("Duplicate collateral: {0:?}")]
    DuplicateCollateral(OutPoint),

    /// Lookup returned nothing: unknown, spent, or conflicting
    #[error("Unresolvable or spent collateral: {0:?}")]
    UnresolvableOrSpentCollateral(OutPoint),

    /// Outpoint index beyond the funding transaction's outputs
    #[error("Collateral output index out of range: {0:?}")]
    CollateralIndexOutOfRange(OutPoint),

    /// Collateral is not payable to the recovered stake owner
    #[error("Collateral destination mismatch: {0:?}")]
    DestinationMismatch(OutPoint),

    /// Aggregate collateral below the tier minimum
    #[error("Insufficient stake: {total} < {required}")]
    InsufficientStake { total: Amount, required: Amount },

    /// Tier byte with no policy
    #[error("Unrecognized tier: {0}")]
    UnrecognizedTier(u8),

    /// Ping config lacks a positive leading protocol version
    #[error("Malformed config: {0}")]
    MalformedConfig(#[from] ConfigError),

    /// Ping key differs from the embedded registration's key
    #[error("Ping identity does not match embedded service node")]
    IdentityMismatch,
}

/// Errors parsing a capability config string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Config string has no tokens
    #[error("empty config")]
    Empty,

    /// Leading token is not an unsigned integer
    #[error("invalid protocol version: {0:?}")]
    InvalidProtocolVersion(String),

    /// Protocol version must be at least 1
    #[error("protocol version must be positive")]
    NonPositiveProtocolVersion,
}
