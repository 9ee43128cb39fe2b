//! # Value Objects
//!
//! Validation parameters, tier policy and batch results.

use crate::domain::errors::RejectReason;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, COIN};
use std::fmt;
use std::str::FromStr;

/// Default collateral required by the SPV tier.
pub const COLLATERAL_SPV: Amount = 5000 * COIN;

/// Default maximum number of collateral outpoints on one registration.
pub const MAX_COLLATERAL_COUNT: usize = 10;

/// Parameters for registration validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceNodeParams {
    /// Maximum number of collateral outpoints (default: 10).
    ///
    /// Bounds the lookups a single record can trigger.
    pub max_collateral_count: usize,
    /// Minimum aggregate collateral for the SPV tier (default: 5000 coins).
    pub spv_collateral: Amount,
}

impl Default for ServiceNodeParams {
    fn default() -> Self {
        Self {
            max_collateral_count: MAX_COLLATERAL_COUNT,
            spv_collateral: COLLATERAL_SPV,
        }
    }
}

/// Stake requirement attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    /// Whether the registration must be backed by collateral.
    pub requires_collateral: bool,
    /// Minimum aggregate collateral value.
    pub min_collateral: Amount,
}

/// Service-node tier.
///
/// Unknown wire values are kept as `Unrecognized` so the record still
/// decodes; validation rejects them because they have no policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    /// Free tier, self-signed, no stake.
    #[default]
    Open,
    /// Collateral-backed tier, signed by the collateral owner.
    Spv,
    /// Any other tier byte.
    Unrecognized(u8),
}

impl Tier {
    /// Wire value of `Open`.
    pub const OPEN: u8 = 0;
    /// Wire value of `Spv`.
    pub const SPV: u8 = 50;

    /// Map a wire byte to a tier.
    pub fn from_u8(value: u8) -> Self {
        match value {
            Self::OPEN => Tier::Open,
            Self::SPV => Tier::Spv,
            other => Tier::Unrecognized(other),
        }
    }

    /// Wire byte for this tier.
    pub fn as_u8(&self) -> u8 {
        match self {
            Tier::Open => Self::OPEN,
            Tier::Spv => Self::SPV,
            Tier::Unrecognized(v) => *v,
        }
    }

    /// Stake policy under `params`; `None` for unrecognized tiers.
    pub fn policy(&self, params: &ServiceNodeParams) -> Option<TierPolicy> {
        match self {
            Tier::Open => Some(TierPolicy {
                requires_collateral: false,
                min_collateral: 0,
            }),
            Tier::Spv => Some(TierPolicy {
                requires_collateral: true,
                min_collateral: params.spv_collateral,
            }),
            Tier::Unrecognized(_) => None,
        }
    }
}

impl From<u8> for Tier {
    fn from(value: u8) -> Self {
        Tier::from_u8(value)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Open => write!(f, "OPEN"),
            Tier::Spv => write!(f, "SPV"),
            Tier::Unrecognized(v) => write!(f, "UNKNOWN({v})"),
        }
    }
}

/// Error parsing an operator tier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier name: {0}")]
pub struct UnknownTierName(pub String);

impl FromStr for Tier {
    type Err = UnknownTierName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Tier::Open),
            "SPV" => Ok(Tier::Spv),
            _ => Err(UnknownTierName(s.to_string())),
        }
    }
}

/// Result of validating a batch of records.
#[derive(Clone, Debug)]
pub struct BatchValidationResult {
    /// Individual outcomes, in input order
    pub results: Vec<Result<(), RejectReason>>,
    /// Whether every record validated
    pub all_valid: bool,
    /// Count of accepted records
    pub valid_count: usize,
    /// Count of rejected records
    pub invalid_count: usize,
}

impl BatchValidationResult {
    /// Create a batch result from individual outcomes.
    pub fn from_results(results: Vec<Result<(), RejectReason>>) -> Self {
        let valid_count = results.iter().filter(|r| r.is_ok()).count();
        let invalid_count = results.len() - valid_count;
        let all_valid = invalid_count == 0;

        Self {
            results,
            all_valid,
            valid_count,
            invalid_count,
        }
    }
}
