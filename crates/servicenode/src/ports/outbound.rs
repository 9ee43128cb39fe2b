//! # Outbound Ports (Driven Ports / SPI)
//!
//! Chain-state capabilities the validation core needs but never owns. Both
//! are passed into every validation call; the core holds no global handle
//! to chain storage.

use shared_types::{Hash, OutPoint, Transaction};
use std::sync::Arc;

/// Resolves a collateral outpoint to its funding transaction.
///
/// Must return `None` when the output is unknown, already spent, or
/// conflicted by a pending spend. The core does not distinguish the causes.
pub trait TxLookup: Send + Sync {
    /// Look up the transaction funding `outpoint`, if it is unspent.
    fn lookup_output(&self, outpoint: &OutPoint) -> Option<Arc<Transaction>>;
}

/// Confirms that a claimed block anchor is on the active chain.
pub trait AnchorOracle: Send + Sync {
    /// True if `hash` is the active-chain block at `height`, and (when
    /// `enforce_staleness` is set) the height is recent and not too far
    /// ahead of the tip.
    fn check_anchor(&self, height: u32, hash: &Hash, enforce_staleness: bool) -> bool;
}

impl<F> TxLookup for F
where
    F: Fn(&OutPoint) -> Option<Arc<Transaction>> + Send + Sync,
{
    fn lookup_output(&self, outpoint: &OutPoint) -> Option<Arc<Transaction>> {
        self(outpoint)
    }
}

impl<F> AnchorOracle for F
where
    F: Fn(u32, &Hash, bool) -> bool + Send + Sync,
{
    fn check_anchor(&self, height: u32, hash: &Hash, enforce_staleness: bool) -> bool {
        self(height, hash, enforce_staleness)
    }
}
