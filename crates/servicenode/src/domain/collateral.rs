//! # Collateral Verifier
//!
//! Resolves each claimed stake outpoint through the injected lookup, sums the
//! output values and checks that every output pays to the stake owner.

use crate::domain::destination::extract_destination;
use crate::domain::errors::RejectReason;
use crate::ports::outbound::TxLookup;
use shared_crypto::hash160;
use shared_types::{Amount, KeyId, OutPoint};
use std::collections::BTreeSet;

/// Structural checks on a paid-tier collateral list: count bounds and
/// duplicate-freedom.
pub fn check_collateral_set(collateral: &[OutPoint], max_count: usize) -> Result<(), RejectReason> {
    if collateral.is_empty() || collateral.len() > max_count {
        return Err(RejectReason::EmptyOrExcessiveCollateral {
            count: collateral.len(),
            max: max_count,
        });
    }

    let mut seen = BTreeSet::new();
    for op in collateral {
        if !seen.insert(*op) {
            return Err(RejectReason::DuplicateCollateral(*op));
        }
    }
    Ok(())
}

/// Resolve and sum collateral owned by `owner`.
///
/// Returns the total value. Fails on the first outpoint that cannot be
/// resolved, is out of range, or does not pay to `owner`. A destination
/// script already confirmed for an earlier output is not re-checked, but
/// its value still counts.
pub fn verify_collateral(
    collateral: &[OutPoint],
    owner: &KeyId,
    lookup: &dyn TxLookup,
) -> Result<Amount, RejectReason> {
    let mut total: Amount = 0;
    let mut processed: BTreeSet<[u8; 20]> = BTreeSet::new();

    for op in collateral {
        let tx = lookup
            .lookup_output(op)
            .ok_or(RejectReason::UnresolvableOrSpentCollateral(*op))?;
        let out = tx
            .output(op.n)
            .ok_or(RejectReason::CollateralIndexOutOfRange(*op))?;

        total = total.saturating_add(out.value);

        let script_id = hash160(&out.script_pubkey);
        if processed.contains(&script_id) {
            continue;
        }

        let pays_owner = extract_destination(&out.script_pubkey)
            .and_then(|d| d.key_hash().copied())
            .is_some_and(|id| id == *owner);
        if !pays_owner {
            return Err(RejectReason::DestinationMismatch(*op));
        }

        processed.insert(script_id);
    }

    Ok(total)
}
