//! # Signature Hashes
//!
//! Every hash is `sha256d` over wire-encoded fields in a fixed order. The
//! signature is never part of its own preimage.
//!
//! | Hash | Preimage |
//! |------|----------|
//! | registration sighash | key ‖ tier ‖ payment key hash ‖ collateral ‖ height ‖ block hash |
//! | record identity | registration preimage ‖ config ‖ signature ‖ registration time |
//! | ping sighash | key ‖ height ‖ block hash ‖ config ‖ embedded record |
//! | ping identity | ping preimage ‖ signature |

use crate::domain::value_objects::Tier;
use shared_crypto::{sha256d, Secp256k1PublicKey};
use shared_types::{write_vec, BlockAnchor, Hash, KeyId, OutPoint, WireEncode};

/// Append the signed fields of a registration.
pub(crate) fn write_registration_fields(
    out: &mut Vec<u8>,
    identity_key: &Secp256k1PublicKey,
    tier: Tier,
    payment_key_hash: &KeyId,
    collateral: &[OutPoint],
    anchor: &BlockAnchor,
) {
    identity_key.as_bytes().encode(out);
    tier.as_u8().encode(out);
    payment_key_hash.encode(out);
    write_vec(out, collateral);
    anchor.height.encode(out);
    anchor.hash.encode(out);
}

/// Hash a registration signs over.
pub fn registration_sig_hash(
    identity_key: &Secp256k1PublicKey,
    tier: Tier,
    payment_key_hash: &KeyId,
    collateral: &[OutPoint],
    anchor: &BlockAnchor,
) -> Hash {
    let mut preimage = Vec::with_capacity(128 + collateral.len() * 36);
    write_registration_fields(
        &mut preimage,
        identity_key,
        tier,
        payment_key_hash,
        collateral,
        anchor,
    );
    sha256d(&preimage)
}
