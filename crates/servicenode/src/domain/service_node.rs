//! # Service Node Registration
//!
//! A signed claim: "key K, at tier T, backed by collateral C, anchored at
//! block (h, hash), is a live service provider."
//!
//! ## Validation
//!
//! 1. The last-seen anchor must satisfy the anchor oracle.
//! 2. The identity key must be a valid curve point.
//! 3. Tier dispatch:
//!    - OPEN: the signature must recover to the identity key itself.
//!    - Paid tiers: the signature recovers the *stake owner*, and every
//!      collateral output must pay to that owner. The summed value must
//!      meet the tier minimum.
//!
//! Unrecognized tiers always reject.

use crate::domain::capabilities::ServiceConfig;
use crate::domain::collateral::{check_collateral_set, verify_collateral};
use crate::domain::errors::RejectReason;
use crate::domain::sighash::{registration_sig_hash, write_registration_fields};
use crate::domain::value_objects::{ServiceNodeParams, Tier};
use crate::ports::outbound::{AnchorOracle, TxLookup};
use shared_crypto::{recover_compact, sha256d, Secp256k1KeyPair, Secp256k1PublicKey};
use shared_types::{write_var_bytes, write_var_string, BlockAnchor, Hash, KeyId, OutPoint, WireEncode};
use std::cmp::Ordering;
use std::hash::{Hash as _, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in seconds.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// A service-node registration.
///
/// Equality, ordering and hashing consider the identity key only.
#[derive(Debug, Clone)]
pub struct ServiceNode {
    identity_key: Secp256k1PublicKey,
    tier: Tier,
    payment_key_hash: KeyId,
    collateral: Vec<OutPoint>,
    anchor: BlockAnchor,
    signature: Vec<u8>,

    // Local bookkeeping, never on the wire.
    reg_time: i64,
    ping_time: i64,
    last_seen: BlockAnchor,
    config: String,
    protocol: u32,
    services: Vec<String>,
}

impl ServiceNode {
    /// Create a registration. The last-seen anchor starts at `anchor`.
    pub fn new(
        identity_key: Secp256k1PublicKey,
        tier: Tier,
        payment_key_hash: KeyId,
        collateral: Vec<OutPoint>,
        anchor: BlockAnchor,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            identity_key,
            tier,
            payment_key_hash,
            collateral,
            anchor,
            signature,
            reg_time: unix_now(),
            ping_time: 0,
            last_seen: anchor,
            config: String::new(),
            protocol: 0,
            services: Vec::new(),
        }
    }

    /// True if the identity key does not even carry a compressed-key tag
    /// (uninitialised record). Curve validity is checked by `validate`.
    pub fn is_null(&self) -> bool {
        !self.identity_key.has_compressed_prefix()
    }

    pub fn identity_key(&self) -> &Secp256k1PublicKey {
        &self.identity_key
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn payment_key_hash(&self) -> &KeyId {
        &self.payment_key_hash
    }

    pub fn collateral(&self) -> &[OutPoint] {
        &self.collateral
    }

    /// Anchor claimed at signing time.
    pub fn anchor(&self) -> &BlockAnchor {
        &self.anchor
    }

    pub fn anchor_height(&self) -> u32 {
        self.anchor.height
    }

    pub fn anchor_hash(&self) -> &Hash {
        &self.anchor.hash
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Registration time (unix seconds), local to this receiver.
    pub fn reg_time(&self) -> i64 {
        self.reg_time
    }

    /// Time of the last reconciled ping (unix seconds, 0 if never).
    pub fn ping_time(&self) -> i64 {
        self.ping_time
    }

    /// Stamp the ping time with the current time.
    pub fn update_ping(&mut self) {
        self.ping_time = unix_now();
    }

    /// Anchor the freshness check evaluates.
    pub fn last_seen_anchor(&self) -> &BlockAnchor {
        &self.last_seen
    }

    /// Record the most recent anchor reported for this node.
    pub fn set_best_block(&mut self, height: u32, hash: Hash) {
        self.last_seen = BlockAnchor::new(height, hash);
    }

    /// Assign the capability config. A bad protocol token is tolerated:
    /// the protocol version becomes 0.
    pub fn set_config(&mut self, config: &str) {
        let parsed = ServiceConfig::parse_lenient(config);
        self.config = config.to_string();
        self.protocol = parsed.protocol;
        self.services = parsed.services;
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn protocol_version(&self) -> u32 {
        self.protocol
    }

    /// Capability tags parsed from the config.
    pub fn service_list(&self) -> &[String] {
        &self.services
    }

    /// Hash the signature is computed over.
    pub fn sig_hash(&self) -> Hash {
        registration_sig_hash(
            &self.identity_key,
            self.tier,
            &self.payment_key_hash,
            &self.collateral,
            &self.anchor,
        )
    }

    /// Identity of a fully formed record, including config, signature and
    /// registration time.
    pub fn hash(&self) -> Hash {
        let mut preimage = Vec::new();
        write_registration_fields(
            &mut preimage,
            &self.identity_key,
            self.tier,
            &self.payment_key_hash,
            &self.collateral,
            &self.anchor,
        );
        write_var_string(&mut preimage, &self.config);
        write_var_bytes(&mut preimage, &self.signature);
        self.reg_time.encode(&mut preimage);
        sha256d(&preimage)
    }

    /// Sign with `key`: the identity key for OPEN, the collateral owner's key
    /// for paid tiers. Returns false if signing fails.
    pub fn sign(&mut self, key: &Secp256k1KeyPair) -> bool {
        match key.sign_compact(&self.sig_hash()) {
            Ok(sig) => {
                self.signature = sig.to_vec();
                true
            }
            Err(_) => false,
        }
    }

    /// Validate, reporting why the record was rejected.
    pub fn validate(
        &self,
        lookup: &dyn TxLookup,
        oracle: &dyn AnchorOracle,
        params: &ServiceNodeParams,
        enforce_staleness: bool,
    ) -> Result<(), RejectReason> {
        if !oracle.check_anchor(self.last_seen.height, &self.last_seen.hash, enforce_staleness) {
            return Err(RejectReason::StaleOrUnknownAnchor {
                height: self.last_seen.height,
            });
        }

        if !self.identity_key.is_fully_valid() {
            return Err(RejectReason::InvalidKey);
        }

        let policy = self
            .tier
            .policy(params)
            .ok_or(RejectReason::UnrecognizedTier(self.tier.as_u8()))?;

        let sighash = self.sig_hash();

        if !policy.requires_collateral {
            let signer =
                recover_compact(&sighash, &self.signature).map_err(|_| RejectReason::BadSignature)?;
            if signer.key_id() != self.identity_key.key_id() {
                return Err(RejectReason::SignerMismatch);
            }
            return Ok(());
        }

        if self.payment_key_hash == KeyId::default() {
            return Err(RejectReason::MissingPaymentKeyHash);
        }
        check_collateral_set(&self.collateral, params.max_collateral_count)?;

        let owner =
            recover_compact(&sighash, &self.signature).map_err(|_| RejectReason::BadSignature)?;
        let total = verify_collateral(&self.collateral, &owner.key_id(), lookup)?;

        if total < policy.min_collateral {
            return Err(RejectReason::InsufficientStake {
                total,
                required: policy.min_collateral,
            });
        }
        Ok(())
    }

    /// Accept/reject decision: `validate(..).is_ok()`.
    pub fn is_valid(
        &self,
        lookup: &dyn TxLookup,
        oracle: &dyn AnchorOracle,
        params: &ServiceNodeParams,
        enforce_staleness: bool,
    ) -> bool {
        self.validate(lookup, oracle, params, enforce_staleness)
            .is_ok()
    }

    /// Compare by the identity key's canonical bytes.
    pub fn cmp_identity(&self, other: &Self) -> Ordering {
        self.identity_key.as_bytes().cmp(other.identity_key.as_bytes())
    }
}

impl PartialEq for ServiceNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_identity(other) == Ordering::Equal
    }
}

impl Eq for ServiceNode {}

impl PartialOrd for ServiceNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_identity(other)
    }
}

impl std::hash::Hash for ServiceNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_key.as_bytes().hash(state);
    }
}
