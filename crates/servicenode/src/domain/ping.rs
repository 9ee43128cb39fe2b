//! # Service Node Ping
//!
//! Liveness heartbeat: "the holder of this key observed anchor (h, hash) and
//! advertises config `c`, consistent with the embedded registration."
//!
//! Pings are always staleness-checked. The embedded registration is then
//! validated with staleness suppressed, because the ping's own anchor check
//! already established freshness.

use crate::domain::capabilities::ServiceConfig;
use crate::domain::errors::RejectReason;
use crate::domain::service_node::ServiceNode;
use crate::domain::value_objects::ServiceNodeParams;
use crate::ports::outbound::{AnchorOracle, TxLookup};
use shared_crypto::{recover_compact, sha256d, Secp256k1KeyPair, Secp256k1PublicKey};
use shared_types::{
    write_var_bytes, write_var_string, BlockAnchor, CodecError, Hash, WireDecode, WireEncode,
};

/// A signed liveness ping wrapping a registration snapshot.
#[derive(Debug, Clone)]
pub struct ServiceNodePing {
    identity_key: Secp256k1PublicKey,
    anchor: BlockAnchor,
    config: String,
    service_node: ServiceNode,
    signature: Vec<u8>,
}

impl ServiceNodePing {
    /// Create an unsigned ping.
    pub fn new(
        identity_key: Secp256k1PublicKey,
        anchor: BlockAnchor,
        config: impl Into<String>,
        service_node: ServiceNode,
    ) -> Self {
        Self {
            identity_key,
            anchor,
            config: config.into(),
            service_node,
            signature: Vec::new(),
        }
    }

    /// Replace the signature bytes.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Decode a ping and reconcile its embedded registration.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut ping = Self::from_wire_bytes(bytes)?;
        ping.reconcile_embedded();
        Ok(ping)
    }

    /// Copy this ping's anchor and config into the embedded registration
    /// and stamp its ping time.
    pub fn reconcile_embedded(&mut self) {
        self.service_node
            .set_best_block(self.anchor.height, self.anchor.hash);
        self.service_node.set_config(&self.config);
        self.service_node.update_ping();
    }

    pub fn identity_key(&self) -> &Secp256k1PublicKey {
        &self.identity_key
    }

    pub fn anchor(&self) -> &BlockAnchor {
        &self.anchor
    }

    pub fn anchor_height(&self) -> u32 {
        self.anchor.height
    }

    pub fn anchor_hash(&self) -> &Hash {
        &self.anchor.hash
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    /// Embedded registration snapshot.
    pub fn service_node(&self) -> &ServiceNode {
        &self.service_node
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn write_signed_fields(&self, out: &mut Vec<u8>) {
        self.identity_key.as_bytes().encode(out);
        self.anchor.height.encode(out);
        self.anchor.hash.encode(out);
        write_var_string(out, &self.config);
        self.service_node.encode(out);
    }

    /// Hash the ping signature is computed over.
    pub fn sig_hash(&self) -> Hash {
        let mut preimage = Vec::new();
        self.write_signed_fields(&mut preimage);
        sha256d(&preimage)
    }

    /// Identity of the signed ping.
    pub fn hash(&self) -> Hash {
        let mut preimage = Vec::new();
        self.write_signed_fields(&mut preimage);
        write_var_bytes(&mut preimage, &self.signature);
        sha256d(&preimage)
    }

    /// Sign with the service node's identity key. Returns false on failure.
    pub fn sign(&mut self, key: &Secp256k1KeyPair) -> bool {
        match key.sign_compact(&self.sig_hash()) {
            Ok(sig) => {
                self.signature = sig.to_vec();
                true
            }
            Err(_) => false,
        }
    }

    /// Validate, reporting why the ping was rejected.
    pub fn validate(
        &self,
        lookup: &dyn TxLookup,
        oracle: &dyn AnchorOracle,
        params: &ServiceNodeParams,
    ) -> Result<(), RejectReason> {
        if !oracle.check_anchor(self.anchor.height, &self.anchor.hash, true) {
            return Err(RejectReason::StaleOrUnknownAnchor {
                height: self.anchor.height,
            });
        }

        if !self.identity_key.is_fully_valid() {
            return Err(RejectReason::InvalidKey);
        }
        if self.identity_key != *self.service_node.identity_key() {
            return Err(RejectReason::IdentityMismatch);
        }

        ServiceConfig::parse(&self.config)?;

        let signer =
            recover_compact(&self.sig_hash(), &self.signature).map_err(|_| RejectReason::BadSignature)?;
        if signer.key_id() != self.identity_key.key_id() {
            return Err(RejectReason::SignerMismatch);
        }

        self.service_node.validate(lookup, oracle, params, false)
    }

    /// Accept/reject decision: `validate(..).is_ok()`.
    pub fn is_valid(
        &self,
        lookup: &dyn TxLookup,
        oracle: &dyn AnchorOracle,
        params: &ServiceNodeParams,
    ) -> bool {
        self.validate(lookup, oracle, params).is_ok()
    }
}
