//! # Service Node Validation Service
//!
//! Application service implementing `ServiceNodeValidationApi`.
//!
//! ## Architecture
//!
//! - Implements the inbound port (`ServiceNodeValidationApi`)
//! - Holds the outbound ports (`TxLookup`, `AnchorOracle`) and passes them
//!   into every domain validation call
//! - Logs rejections; the domain layer itself never logs

use crate::domain::errors::RejectReason;
use crate::domain::ping::ServiceNodePing;
use crate::domain::service_node::ServiceNode;
use crate::domain::value_objects::{BatchValidationResult, ServiceNodeParams};
use crate::ports::inbound::ServiceNodeValidationApi;
use crate::ports::outbound::{AnchorOracle, TxLookup};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace};

/// Service-node validation service.
pub struct ServiceNodeValidationService<L: TxLookup, A: AnchorOracle> {
    lookup: Arc<L>,
    oracle: Arc<A>,
    params: ServiceNodeParams,
}

impl<L: TxLookup, A: AnchorOracle> ServiceNodeValidationService<L, A> {
    /// Create a service with default parameters.
    pub fn new(lookup: Arc<L>, oracle: Arc<A>) -> Self {
        Self::with_params(lookup, oracle, ServiceNodeParams::default())
    }

    /// Create a service with explicit parameters.
    pub fn with_params(lookup: Arc<L>, oracle: Arc<A>, params: ServiceNodeParams) -> Self {
        Self {
            lookup,
            oracle,
            params,
        }
    }

    /// Active validation parameters.
    pub fn params(&self) -> &ServiceNodeParams {
        &self.params
    }

    /// Accept/reject form of [`validate_service_node`](ServiceNodeValidationApi::validate_service_node).
    pub fn is_valid_service_node(&self, node: &ServiceNode, enforce_staleness: bool) -> bool {
        self.validate_service_node(node, enforce_staleness).is_ok()
    }

    /// Accept/reject form of [`validate_ping`](ServiceNodeValidationApi::validate_ping).
    pub fn is_valid_ping(&self, ping: &ServiceNodePing) -> bool {
        self.validate_ping(ping).is_ok()
    }
}

impl<L: TxLookup, A: AnchorOracle> ServiceNodeValidationApi for ServiceNodeValidationService<L, A> {
    fn validate_service_node(
        &self,
        node: &ServiceNode,
        enforce_staleness: bool,
    ) -> Result<(), RejectReason> {
        let result = node.validate(
            self.lookup.as_ref(),
            self.oracle.as_ref(),
            &self.params,
            enforce_staleness,
        );
        match &result {
            Ok(()) => trace!(
                "[servicenode] Accepted {} registration {:?}",
                node.tier(),
                node.identity_key()
            ),
            Err(reason) => debug!(
                "[servicenode] Rejected registration {:?}: {}",
                node.identity_key(),
                reason
            ),
        }
        result
    }

    fn validate_ping(&self, ping: &ServiceNodePing) -> Result<(), RejectReason> {
        let result = ping.validate(self.lookup.as_ref(), self.oracle.as_ref(), &self.params);
        match &result {
            Ok(()) => trace!(
                "[servicenode] Accepted ping {:?} at height {}",
                ping.identity_key(),
                ping.anchor_height()
            ),
            Err(reason) => debug!(
                "[servicenode] Rejected ping {:?} at height {}: {}",
                ping.identity_key(),
                ping.anchor_height(),
                reason
            ),
        }
        result
    }

    fn batch_validate_pings(&self, pings: &[ServiceNodePing]) -> BatchValidationResult {
        let results: Vec<Result<(), RejectReason>> =
            pings.par_iter().map(|ping| self.validate_ping(ping)).collect();
        let batch = BatchValidationResult::from_results(results);
        debug!(
            "[servicenode] Batch validated {} pings: {} valid, {} rejected",
            pings.len(),
            batch.valid_count,
            batch.invalid_count
        );
        batch
    }
}
