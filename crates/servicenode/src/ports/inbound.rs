//! # Inbound Ports (Driving Ports / API)
//!
//! What a service-node manager calls. Every method returns the diagnostic
//! form; the accept/reject contract is `.is_ok()`.

use crate::domain::errors::RejectReason;
use crate::domain::ping::ServiceNodePing;
use crate::domain::service_node::ServiceNode;
use crate::domain::value_objects::BatchValidationResult;

/// Service-node validation API.
///
/// Implementations must be thread-safe (`Send + Sync`); validation is
/// reentrant and may be driven from many network worker threads.
pub trait ServiceNodeValidationApi: Send + Sync {
    /// Validate a registration.
    ///
    /// `enforce_staleness = false` only checks that the anchor is on the
    /// active chain, not how old it is.
    fn validate_service_node(
        &self,
        node: &ServiceNode,
        enforce_staleness: bool,
    ) -> Result<(), RejectReason>;

    /// Validate a ping and its embedded registration.
    fn validate_ping(&self, ping: &ServiceNodePing) -> Result<(), RejectReason>;

    /// Validate many pings in parallel. Results keep input order.
    fn batch_validate_pings(&self, pings: &[ServiceNodePing]) -> BatchValidationResult;
}
