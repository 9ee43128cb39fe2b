//! # Service Node Validation
//!
//! Self-certifying registrations and liveness pings for service nodes. Any
//! peer can verify a record with nothing but the record itself plus two
//! chain-state capabilities: a transaction lookup and an anchor oracle.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): entities, tier policy and validity algorithms, no I/O
//! - **Codec** (`codec.rs`): wire encoding of registrations and pings
//! - **Ports Layer** (`ports/`): inbound validation API, outbound chain-state traits
//! - **Service Layer** (`service.rs`): wires domain logic to ports, logs decisions
//! - **Adapters Layer** (`adapters/`): in-memory chain view
//!
//! ## Security Notes
//!
//! - **Recoverable signatures**: the verifier recovers the signer and compares
//!   key identities; a mismatched key cannot simply be supplied alongside
//! - **OPEN tier**: signed by the identity key itself
//! - **Paid tiers**: signed by the collateral owner; every collateral output
//!   must pay to the recovered key, with no duplicates
//! - **Replay**: anchors must be on the active chain and, for pings, recent

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{ChainViewConfig, InMemoryChainView};
pub use domain::capabilities::{parse_protocol_version, ServiceConfig};
pub use domain::destination::{extract_destination, p2pkh_script, Destination};
pub use domain::errors::{ConfigError, RejectReason};
pub use domain::ping::ServiceNodePing;
pub use domain::service_node::ServiceNode;
pub use domain::sighash::registration_sig_hash;
pub use domain::value_objects::{
    BatchValidationResult, ServiceNodeParams, Tier, TierPolicy, UnknownTierName, COLLATERAL_SPV,
    MAX_COLLATERAL_COUNT,
};
pub use ports::inbound::ServiceNodeValidationApi;
pub use ports::outbound::{AnchorOracle, TxLookup};
pub use service::ServiceNodeValidationService;
