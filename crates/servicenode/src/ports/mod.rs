//! # Ports Layer
//!
//! Inbound (driving) and outbound (driven) interfaces.

pub mod inbound;
pub mod outbound;
