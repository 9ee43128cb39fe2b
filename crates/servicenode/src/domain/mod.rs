//! # Domain Layer
//!
//! Registration and ping entities with their validity algorithms. Pure and
//! synchronous; chain state arrives only through the outbound ports passed
//! into each call.

pub mod capabilities;
pub mod collateral;
pub mod destination;
pub mod errors;
pub mod ping;
pub mod service_node;
pub mod sighash;
pub mod value_objects;
