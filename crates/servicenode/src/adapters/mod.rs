//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod chain_view;

pub use chain_view::{ChainViewConfig, InMemoryChainView, DEFAULT_STALE_BLOCKS};
