//! # Servicenode Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Chain, key and record builders
//! └── integration/      # End-to-end validation flows
//!     ├── registration_flows.rs
//!     ├── ping_flows.rs
//!     └── wire_flows.rs
//! tests/benches/
//! └── validation_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sn-tests
//! RUST_LOG=servicenode=debug cargo test -p sn-tests -- --nocapture
//! cargo bench -p sn-tests
//! ```
