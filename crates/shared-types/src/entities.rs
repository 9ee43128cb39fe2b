//! # Core Chain Entities
//!
//! The UTXO-side view of the chain that service-node validation consumes:
//! outpoints used as collateral, the transactions they resolve to, and the
//! block anchors records are pinned to.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::encoding::{write_compact_size, write_var_bytes, WireEncode};

/// A 32-byte hash (double SHA-256 unless stated otherwise).
pub type Hash = [u8; 32];

/// A 20-byte key identifier: `RIPEMD160(SHA256(pubkey))`.
pub type KeyId = [u8; 20];

/// Value in base units.
pub type Amount = u64;

/// Base units per coin.
pub const COIN: Amount = 100_000_000;

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Reference to a specific transaction output.
///
/// Collateral is expressed as a list of outpoints; ordering and hashing are
/// structural so duplicates can be detected with ordinary set semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct OutPoint {
    /// Id of the funding transaction.
    pub txid: Hash,
    /// Output index inside the funding transaction.
    pub n: u32,
}

impl OutPoint {
    /// Create a new outpoint.
    pub fn new(txid: Hash, n: u32) -> Self {
        Self { txid, n }
    }

    /// The null outpoint (zero txid, index `u32::MAX`).
    pub fn null() -> Self {
        Self {
            txid: ZERO_HASH,
            n: u32::MAX,
        }
    }

    /// Returns true for the null outpoint.
    pub fn is_null(&self) -> bool {
        self.txid == ZERO_HASH && self.n == u32::MAX
    }
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Value carried by the output.
    pub value: Amount,
    /// Locking script.
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    /// Create a new output.
    pub fn new(value: Amount, script_pubkey: Vec<u8>) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }
}

/// A transaction as returned by a collateral lookup.
///
/// Only the spent outpoints and the outputs are modelled; witness and
/// unlocking data play no part in stake validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// Outpoints consumed by this transaction.
    pub inputs: Vec<OutPoint>,
    /// Outputs created by this transaction.
    pub vout: Vec<TxOut>,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(version: u32, inputs: Vec<OutPoint>, vout: Vec<TxOut>) -> Self {
        Self {
            version,
            inputs,
            vout,
        }
    }

    /// Compute the transaction id: double SHA-256 of the wire encoding.
    pub fn txid(&self) -> Hash {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        let first: Hash = Sha256::digest(&buf).into();
        Sha256::digest(first).into()
    }

    /// Returns the output at `n`, if the index is in range.
    pub fn output(&self, n: u32) -> Option<&TxOut> {
        self.vout.get(n as usize)
    }
}

impl WireEncode for Transaction {
    fn encode(&self, out: &mut Vec<u8>) {
        self.version.encode(out);
        write_compact_size(out, self.inputs.len() as u64);
        for input in &self.inputs {
            input.encode(out);
        }
        write_compact_size(out, self.vout.len() as u64);
        for output in &self.vout {
            output.value.encode(out);
            write_var_bytes(out, &output.script_pubkey);
        }
    }
}

/// A (height, block hash) pair a record claims as its observed chain tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BlockAnchor {
    /// Block height.
    pub height: u32,
    /// Hash of the block at `height`.
    pub hash: Hash,
}

impl BlockAnchor {
    /// Create a new anchor.
    pub fn new(height: u32, hash: Hash) -> Self {
        Self { height, hash }
    }
}
