//! In-Memory Chain View Adapter
//!
//! Implements `TxLookup` and `AnchorOracle` over an in-memory active chain,
//! confirmed transactions and a mempool. Used by tests and by hosts that
//! mirror chain state into memory.

use crate::ports::outbound::{AnchorOracle, TxLookup};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{BlockAnchor, Hash, OutPoint, Transaction};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Default recency window for anchors, in blocks.
pub const DEFAULT_STALE_BLOCKS: u32 = 1440;

/// Freshness and lookup policy for [`InMemoryChainView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainViewConfig {
    /// Maximum anchor age in blocks when staleness is enforced (default: 1440).
    pub stale_blocks: u32,
    /// Whether unconfirmed transactions can fund collateral (default: true).
    ///
    /// Mempool spends always make an output unavailable.
    pub allow_mempool: bool,
}

impl Default for ChainViewConfig {
    fn default() -> Self {
        Self {
            stale_blocks: DEFAULT_STALE_BLOCKS,
            allow_mempool: true,
        }
    }
}

#[derive(Debug, Default)]
struct ChainState {
    /// Active chain block hashes, indexed by height.
    blocks: Vec<Hash>,
    confirmed: HashMap<Hash, Arc<Transaction>>,
    spent: HashSet<OutPoint>,
    mempool: HashMap<Hash, Arc<Transaction>>,
    mempool_spent: HashSet<OutPoint>,
}

/// In-memory chain state implementing both outbound ports.
pub struct InMemoryChainView {
    config: ChainViewConfig,
    state: RwLock<ChainState>,
}

impl InMemoryChainView {
    /// Create an empty view.
    pub fn new(config: ChainViewConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ChainState::default()),
        }
    }

    pub fn config(&self) -> &ChainViewConfig {
        &self.config
    }

    /// Append a block to the active chain. Returns its height.
    pub fn push_block(&self, hash: Hash) -> u32 {
        let mut state = self.state.write();
        state.blocks.push(hash);
        let height = (state.blocks.len() - 1) as u32;
        debug!("[servicenode] Chain tip advanced to height {}", height);
        height
    }

    /// Drop every block above `height`.
    pub fn rewind_to(&self, height: u32) {
        let mut state = self.state.write();
        let keep = (height as usize + 1).min(state.blocks.len());
        state.blocks.truncate(keep);
        debug!(
            "[servicenode] Chain rewound, tip now at {} blocks",
            state.blocks.len()
        );
    }

    /// Current tip, if any block exists.
    pub fn tip(&self) -> Option<BlockAnchor> {
        let state = self.state.read();
        let hash = *state.blocks.last()?;
        Some(BlockAnchor::new((state.blocks.len() - 1) as u32, hash))
    }

    /// Active-chain hash at `height`.
    pub fn block_hash(&self, height: u32) -> Option<Hash> {
        self.state.read().blocks.get(height as usize).copied()
    }

    /// Confirm a transaction: its outputs become available and its inputs
    /// are spent. Returns the txid.
    pub fn connect_transaction(&self, tx: Transaction) -> Hash {
        let txid = tx.txid();
        let mut state = self.state.write();
        for input in &tx.inputs {
            state.spent.insert(*input);
            state.mempool_spent.remove(input);
        }
        state.mempool.remove(&txid);
        state.confirmed.insert(txid, Arc::new(tx));
        txid
    }

    /// Add an unconfirmed transaction. Its inputs count as spent
    /// immediately. Returns the txid.
    pub fn add_to_mempool(&self, tx: Transaction) -> Hash {
        let txid = tx.txid();
        let mut state = self.state.write();
        for input in &tx.inputs {
            state.mempool_spent.insert(*input);
        }
        state.mempool.insert(txid, Arc::new(tx));
        txid
    }

    /// Whether `outpoint` is spent on chain or by a mempool transaction.
    pub fn is_spent(&self, outpoint: &OutPoint) -> bool {
        let state = self.state.read();
        state.spent.contains(outpoint) || state.mempool_spent.contains(outpoint)
    }
}

impl Default for InMemoryChainView {
    fn default() -> Self {
        Self::new(ChainViewConfig::default())
    }
}

impl TxLookup for InMemoryChainView {
    fn lookup_output(&self, outpoint: &OutPoint) -> Option<Arc<Transaction>> {
        let state = self.state.read();
        if state.spent.contains(outpoint) || state.mempool_spent.contains(outpoint) {
            return None;
        }
        if let Some(tx) = state.confirmed.get(&outpoint.txid) {
            return Some(Arc::clone(tx));
        }
        if self.config.allow_mempool {
            return state.mempool.get(&outpoint.txid).cloned();
        }
        None
    }
}

impl AnchorOracle for InMemoryChainView {
    fn check_anchor(&self, height: u32, hash: &Hash, enforce_staleness: bool) -> bool {
        let state = self.state.read();
        match state.blocks.get(height as usize) {
            Some(active) if active == hash => {}
            _ => return false,
        }
        if !enforce_staleness {
            return true;
        }
        let tip = (state.blocks.len() - 1) as u32;
        tip - height <= self.config.stale_blocks
    }
}
