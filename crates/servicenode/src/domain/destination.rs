//! # Output Destinations
//!
//! Classifies a collateral output's locking script so its owner can be
//! compared with the key recovered from a registration signature.

use shared_crypto::hash160;
use shared_types::KeyId;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;

/// Where an output pays to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Pay to a key hash (P2PKH, or P2PK reduced to its key hash).
    KeyHash(KeyId),
    /// Pay to a script hash.
    ScriptHash([u8; 20]),
}

impl Destination {
    /// The key hash, if this destination is owned by a single key.
    pub fn key_hash(&self) -> Option<&KeyId> {
        match self {
            Destination::KeyHash(id) => Some(id),
            Destination::ScriptHash(_) => None,
        }
    }
}

/// Extract the destination of a standard script, or `None` if non-standard.
pub fn extract_destination(script: &[u8]) -> Option<Destination> {
    match script {
        // OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
        [OP_DUP, OP_HASH160, 20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if hash.len() == 20 => {
            let mut id = [0u8; 20];
            id.copy_from_slice(hash);
            Some(Destination::KeyHash(id))
        }
        // OP_HASH160 <20> OP_EQUAL
        [OP_HASH160, 20, hash @ .., OP_EQUAL] if hash.len() == 20 => {
            let mut id = [0u8; 20];
            id.copy_from_slice(hash);
            Some(Destination::ScriptHash(id))
        }
        // <pubkey> OP_CHECKSIG
        [len @ (33 | 65), key @ .., OP_CHECKSIG] if key.len() == *len as usize => {
            let valid_prefix = match key[0] {
                0x02 | 0x03 => *len == 33,
                0x04 => *len == 65,
                _ => false,
            };
            valid_prefix.then(|| Destination::KeyHash(hash160(key)))
        }
        _ => None,
    }
}

/// Build a P2PKH script for `key_id`.
pub fn p2pkh_script(key_id: &KeyId) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[OP_DUP, OP_HASH160, 20]);
    script.extend_from_slice(key_id);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}
