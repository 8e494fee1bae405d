//! Deterministic block-hash accumulator.
//!
//! Built from `original_source/tend/abci/bhasher.py`'s `BlockHasher`: a
//! running, order-sensitive SHA-256 digest over the hashes of every
//! transaction delivered within one block, used by [`crate::ext`]'s
//! `TxKeeperDriver` to compute the `app_hash` a `commit` response reports.

use sha2::{Digest, Sha256};

use crate::error::Error;

/// Accumulates transaction hashes for one block and reduces them to a
/// single 32-byte digest. A fresh `BlockHasher` is used per block; reusing
/// one across blocks would silently fold the previous block's hashes in.
#[derive(Default)]
pub struct BlockHasher {
    hashes: Vec<[u8; 32]>,
}

impl BlockHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `tx` with SHA-256 and records the digest, returning it so the
    /// caller can also report it in, e.g., a `ResponseDeliverTx`. Rejects a
    /// transaction whose hash was already recorded this block.
    pub fn write_tx(&mut self, tx: &[u8]) -> Result<[u8; 32], Error> {
        let digest = Sha256::digest(tx);
        let hash: [u8; 32] = digest.into();
        self.write_hash(hash)?;
        Ok(hash)
    }

    /// Records a precomputed hash directly. Rejects a duplicate exactly as
    /// [`write_tx`](Self::write_tx) does.
    pub fn write_hash(&mut self, hash: [u8; 32]) -> Result<(), Error> {
        if self.hashes.contains(&hash) {
            return Err(Error::DuplicateTxHash);
        }
        self.hashes.push(hash);
        Ok(())
    }

    /// Reduces the recorded hashes to a single digest: SHA-256 of the
    /// optional `prefix` (e.g. the previous block's app hash) followed by
    /// the concatenation of every recorded hash, in recording order.
    pub fn sum(&self, prefix: Option<&[u8]>) -> [u8; 32] {
        let mut hasher = Sha256::new();
        if let Some(prefix) = prefix {
            hasher.update(prefix);
        }
        for hash in &self.hashes {
            hasher.update(hash);
        }
        hasher.finalize().into()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }
}
