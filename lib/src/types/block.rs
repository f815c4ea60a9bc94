use std::sync::atomic::AtomicBool;

use chrono::Utc;

use crate::{
    config::ChainConfig,
    error::{ChainError, Result},
    pow::{ProofOfWork, Seal},
    sha256::Hash,
};

/// A chain record. Unsealed while `hash` is `None`; sealing records the nonce
/// and digest exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub payload: Vec<u8>,
    /// `None` only for genesis.
    pub prev_block_hash: Option<Hash>,
    pub hash: Option<Hash>,
    pub nonce: i64,
    pub difficulty: u32,
}

impl Block {
    pub fn new(payload: impl Into<Vec<u8>>, prev_block_hash: Option<Hash>, difficulty: u32) -> Self {
        Self::with_timestamp(Utc::now().timestamp(), payload, prev_block_hash, difficulty)
    }

    pub fn with_timestamp(
        timestamp: i64,
        payload: impl Into<Vec<u8>>,
        prev_block_hash: Option<Hash>,
        difficulty: u32,
    ) -> Self {
        Self {
            timestamp,
            payload: payload.into(),
            prev_block_hash,
            hash: None,
            nonce: 0,
            difficulty,
        }
    }

    pub fn genesis(difficulty: u32) -> Self {
        Self::new(crate::GENESIS_PAYLOAD, None, difficulty)
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_block_hash.is_none()
    }

    /// Digest of the block's fields at its recorded nonce.
    pub fn compute_hash(&self) -> Result<Hash> {
        Ok(ProofOfWork::new(self)?.hash_at(self.nonce))
    }

    /// Runs the nonce search and records its result. A block that already
    /// carries a digest is left untouched.
    pub fn seal(&mut self, config: &ChainConfig) -> Result<Seal> {
        if let Some(hash) = self.hash {
            return Ok(Seal {
                nonce: self.nonce,
                hash,
            });
        }

        let seal = ProofOfWork::new(self)?
            .with_max_nonce(config.max_nonce)
            .run_parallel(config.workers, &AtomicBool::new(false))?;

        self.nonce = seal.nonce;
        self.hash = Some(seal.hash);
        Ok(seal)
    }

    pub fn is_sealed(&self) -> bool {
        self.check_seal(0).is_ok()
    }

    /// Checks the stored digest against a fresh recomputation and the target.
    /// `height` only labels the error.
    pub fn check_seal(&self, height: usize) -> Result<()> {
        let Some(stored) = self.hash else {
            return Err(ChainError::Unsealed { height });
        };

        let pow = ProofOfWork::new(self)?;
        if pow.hash_at(self.nonce) != stored {
            return Err(ChainError::DigestMismatch { height });
        }

        if !pow.target().is_met_by(&stored) {
            return Err(ChainError::InsufficientWork { height });
        }

        Ok(())
    }
}
