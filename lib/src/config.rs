use crate::{error::Result, target::Target};

/// Parameters every block minted by a chain is sealed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainConfig {
    pub difficulty: u32,
    /// Exclusive nonce ceiling; reaching it without a solution is fatal.
    pub max_nonce: i64,
    /// Search threads; 1 keeps the search on the calling thread.
    pub workers: usize,
}

impl ChainConfig {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn with_max_nonce(mut self, max_nonce: i64) -> Self {
        self.max_nonce = max_nonce;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn target(&self) -> Result<Target> {
        Target::from_difficulty(self.difficulty)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: crate::DIFFICULTY,
            max_nonce: crate::MAX_NONCE,
            workers: 1,
        }
    }
}
