use std::sync::{Mutex, RwLock, RwLockReadGuard};

use crate::{
    error::{ChainError, Result},
    types::{Block, Blockchain},
};

/// A [`Blockchain`] that many threads may read while one at a time appends.
///
/// Appending seals the new block without holding the chain lock and then
/// publishes it under a short write lock, so readers only ever see sealed
/// blocks and are not stalled by the nonce search.
pub struct SharedBlockchain {
    writer: Mutex<()>,
    chain: RwLock<Blockchain>,
}

impl SharedBlockchain {
    pub fn new(chain: Blockchain) -> Self {
        Self {
            writer: Mutex::new(()),
            chain: RwLock::new(chain),
        }
    }

    pub fn append(&self, payload: impl Into<Vec<u8>>) -> Result<Block> {
        let _writer = self.writer.lock().map_err(|_| ChainError::LockPoisoned)?;

        // the writer lock keeps the tip fixed until the push below
        let (mut block, config) = {
            let chain = self.read()?;
            (chain.candidate(payload), *chain.config())
        };
        block.seal(&config)?;

        let mut chain = self.chain.write().map_err(|_| ChainError::LockPoisoned)?;
        chain.push(block).cloned()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn tip(&self) -> Result<Block> {
        Ok(self.read()?.tip().clone())
    }

    pub fn snapshot(&self) -> Result<Vec<Block>> {
        Ok(self.read()?.blocks().cloned().collect())
    }

    pub fn verify(&self) -> Result<()> {
        self.read()?.verify()
    }

    pub fn into_inner(self) -> Result<Blockchain> {
        self.chain.into_inner().map_err(|_| ChainError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Blockchain>> {
        self.chain.read().map_err(|_| ChainError::LockPoisoned)
    }
}
