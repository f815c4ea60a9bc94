use log::info;

use crate::{
    config::ChainConfig,
    error::{ChainError, Result},
    target::Target,
    types::Block,
};

/// Append-only sequence of sealed blocks, starting at a genesis block.
#[derive(Clone, Debug)]
pub struct Blockchain {
    config: ChainConfig,
    target: Target,
    blocks: Vec<Block>,
}

impl Blockchain {
    /// Chain with a freshly sealed genesis block at the default difficulty.
    pub fn new() -> Result<Self> {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Result<Self> {
        let target = config.target()?;

        let mut genesis = Block::genesis(config.difficulty);
        genesis.seal(&config)?;
        info!(
            "genesis sealed: nonce={} hash={}",
            genesis.nonce,
            genesis.hash.ok_or(ChainError::Unsealed { height: 0 })?
        );

        Ok(Self {
            config,
            target,
            blocks: vec![genesis],
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn get(&self, height: usize) -> Option<&Block> {
        self.blocks.get(height)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Unsealed block carrying `payload` that links to the current tip.
    pub fn candidate(&self, payload: impl Into<Vec<u8>>) -> Block {
        Block::new(payload, self.tip().hash, self.config.difficulty)
    }

    /// Mints a block on top of the tip and appends it once sealed.
    pub fn append(&mut self, payload: impl Into<Vec<u8>>) -> Result<&Block> {
        let mut block = self.candidate(payload);
        block.seal(&self.config)?;
        self.push(block)
    }

    /// Appends an already sealed block. It must extend the current tip at the
    /// chain's difficulty.
    pub fn push(&mut self, block: Block) -> Result<&Block> {
        let height = self.blocks.len();

        if block.prev_block_hash.is_none() || block.prev_block_hash != self.tip().hash {
            return Err(ChainError::BrokenLink { height });
        }

        self.check_block(height, &block)?;

        info!(
            "block {height} sealed: nonce={} hash={}",
            block.nonce,
            block.hash.ok_or(ChainError::Unsealed { height })?
        );

        self.blocks.push(block);
        Ok(self.tip())
    }

    /// Full tamper check: genesis shape, every link, and every seal.
    pub fn verify(&self) -> Result<()> {
        let Some(genesis) = self.blocks.first() else {
            return Err(ChainError::InvalidGenesis);
        };
        if !genesis.is_genesis() {
            return Err(ChainError::InvalidGenesis);
        }

        for (height, block) in self.blocks.iter().enumerate() {
            self.check_block(height, block)?;

            if height > 0 {
                let prev_block = &self.blocks[height - 1];
                if block.prev_block_hash.is_none() || block.prev_block_hash != prev_block.hash {
                    return Err(ChainError::BrokenLink { height });
                }
            }
        }

        Ok(())
    }

    /// Changes the nonce ceiling used by later appends.
    pub fn set_max_nonce(&mut self, max_nonce: i64) {
        self.config.max_nonce = max_nonce;
    }

    // equal difficulty means the block was held to the chain target
    fn check_block(&self, height: usize, block: &Block) -> Result<()> {
        if block.difficulty != self.config.difficulty {
            return Err(ChainError::DifficultyMismatch {
                height,
                expected: self.config.difficulty,
                found: block.difficulty,
            });
        }

        block.check_seal(height)
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}
