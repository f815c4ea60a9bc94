use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::thread;

use log::{debug, warn};

use crate::{
    CANCEL_CHECK_INTERVAL,
    error::{ChainError, Result},
    sha256::Hash,
    target::Target,
    types::Block,
};

const ATOMIC_ORDERING: Ordering = Ordering::Relaxed;

/// Outcome of a successful search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seal {
    pub nonce: i64,
    pub hash: Hash,
}

/// Brute-force nonce search over a block's committed fields.
///
/// The preimage for nonce `n` is
/// `prev_block_hash || payload || timestamp || difficulty || n`, with the three
/// integers rendered as big-endian `i64` and nothing between the parts. The
/// genesis block has no predecessor and contributes no bytes for it.
pub struct ProofOfWork<'a> {
    block: &'a Block,
    target: Target,
    max_nonce: i64,
}

impl<'a> ProofOfWork<'a> {
    pub fn new(block: &'a Block) -> Result<Self> {
        let target = Target::from_difficulty(block.difficulty)?;
        Ok(Self {
            block,
            target,
            max_nonce: crate::MAX_NONCE,
        })
    }

    pub fn with_max_nonce(mut self, max_nonce: i64) -> Self {
        self.max_nonce = max_nonce;
        self
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn prepare_data(&self, nonce: i64) -> Vec<u8> {
        let mut data = Vec::with_capacity(32 + self.block.payload.len() + 24);
        if let Some(prev_block_hash) = &self.block.prev_block_hash {
            data.extend_from_slice(&prev_block_hash.as_bytes());
        }
        data.extend_from_slice(&self.block.payload);
        data.extend_from_slice(&self.block.timestamp.to_be_bytes());
        data.extend_from_slice(&i64::from(self.block.difficulty).to_be_bytes());
        data.extend_from_slice(&nonce.to_be_bytes());
        data
    }

    pub fn hash_at(&self, nonce: i64) -> Hash {
        Hash::digest(&self.prepare_data(nonce))
    }

    pub fn run(&self) -> Result<Seal> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Sequential search from nonce 0 that gives up once `cancel` is set.
    pub fn run_until(&self, cancel: &AtomicBool) -> Result<Seal> {
        debug!("searching for nonce below target {}", self.target);

        let best = AtomicI64::new(i64::MAX);
        match self.search_stride(0, 1, &best, cancel) {
            Ok(Some(seal)) => Ok(seal),
            Ok(None) => {
                warn!("nonce space below {} exhausted", self.max_nonce);
                Err(ChainError::NonceExhausted {
                    max_nonce: self.max_nonce,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Splits the nonce space by stride across `workers` threads.
    ///
    /// Every worker publishes the nonces it solves into a shared minimum and
    /// stops once its own stride has passed that minimum, so the winner is the
    /// lowest qualifying nonce, the same one `run` would find.
    pub fn run_parallel(&self, workers: usize, cancel: &AtomicBool) -> Result<Seal> {
        let workers = workers.max(1);
        if workers == 1 {
            return self.run_until(cancel);
        }

        debug!(
            "searching for nonce below target {} on {workers} workers",
            self.target
        );

        let best = AtomicI64::new(i64::MAX);
        let (sender, receiver) = flume::unbounded();

        thread::scope(|scope| {
            for worker in 0..workers {
                let sender = sender.clone();
                let best = &best;
                scope.spawn(move || {
                    let outcome = self.search_stride(worker as i64, workers as i64, best, cancel);
                    // receiver outlives the scope
                    let _ = sender.send(outcome);
                });
            }
        });
        drop(sender);

        let mut found: Option<Seal> = None;
        let mut cancelled_at: Option<i64> = None;
        for outcome in receiver.drain() {
            match outcome {
                Ok(Some(seal)) => {
                    if found.is_none_or(|current| seal.nonce < current.nonce) {
                        found = Some(seal);
                    }
                }
                Ok(None) => {}
                Err(ChainError::Cancelled { nonce }) => {
                    cancelled_at = Some(cancelled_at.map_or(nonce, |at| at.min(nonce)));
                }
                Err(e) => return Err(e),
            }
        }

        // a cancelled worker may have skipped a lower solution
        if let Some(nonce) = cancelled_at {
            warn!("parallel search cancelled");
            return Err(ChainError::Cancelled { nonce });
        }

        found.ok_or_else(|| {
            warn!("nonce space below {} exhausted", self.max_nonce);
            ChainError::NonceExhausted {
                max_nonce: self.max_nonce,
            }
        })
    }

    /// Recomputes the digest with the recorded nonce and checks it against the
    /// target. The block's stored hash is not consulted.
    pub fn validate(&self) -> bool {
        self.target.is_met_by(&self.hash_at(self.block.nonce))
    }

    fn search_stride(
        &self,
        start: i64,
        stride: i64,
        best: &AtomicI64,
        cancel: &AtomicBool,
    ) -> Result<Option<Seal>> {
        let mut nonce = start;
        let mut attempts: i64 = 0;

        while nonce < self.max_nonce && nonce < best.load(ATOMIC_ORDERING) {
            if attempts % CANCEL_CHECK_INTERVAL == 0 && cancel.load(ATOMIC_ORDERING) {
                return Err(ChainError::Cancelled { nonce });
            }

            let hash = self.hash_at(nonce);
            if self.target.is_met_by(&hash) {
                best.fetch_min(nonce, ATOMIC_ORDERING);
                return Ok(Some(Seal { nonce, hash }));
            }

            attempts += 1;
            let Some(next) = nonce.checked_add(stride) else {
                break;
            };
            nonce = next;
        }

        Ok(None)
    }
}

/// Searches for the lowest nonce that seals `block` at its recorded difficulty.
pub fn seal(block: &Block) -> Result<Seal> {
    ProofOfWork::new(block)?.run()
}

/// Proof-of-work check for a block's recorded nonce. A block whose difficulty
/// cannot produce a target is invalid.
pub fn validate(block: &Block) -> bool {
    ProofOfWork::new(block)
        .map(|pow| pow.validate())
        .unwrap_or(false)
}
