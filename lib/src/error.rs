use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("difficulty {difficulty} must be below the {width}-bit digest width")]
    InvalidDifficulty { difficulty: u32, width: u32 },
    #[error("no nonce below {max_nonce} satisfies the target")]
    NonceExhausted { max_nonce: i64 },
    #[error("search cancelled at nonce {nonce}")]
    Cancelled { nonce: i64 },
    #[error("genesis block must not reference a predecessor")]
    InvalidGenesis,
    #[error("block {height} was sealed at difficulty {found}, chain requires {expected}")]
    DifficultyMismatch {
        height: usize,
        expected: u32,
        found: u32,
    },
    #[error("block {height} does not link to its predecessor")]
    BrokenLink { height: usize },
    #[error("block {height} is not sealed")]
    Unsealed { height: usize },
    #[error("block {height} digest does not match its contents")]
    DigestMismatch { height: usize },
    #[error("block {height} digest does not meet its target")]
    InsufficientWork { height: usize },
    #[error("chain lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, ChainError>;
