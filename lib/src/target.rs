use std::fmt;

use crate::{
    DIGEST_BITS, U512,
    error::{ChainError, Result},
    sha256::Hash,
};

/// Exclusive upper bound a digest must fall under, `2^(DIGEST_BITS - difficulty)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target(U512);

impl Target {
    pub fn from_difficulty(difficulty: u32) -> Result<Self> {
        if difficulty >= DIGEST_BITS {
            return Err(ChainError::InvalidDifficulty {
                difficulty,
                width: DIGEST_BITS,
            });
        }

        Ok(Target(U512::one() << (DIGEST_BITS - difficulty) as usize))
    }

    pub fn is_met_by(&self, hash: &Hash) -> bool {
        U512::from_big_endian(&hash.as_bytes()) < self.0
    }

    pub fn as_u512(&self) -> U512 {
        self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

pub fn compute_target(difficulty: u32) -> Result<Target> {
    Target::from_difficulty(difficulty)
}
