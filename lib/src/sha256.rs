use std::fmt;

use sha2::{Digest, Sha256};

use crate::U256;

/// A SHA-256 digest, held as a big-endian 256-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hash(U256);
impl Hash {
    pub fn digest(data: &[u8]) -> Self {
        let hash: [u8; 32] = Sha256::digest(data).into();
        Hash(U256::from_big_endian(&hash))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(U256::from_big_endian(&bytes))
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_big_endian()
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn leading_zeros(&self) -> u32 {
        self.0.leading_zeros()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}
