/// Leading zero bits a sealed block's digest must carry.
pub const DIFFICULTY: u32 = 20;
/// Width of a SHA-256 digest in bits.
pub const DIGEST_BITS: u32 = 256;
/// Exclusive ceiling of the nonce search.
pub const MAX_NONCE: i64 = i64::MAX;
pub const GENESIS_PAYLOAD: &str = "Genesis Block";
/// How many nonces a search tries between looks at its cancel flag.
pub const CANCEL_CHECK_INTERVAL: i64 = 1 << 12;

pub mod config;
pub mod error;
pub mod pow;
pub mod sha256;
pub mod shared;
pub mod target;
pub mod types;

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

// a difficulty of zero puts the target at 2^256, one bit past U256
construct_uint! {
    pub struct U512(8);
}
