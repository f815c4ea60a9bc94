mod block;
mod blockchain;

pub use block::Block;
pub use blockchain::Blockchain;
