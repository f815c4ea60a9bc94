use std::sync::atomic::AtomicBool;

use chainlib::{
    DIGEST_BITS, U512,
    config::ChainConfig,
    error::ChainError,
    pow::{ProofOfWork, seal, validate},
    sha256::Hash,
    target::compute_target,
    types::{Block, Blockchain},
};

const DIFFICULTY: u32 = 10;

fn sealed_chain(payloads: &[&str]) -> Blockchain {
    let mut chain = Blockchain::with_config(ChainConfig::new(DIFFICULTY)).unwrap();
    for payload in payloads {
        chain.append(*payload).unwrap();
    }
    chain
}

#[test]
fn target_matches_power_of_two_for_every_difficulty() {
    let mut previous = None;
    for difficulty in 0..DIGEST_BITS {
        let target = compute_target(difficulty).unwrap();
        assert_eq!(target.as_u512(), U512::one() << (DIGEST_BITS - difficulty) as usize);
        if let Some(previous) = previous {
            assert!(target < previous);
        }
        previous = Some(target);
    }
}

#[test]
fn every_sealed_block_validates() {
    let chain = sealed_chain(&["a", "b", "c"]);
    for block in chain.blocks() {
        assert!(validate(block));
        assert!(block.is_sealed());
    }
}

#[test]
fn sealing_identical_inputs_is_deterministic() {
    let prev = Hash::digest(b"predecessor");
    let block = Block::with_timestamp(1_600_000_000, "same", Some(prev), DIFFICULTY);
    let twin = block.clone();

    assert_eq!(seal(&block).unwrap(), seal(&twin).unwrap());
}

#[test]
fn single_byte_changes_alter_the_digest() {
    let prev = Hash::digest(b"predecessor");
    let block = Block::with_timestamp(1_600_000_000, "payload", Some(prev), DIFFICULTY);
    let original = block.compute_hash().unwrap();

    let mut payload = block.clone();
    payload.payload[0] ^= 0x01;
    assert_ne!(payload.compute_hash().unwrap(), original);

    let mut predecessor = block.clone();
    let mut bytes = prev.as_bytes();
    bytes[31] ^= 0x01;
    predecessor.prev_block_hash = Some(Hash::from_bytes(bytes));
    assert_ne!(predecessor.compute_hash().unwrap(), original);

    let mut timestamp = block.clone();
    timestamp.timestamp ^= 0x01;
    assert_ne!(timestamp.compute_hash().unwrap(), original);
}

#[test]
fn appended_chain_is_linked() {
    let chain = sealed_chain(&["Send 1 BTC to Ivan", "Send 2 more BTC to Ivan"]);
    let blocks: Vec<_> = chain.blocks().collect();

    assert_eq!(blocks.len(), 3);
    assert!(blocks[0].prev_block_hash.is_none());
    assert_eq!(blocks[1].prev_block_hash, blocks[0].hash);
    assert_eq!(blocks[2].prev_block_hash, blocks[1].hash);
    assert!(blocks.iter().all(|block| block.hash.is_some()));
}

#[test]
fn tampering_is_detectable_by_recomputation() {
    let chain = sealed_chain(&["honest"]);
    let mut genesis = chain.get(0).unwrap().clone();
    let stored = genesis.hash.unwrap();

    genesis.payload = b"tampered".to_vec();
    assert_ne!(genesis.compute_hash().unwrap(), stored);
    assert_eq!(
        genesis.check_seal(0),
        Err(ChainError::DigestMismatch { height: 0 })
    );
}

#[test]
fn zero_difficulty_qualifies_at_first_nonce() {
    let block = Block::new("anything", None, 0);
    assert_eq!(seal(&block).unwrap().nonce, 0);

    let chain = Blockchain::with_config(ChainConfig::new(0)).unwrap();
    assert_eq!(chain.tip().nonce, 0);
}

#[test]
fn difficulty_at_digest_width_is_a_configuration_error() {
    assert_eq!(
        compute_target(DIGEST_BITS),
        Err(ChainError::InvalidDifficulty {
            difficulty: DIGEST_BITS,
            width: DIGEST_BITS
        })
    );
    assert!(Blockchain::with_config(ChainConfig::new(DIGEST_BITS + 1)).is_err());
}

#[test]
fn exhaustion_and_cancellation_are_distinct_outcomes() {
    let block = Block::new("hard", None, DIGEST_BITS - 1);
    let pow = ProofOfWork::new(&block).unwrap().with_max_nonce(8);

    assert_eq!(pow.run(), Err(ChainError::NonceExhausted { max_nonce: 8 }));
    assert_eq!(
        pow.run_until(&AtomicBool::new(true)),
        Err(ChainError::Cancelled { nonce: 0 })
    );
}

#[test]
fn exhaustion_surfaces_from_genesis() {
    let config = ChainConfig::new(DIGEST_BITS - 1).with_max_nonce(4);
    assert_eq!(
        Blockchain::with_config(config).unwrap_err(),
        ChainError::NonceExhausted { max_nonce: 4 }
    );
}

#[test]
fn exhaustion_surfaces_from_append() {
    let mut chain = sealed_chain(&["sealed"]);
    let tip = chain.tip().clone();
    chain.set_max_nonce(0);

    assert_eq!(
        chain.append("never sealed"),
        Err(ChainError::NonceExhausted { max_nonce: 0 })
    );
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.tip(), &tip);
    assert_eq!(chain.verify(), Ok(()));
}

#[test]
fn parallel_chain_matches_search_baseline() {
    let config = ChainConfig::new(DIFFICULTY).with_workers(4);
    let mut chain = Blockchain::with_config(config).unwrap();
    chain.append("parallel").unwrap();

    for block in chain.blocks() {
        let mut unsealed = block.clone();
        unsealed.hash = None;
        unsealed.nonce = 0;
        let baseline = seal(&unsealed).unwrap();
        assert_eq!(Some(baseline.hash), block.hash);
        assert_eq!(baseline.nonce, block.nonce);
    }
    assert_eq!(chain.verify(), Ok(()));
}

#[test]
fn validate_ignores_stored_digest_but_verify_does_not() {
    let mut chain = sealed_chain(&["first"]);
    let forged = Hash::from_bytes([0u8; 32]);

    let mut block = chain.get(1).unwrap().clone();
    block.hash = Some(forged);
    assert!(validate(&block));
    assert_eq!(
        block.check_seal(1),
        Err(ChainError::DigestMismatch { height: 1 })
    );

    assert_eq!(chain.verify(), Ok(()));
    assert_eq!(chain.push(block), Err(ChainError::BrokenLink { height: 2 }));
}
