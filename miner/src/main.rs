use anyhow::{Result, anyhow};
use chainlib::{config::ChainConfig, pow::validate, types::Blockchain};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about=None)]
struct Cli {
    /// leading zero bits each block digest must carry
    #[arg(short, long, default_value_t = chainlib::DIFFICULTY)]
    difficulty: u32,
    /// nonce search threads
    #[arg(short, long, default_value_t = 1)]
    workers: usize,
    /// payloads to append after the genesis block
    #[arg(default_values_t = [
        String::from("Send 1 BTC to Ivan"),
        String::from("Send 2 more BTC to Ivan"),
    ])]
    payloads: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ChainConfig::new(cli.difficulty).with_workers(cli.workers);
    info!(
        "mining with difficulty {} on {} worker(s)",
        config.difficulty, config.workers
    );

    let mut chain = Blockchain::with_config(config)?;
    for payload in cli.payloads {
        chain.append(payload)?;
    }

    for block in chain.blocks() {
        let hash = block.hash.ok_or_else(|| anyhow!("chain holds an unsealed block"))?;

        println!("PoW: {}", validate(block));
        match block.prev_block_hash {
            Some(prev_block_hash) => println!("Prev. hash: {prev_block_hash}"),
            None => println!("Prev. hash: "),
        }
        println!("Data: {}", String::from_utf8_lossy(&block.payload));
        println!("Hash: {hash}");
        println!();
    }

    chain.verify()?;
    Ok(())
}
