//! OG Auto Bot - randomized wallet activity for Uniswap V3 style DEXes
//!
//! For a pool of wallets the bot performs a random mix of swaps, self
//! transfers, liquidity provision and (optionally) token generation, with
//! human-like pauses in between. Wallets run strictly one at a time.

pub mod config;
pub mod dex;
pub mod errors;
pub mod network;
pub mod orchestrator;
pub mod pools;
pub mod registry;
pub mod strategy;
pub mod token_gen;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::{BotError, BotResult};
pub use types::*;
