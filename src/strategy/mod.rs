//! Randomized per-wallet action strategy

pub mod engine;
pub mod random;

pub use engine::*;
pub use random::*;
