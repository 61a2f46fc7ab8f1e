//! Configuration management for the wallet activity bot

pub mod settings;
pub mod tokens;

pub use settings::*;
pub use tokens::*;
