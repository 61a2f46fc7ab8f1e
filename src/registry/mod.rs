//! Token registry: symbol and address lookups over the configured token table

pub mod token_registry;

pub use token_registry::*;
