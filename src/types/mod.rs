//! Core data types and structures

pub mod actions;
pub mod addresses;
pub mod tokens;
pub mod token_spec;
pub mod wallet;

pub use actions::*;
pub use addresses::*;
pub use tokens::*;
pub use token_spec::*;
pub use wallet::*;
