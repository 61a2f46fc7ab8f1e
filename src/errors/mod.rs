//! Error types and the per-action failure policy

pub mod bot_error;
pub mod policy;

pub use bot_error::*;
pub use policy::*;
