//! Chain access, RPC providers and retry handling

pub mod client;
pub mod providers;
pub mod retry;

pub use client::*;
pub use providers::*;
pub use retry::*;
