//! Action primitives: allowances, transfers and swaps

pub mod abi;
pub mod approvals;
pub mod primitives;
pub mod swaps;
pub mod transfers;

pub use primitives::*;
