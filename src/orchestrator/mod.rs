//! Batch selection and per-wallet failure isolation

pub mod batch;

pub use batch::*;
