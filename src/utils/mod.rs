//! Utility functions and helpers

pub mod display;
pub mod logging;
pub mod pacing;

pub use display::*;
pub use logging::*;
pub use pacing::*;
