//! Pool lookup, creation and liquidity provisioning

pub mod factory;
pub mod liquidity;
pub mod positions;

pub use factory::*;
pub use liquidity::*;
pub use positions::*;
