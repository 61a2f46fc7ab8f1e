//! Network addresses and the default token table

use alloy::primitives::{Address, address};

// Uniswap V3 deployment on the configured network
pub const DEFAULT_ROUTER: Address = address!("b95B5953FF8ee5D5d9818CdbEfE363ff2191318c");
pub const DEFAULT_POSITION_MANAGER: Address = address!("44f24B66b3BAa3A784dBeee9bFE602f15A2Cc5d9");
pub const DEFAULT_V3_FACTORY: Address = address!("7453582657F056ce5CfcEeE9E31E4BC390fa2b3c");

/// Built-in token table: (symbol, env override, address).
pub const DEFAULT_TOKENS: &[(&str, &str, &str)] = &[
    ("WETH", "TOKEN_WETH", "0x0fE9B43625fA7EdD663aDcEC0728DD635e4AbF7c"),
    ("USDC", "TOKEN_USDC", "0x3eC8A8705bE1D5ca90066b37ba62c4183B024ebf"),
    ("TKN1", "TOKEN_TKN1", "0x36f6414FF1df609214dDAbA71c84f18bcf00F67d"),
    ("TKN2", "TOKEN_TKN2", "0x78A8D4014000dF30b49eB0c29822B6C7C79D68cA"),
    ("TKN3", "TOKEN_TKN3", "0xba2aE6c8cddd628a087D7e43C1Ba9844c5Bf9638"),
    ("TKN4", "TOKEN_TKN4", "0x14d2F76020c1ECb29BcD673B51d8026C6836a66A"),
    ("wAOGI", "wAOGI", "0x006921B4B6DAc59342EA5e7d62f8351aeB65EEA8"),
];

/// Contracts the action primitives talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub router: Address,
    pub position_manager: Address,
    pub factory: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            router: DEFAULT_ROUTER,
            position_manager: DEFAULT_POSITION_MANAGER,
            factory: DEFAULT_V3_FACTORY,
        }
    }
}
