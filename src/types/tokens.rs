//! Token table entries, token references and pool keys

use alloy::primitives::{Address, U256};
use serde::Serialize;

pub const DEFAULT_DECIMALS: u8 = 18;
pub const MAX_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenEntry {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

/// Any of the shapes a caller may use to name a token.
///
/// Resolved once by the registry into a [`ResolvedToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRef {
    Symbol(String),
    Address(String),
    Entry(TokenEntry),
}

impl From<&str> for TokenRef {
    fn from(value: &str) -> Self {
        if value.starts_with("0x") || value.starts_with("0X") {
            TokenRef::Address(value.to_string())
        } else {
            TokenRef::Symbol(value.to_string())
        }
    }
}

impl From<String> for TokenRef {
    fn from(value: String) -> Self {
        TokenRef::from(value.as_str())
    }
}

impl From<&String> for TokenRef {
    fn from(value: &String) -> Self {
        TokenRef::from(value.as_str())
    }
}

impl From<Address> for TokenRef {
    fn from(value: Address) -> Self {
        TokenRef::Address(value.to_checksum(None))
    }
}

impl From<&TokenEntry> for TokenRef {
    fn from(value: &TokenEntry) -> Self {
        TokenRef::Entry(value.clone())
    }
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenRef::Symbol(s) | TokenRef::Address(s) => f.write_str(s),
            TokenRef::Entry(e) => f.write_str(&e.symbol),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedToken {
    pub address: Address,
    pub decimals: u8,
}

/// Identity of a V3 pool. `token0 < token1` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
}

impl PoolKey {
    /// Sorts the pair into canonical order. The flag is `true` when `a` and
    /// `b` had to be swapped.
    pub fn canonical(a: Address, b: Address, fee: u32) -> (Self, bool) {
        if a < b {
            (Self { token0: a, token1: b, fee }, false)
        } else {
            (Self { token0: b, token1: a, fee }, true)
        }
    }
}

/// Maps caller-oriented amounts `(for a, for b)` onto the canonical
/// `(amount0, amount1)` slots.
pub fn orient_amounts(flipped: bool, amount_a: U256, amount_b: U256) -> (U256, U256) {
    if flipped {
        (amount_b, amount_a)
    } else {
        (amount_a, amount_b)
    }
}
