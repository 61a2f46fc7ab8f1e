//! Token specifications produced by the token generation service

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "erc20_fixed")]
    FixedSupply,
    #[serde(rename = "erc20_mintable")]
    Mintable,
    #[serde(rename = "erc20_capped_burnable")]
    CappedBurnable,
}

impl TokenKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "erc20_fixed" => Some(TokenKind::FixedSupply),
            "erc20_mintable" => Some(TokenKind::Mintable),
            "erc20_capped_burnable" => Some(TokenKind::CappedBurnable),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::FixedSupply => "erc20_fixed",
            TokenKind::Mintable => "erc20_mintable",
            TokenKind::CappedBurnable => "erc20_capped_burnable",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Base units, decimal string.
    pub initial_supply: String,
    /// Base units, decimal string. Always present for `CappedBurnable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub kind: TokenKind,
    pub params: TokenParams,
}

impl fmt::Display for TokenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) decimals={} supply={}",
            self.kind, self.params.name, self.params.symbol, self.params.decimals, self.params.initial_supply
        )?;
        if let Some(cap) = &self.params.cap {
            write!(f, " cap={}", cap)?;
        }
        Ok(())
    }
}

/// A token contract deployed from a [`TokenSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedToken {
    pub address: alloy::primitives::Address,
    pub tx_hash: alloy::primitives::TxHash,
    pub contract_name: String,
    pub display_name: String,
}
