//! Symbol and address lookups over the normalized token table

use alloy::primitives::Address;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use tracing::debug;
use crate::{
    errors::{BotError, BotResult},
    types::{ResolvedToken, TokenEntry, TokenRef, DEFAULT_DECIMALS},
    utils::short,
};

/// Read-only after construction; shared by reference for the whole run.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    by_symbol: BTreeMap<String, TokenEntry>,
    by_address: HashMap<String, String>,
}

fn address_key(address: &Address) -> String {
    format!("{:x}", address)
}

fn parse_literal(raw: &str) -> BotResult<Address> {
    let trimmed = raw.trim();
    let valid = trimmed.len() == 42 && (trimmed.starts_with("0x") || trimmed.starts_with("0X"));
    if !valid {
        return Err(BotError::InvalidTokenReference {
            reference: raw.to_string(),
        });
    }
    Address::from_str(&trimmed[2..]).map_err(|_| BotError::InvalidTokenReference {
        reference: raw.to_string(),
    })
}

impl TokenRegistry {
    pub fn new(entries: impl IntoIterator<Item = TokenEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry
                .by_address
                .insert(address_key(&entry.address), entry.symbol.clone());
            registry.by_symbol.insert(entry.symbol.clone(), entry);
        }
        debug!("Token registry loaded with {} symbols", registry.by_symbol.len());
        registry
    }

    /// Resolves any token reference to an address and its decimals.
    ///
    /// Unknown symbols fall through to being parsed as a literal address.
    /// Decimals default to 18 for addresses the table does not know.
    pub fn resolve(&self, reference: impl Into<TokenRef>) -> BotResult<ResolvedToken> {
        let address = match reference.into() {
            TokenRef::Entry(entry) => {
                return Ok(ResolvedToken {
                    address: entry.address,
                    decimals: entry.decimals,
                });
            }
            TokenRef::Symbol(symbol) => match self.by_symbol.get(&symbol) {
                Some(entry) => {
                    return Ok(ResolvedToken {
                        address: entry.address,
                        decimals: entry.decimals,
                    });
                }
                None => parse_literal(&symbol)?,
            },
            TokenRef::Address(raw) => parse_literal(&raw)?,
        };

        Ok(ResolvedToken {
            address,
            decimals: self.decimals_of(&address),
        })
    }

    /// Symbols in stable (sorted) order.
    pub fn symbols(&self) -> Vec<String> {
        self.by_symbol.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&TokenEntry> {
        self.by_symbol.get(symbol)
    }

    pub fn symbol_for(&self, address: &Address) -> Option<&str> {
        self.by_address.get(&address_key(address)).map(String::as_str)
    }

    /// Symbol when known, shortened address otherwise.
    pub fn label_for(&self, address: &Address) -> String {
        self.symbol_for(address)
            .map(str::to_string)
            .unwrap_or_else(|| short(&address.to_checksum(None)))
    }

    pub fn decimals_of(&self, address: &Address) -> u8 {
        self.symbol_for(address)
            .and_then(|s| self.by_symbol.get(s))
            .map(|e| e.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> TokenRegistry {
        TokenRegistry::new([
            TokenEntry {
                symbol: "WETH".to_string(),
                address: Address::repeat_byte(0xaa),
                decimals: 18,
            },
            TokenEntry {
                symbol: "USDC".to_string(),
                address: Address::repeat_byte(0xbb),
                decimals: 6,
            },
        ])
    }

    #[test]
    fn resolves_symbols_with_decimals() {
        let token = registry().resolve("USDC").unwrap();
        assert_eq!(token.address, Address::repeat_byte(0xbb));
        assert_eq!(token.decimals, 6);
    }

    #[test]
    fn known_address_resolves_to_table_decimals() {
        let reg = registry();
        let lower = format!("{:#x}", Address::repeat_byte(0xbb));
        assert_eq!(reg.resolve(lower.as_str()).unwrap().decimals, 6);
        assert_eq!(reg.symbol_for(&Address::repeat_byte(0xbb)), Some("USDC"));
    }

    #[test]
    fn unknown_symbol_is_an_invalid_reference() {
        let err = registry().resolve("DOGE").unwrap_err();
        assert!(matches!(err, BotError::InvalidTokenReference { .. }));
    }

    #[test]
    fn unknown_address_defaults_to_eighteen_decimals() {
        let reg = registry();
        let token = reg.resolve(Address::repeat_byte(0x11)).unwrap();
        assert_eq!(token.decimals, 18);
        assert_eq!(reg.symbol_for(&token.address), None);
        assert!(reg.label_for(&token.address).contains('…'));
    }

    #[test]
    fn symbols_are_sorted() {
        assert_eq!(registry().symbols(), vec!["USDC".to_string(), "WETH".to_string()]);
    }

    proptest! {
        #[test]
        fn resolve_is_idempotent_on_checksummed_addresses(bytes in any::<[u8; 20]>()) {
            let reg = registry();
            let address = Address::from(bytes);
            let first = reg.resolve(address.to_checksum(None)).unwrap();
            let second = reg.resolve(first.address.to_checksum(None)).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.address, address);
        }
    }
}
