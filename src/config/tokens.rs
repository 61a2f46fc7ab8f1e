//! Token table loading
//!
//! Accepts the three shapes operators write token tables in: a bare address
//! string, an `{address|addr, decimals}` object, or an `[address, decimals?]`
//! pair. Entries without a usable address are dropped here, at load time.

use alloy::primitives::Address;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;
use crate::{
    errors::{BotError, BotResult},
    types::{TokenEntry, DEFAULT_DECIMALS, DEFAULT_TOKENS, MAX_DECIMALS},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenSource {
    Address(String),
    Entry {
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        addr: Option<String>,
        #[serde(default)]
        decimals: Option<Value>,
    },
    Tuple(Vec<Value>),
}

fn parse_decimals(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Some(raw.min(MAX_DECIMALS as u64) as u8)
}

fn parse_address(raw: &str) -> Option<Address> {
    let raw = raw.trim();
    if !raw.starts_with("0x") {
        return None;
    }
    Address::from_str(raw).ok()
}

/// Normalizes one symbol's configuration into a [`TokenEntry`].
///
/// `env_decimals` is the `<SYMBOL>_DECIMALS` override consulted for shapes
/// that carry no explicit decimals.
pub fn normalize_entry(symbol: &str, source: &TokenSource, env_decimals: Option<&str>) -> Option<TokenEntry> {
    let fallback_decimals = env_decimals
        .and_then(|d| parse_decimals(&Value::String(d.to_string())))
        .unwrap_or(DEFAULT_DECIMALS);

    let (raw_address, decimals) = match source {
        TokenSource::Address(a) => (Some(a.as_str()), fallback_decimals),
        TokenSource::Entry { address, addr, decimals } => (
            address.as_deref().filter(|a| !a.is_empty()).or(addr.as_deref()),
            decimals.as_ref().and_then(parse_decimals).unwrap_or(DEFAULT_DECIMALS),
        ),
        TokenSource::Tuple(items) => (
            items.first().and_then(Value::as_str),
            items.get(1).and_then(parse_decimals).unwrap_or(fallback_decimals),
        ),
    };

    let Some(raw_address) = raw_address.filter(|a| !a.trim().is_empty()) else {
        warn!("Dropping token {}: no address configured", symbol);
        return None;
    };
    let Some(address) = parse_address(raw_address) else {
        warn!("Dropping token {}: {:?} is not a valid address", symbol, raw_address);
        return None;
    };

    Some(TokenEntry {
        symbol: symbol.to_string(),
        address,
        decimals,
    })
}

/// Builds the token table from the built-in defaults, `TOKENS_JSON` and the
/// `EXTRA_TOKEN_*` variables, in that order; later sources override earlier
/// ones for the same symbol.
pub fn load_token_table<F>(lookup: F) -> BotResult<Vec<TokenEntry>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut sources: BTreeMap<String, TokenSource> = BTreeMap::new();

    for (symbol, env_name, default_address) in DEFAULT_TOKENS {
        let address = lookup(env_name).unwrap_or_else(|| default_address.to_string());
        sources.insert(symbol.to_string(), TokenSource::Address(address));
    }

    if let Some(raw) = lookup("TOKENS_JSON") {
        let table: BTreeMap<String, TokenSource> = serde_json::from_str(&raw)
            .map_err(|e| BotError::Config(format!("TOKENS_JSON is not a valid token table: {}", e)))?;
        sources.extend(table);
    }

    let mut entries: BTreeMap<String, TokenEntry> = sources
        .iter()
        .filter_map(|(symbol, source)| {
            let env_decimals = lookup(&format!("{}_DECIMALS", symbol));
            normalize_entry(symbol, source, env_decimals.as_deref()).map(|e| (symbol.clone(), e))
        })
        .collect();

    if let (Some(symbol), Some(address)) = (lookup("EXTRA_TOKEN_SYMBOL"), lookup("EXTRA_TOKEN_ADDRESS")) {
        let decimals = lookup("EXTRA_TOKEN_DECIMALS").map(Value::String);
        let source = TokenSource::Entry {
            address: Some(address),
            addr: None,
            decimals,
        };
        if let Some(entry) = normalize_entry(&symbol, &source, None) {
            entries.insert(symbol, entry);
        }
    }

    Ok(entries.into_values().collect())
}
