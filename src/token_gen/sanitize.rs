//! Normalizes raw token selections into a valid [`TokenSpec`]

use alloy::primitives::U256;
use rand::Rng;
use serde_json::{json, Map, Value};
use std::str::FromStr;
use crate::types::{TokenKind, TokenParams, TokenSpec, DEFAULT_DECIMALS, MAX_DECIMALS};

pub const DEFAULT_INITIAL_SUPPLY: &str = "1000000000000000000";
pub const DEFAULT_CAP: &str = "100000000000000000000000";
pub const FALLBACK_INITIAL_SUPPLY: &str = "1000000000000000000000";

fn farm_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Farm{}", rng.random_range(100..=999))
}

fn farm_symbol<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("F{}", rng.random_range(10..=99))
}

/// Selection used when every text-generation provider failed.
pub fn local_fallback<R: Rng + ?Sized>(rng: &mut R) -> Value {
    json!({
        "kind": TokenKind::CappedBurnable.tag(),
        "params": {
            "name": farm_name(rng),
            "symbol": farm_symbol(rng),
            "decimals": DEFAULT_DECIMALS,
            "initial_supply": FALLBACK_INITIAL_SUPPLY,
            "cap": DEFAULT_CAP,
        }
    })
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decimals(value: Option<&Value>) -> u8 {
    let parsed = match value {
        None => Some(DEFAULT_DECIMALS as i64),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(d) => d.clamp(0, MAX_DECIMALS as i64) as u8,
        None => DEFAULT_DECIMALS,
    }
}

/// Base-unit amount as a plain decimal string, if the value is one.
fn amount(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            U256::from_str(s).ok().map(|v| v.to_string())
        }
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.to_string())
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| format!("{:.0}", f.trunc()))),
        _ => None,
    }
}

/// Turns any JSON value into a usable spec. Never fails: missing or invalid
/// fields are replaced with defaults.
pub fn sanitize<R: Rng + ?Sized>(raw: &Value, rng: &mut R) -> TokenSpec {
    let kind = raw
        .get("kind")
        .and_then(Value::as_str)
        .and_then(TokenKind::from_tag)
        .unwrap_or(TokenKind::CappedBurnable);

    let empty = Map::new();
    let params = raw.get("params").and_then(Value::as_object).unwrap_or(&empty);

    let name = text(params.get("name")).unwrap_or_else(|| farm_name(rng));
    let symbol = text(params.get("symbol")).unwrap_or_else(|| farm_symbol(rng));
    let initial_supply = amount(params.get("initial_supply")).unwrap_or_else(|| DEFAULT_INITIAL_SUPPLY.to_string());
    let cap = match kind {
        TokenKind::CappedBurnable => Some(amount(params.get("cap")).unwrap_or_else(|| DEFAULT_CAP.to_string())),
        _ => None,
    };

    TokenSpec {
        kind,
        params: TokenParams {
            name,
            symbol,
            decimals: decimals(params.get("decimals")),
            initial_supply,
            cap,
        },
    }
}
