//! Display helpers for log lines

use alloy::primitives::U256;
use rust_decimal::prelude::*;
use crate::types::{BatchReport, WalletReport};
use tracing::info;

const SHORT_KEEP: usize = 6;
const MAX_FRACTION_DIGITS: u32 = 8;

/// Shortens a hash or address to `0x123456…abcdef`.
pub fn short(value: &str) -> String {
    let keep = SHORT_KEEP;
    let chars: Vec<char> = value.chars().collect();
    if value.starts_with("0x") && chars.len() > 2 * keep + 2 {
        let head: String = chars[..2 + keep].iter().collect();
        let tail: String = chars[chars.len() - keep..].iter().collect();
        return format!("{}…{}", head, tail);
    }
    if chars.len() > 2 * keep {
        let head: String = chars[..keep].iter().collect();
        let tail: String = chars[chars.len() - keep..].iter().collect();
        return format!("{}…{}", head, tail);
    }
    value.to_string()
}

/// Formats a base-unit amount as a human-readable decimal, truncated to
/// eight fractional digits.
pub fn fmt_amount(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    if let Ok(small) = i128::try_from(raw) {
        if let Ok(value) = Decimal::try_from_i128_with_scale(small, decimals as u32) {
            return value
                .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::ToZero)
                .normalize()
                .to_string();
        }
    }

    // Beyond Decimal's 96-bit mantissa
    let unit = U256::from(10u8).pow(U256::from(decimals));
    let whole = raw / unit;
    let frac = raw % unit;
    if frac.is_zero() {
        return whole.to_string();
    }
    let padded = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    let cut: String = trimmed.chars().take(MAX_FRACTION_DIGITS as usize).collect();
    let cut = cut.trim_end_matches('0');
    if cut.is_empty() {
        return whole.to_string();
    }
    format!("{}.{}", whole, cut)
}

pub fn print_wallet_summary(report: &WalletReport) {
    let failed = report.outcomes.iter().filter(|o| !o.is_success()).count();
    info!(
        "📋 Wallet {}: {} actions ({} failed)",
        short(&report.wallet.to_checksum(None)),
        report.outcomes.len(),
        failed
    );
}

pub fn print_batch_summary(report: &BatchReport) {
    info!("\n📊 Batch {} summary", report.batch_id);
    info!("   Selected: {}", report.selected.len());
    info!("   Skipped: {}", report.skipped.len());
    info!("   Completed: {}", report.completed.len());
    info!("   Failed: {}", report.failed.len());
    for failure in &report.failed {
        info!("     {} - {}", short(&failure.wallet.to_checksum(None)), failure.reason);
    }
}
