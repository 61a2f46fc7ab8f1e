//! On-chain action kinds, outcomes and run reports

use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;
use crate::{errors::BotError, types::TokenSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Approve,
    TransferErc20,
    TransferNative,
    Swap,
    PoolLookup,
    CreatePool,
    MintLiquidity,
    TokenSpec,
    DeployToken,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Approve => "approve",
            ActionKind::TransferErc20 => "transfer erc20",
            ActionKind::TransferNative => "transfer native",
            ActionKind::Swap => "swap",
            ActionKind::PoolLookup => "pool lookup",
            ActionKind::CreatePool => "pool create",
            ActionKind::MintLiquidity => "lp mint",
            ActionKind::TokenSpec => "token spec",
            ActionKind::DeployToken => "token deploy",
        };
        f.write_str(label)
    }
}

/// Result of a single action: a transaction hash on success, a reason on failure.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub action: ActionKind,
    pub detail: String,
    pub tx_hash: Option<TxHash>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActionOutcome {
    pub fn success(action: ActionKind, detail: impl Into<String>, tx_hash: Option<TxHash>) -> Self {
        Self {
            action,
            detail: detail.into(),
            tx_hash,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(action: ActionKind, detail: impl Into<String>, error: &BotError) -> Self {
        Self {
            action,
            detail: detail.into(),
            tx_hash: None,
            error: Some(error.to_string()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    pub wallet: Address,
    pub outcomes: Vec<ActionOutcome>,
    pub token_spec: Option<TokenSpec>,
}

impl WalletReport {
    pub fn new(wallet: Address) -> Self {
        Self {
            wallet,
            outcomes: Vec::new(),
            token_spec: None,
        }
    }

    pub fn record(&mut self, outcome: ActionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.outcomes.iter().filter(|o| o.action == kind).count()
    }

    pub fn transfers(&self) -> usize {
        self.count(ActionKind::TransferErc20) + self.count(ActionKind::TransferNative)
    }
}

/// A wallet whose run was cut short, with the actions it got through.
#[derive(Debug, Clone, Serialize)]
pub struct WalletFailure {
    pub wallet: Address,
    pub reason: String,
    pub partial: WalletReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub selected: Vec<Address>,
    pub skipped: Vec<Address>,
    pub completed: Vec<WalletReport>,
    pub failed: Vec<WalletFailure>,
}

impl BatchReport {
    pub fn new(selected: Vec<Address>) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            selected,
            skipped: Vec::new(),
            completed: Vec::new(),
            failed: Vec::new(),
        }
    }
}
