//! Per-action failure policy
//!
//! Allowance assurance and pool lookups are best-effort: a failure is logged
//! and the caller carries on as if nothing happened. Everything that moves
//! funds or changes pool state propagates, so the orchestrator can truncate
//! the wallet's run.

use tracing::{error, warn};
use super::BotResult;
use crate::types::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and continue without a result.
    BestEffort,
    /// Log and hand the error to the caller.
    Propagate,
}

impl FailurePolicy {
    pub fn for_action(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Approve => FailurePolicy::BestEffort,
            ActionKind::PoolLookup => FailurePolicy::BestEffort,
            ActionKind::TokenSpec => FailurePolicy::BestEffort,
            ActionKind::TransferErc20
            | ActionKind::TransferNative
            | ActionKind::Swap
            | ActionKind::CreatePool
            | ActionKind::MintLiquidity
            | ActionKind::DeployToken => FailurePolicy::Propagate,
        }
    }
}

/// Applies the policy table to the result of one action.
///
/// `Ok(Some(v))` is a success, `Ok(None)` a failure absorbed by a best-effort
/// policy. An interrupt always propagates regardless of the table.
pub fn enforce<T>(kind: ActionKind, context: &str, result: BotResult<T>) -> BotResult<Option<T>> {
    let error = match result {
        Ok(value) => return Ok(Some(value)),
        Err(e) if e.is_interrupt() => return Err(e),
        Err(e) => e,
    };

    match FailurePolicy::for_action(kind) {
        FailurePolicy::BestEffort => {
            warn!("⚠️ {} failed ({}): {} - continuing", kind, context, error);
            Ok(None)
        }
        FailurePolicy::Propagate => {
            error!("❌ {} failed ({}): {}", kind, context, error);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BotError;
    use alloy::primitives::TxHash;

    fn reverted() -> BotError {
        BotError::Reverted { tx_hash: TxHash::ZERO }
    }

    #[test]
    fn approvals_are_absorbed() {
        let result: BotResult<u32> = Err(reverted());
        assert!(matches!(enforce(ActionKind::Approve, "WETH", result), Ok(None)));
    }

    #[test]
    fn fund_moving_actions_propagate() {
        for kind in [
            ActionKind::TransferErc20,
            ActionKind::TransferNative,
            ActionKind::Swap,
            ActionKind::CreatePool,
            ActionKind::MintLiquidity,
            ActionKind::DeployToken,
        ] {
            let result: BotResult<u32> = Err(reverted());
            assert!(enforce(kind, "ctx", result).is_err(), "{kind} should propagate");
        }
    }

    #[test]
    fn interrupts_bypass_best_effort() {
        let result: BotResult<u32> = Err(BotError::Interrupted);
        let err = enforce(ActionKind::Approve, "ctx", result).unwrap_err();
        assert!(err.is_interrupt());
    }

    #[test]
    fn successes_pass_through() {
        assert_eq!(enforce(ActionKind::Swap, "ctx", Ok(7)).unwrap(), Some(7));
    }
}
