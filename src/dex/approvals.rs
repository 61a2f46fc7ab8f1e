//! Allowance assurance

use alloy::{
    primitives::{Address, TxHash, U256},
    sol_types::SolCall,
};
use tracing::{debug, info};
use crate::{
    dex::{abi::IERC20, Dex},
    errors::{enforce, BotResult},
    types::{ActionKind, TokenRef},
    utils::{fmt_amount, short},
};

impl Dex<'_> {
    /// Approves `spender` for exactly `amount` unless the current allowance
    /// already covers it. Best-effort: failures are logged and yield `None`.
    pub async fn ensure_allowance(
        &self,
        token: impl Into<TokenRef>,
        spender: Address,
        amount: U256,
    ) -> BotResult<Option<TxHash>> {
        let token = token.into();
        let context = format!("{} -> {} amount={}", token, short(&spender.to_checksum(None)), amount);
        let result = self.try_ensure_allowance(token, spender, amount).await;
        Ok(enforce(ActionKind::Approve, &context, result)?.flatten())
    }

    async fn try_ensure_allowance(&self, token: TokenRef, spender: Address, amount: U256) -> BotResult<Option<TxHash>> {
        let token = self.registry().resolve(token)?;
        let current: U256 = self
            .read(
                token.address,
                IERC20::allowanceCall {
                    owner: self.owner(),
                    spender,
                },
            )
            .await?;

        let label = self.registry().label_for(&token.address);
        if current >= amount {
            debug!("✅ Allowance {} for {} already {}", label, short(&spender.to_checksum(None)), current);
            return Ok(None);
        }

        let input = IERC20::approveCall { spender, value: amount }.abi_encode();
        let confirmation = self
            .submit(ActionKind::Approve, token.address, input.into(), U256::ZERO)
            .await?;

        info!(
            "🔓 approve {} -> {} {} | {}",
            label,
            short(&spender.to_checksum(None)),
            fmt_amount(amount, token.decimals),
            short(&confirmation.tx_hash.to_string())
        );
        Ok(Some(confirmation.tx_hash))
    }
}
