//! Pool creation, allowances and mint in one step

use alloy::primitives::{Address, TxHash, U256};
use tracing::info;
use crate::{
    config::{DEFAULT_TICK_LOWER, DEFAULT_TICK_UPPER},
    dex::Dex,
    errors::BotResult,
    pools::MintRequest,
    types::TokenRef,
    utils::short,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityOutcome {
    pub pool: Address,
    pub pool_tx: Option<TxHash>,
    pub mint_tx: Option<TxHash>,
}

impl Dex<'_> {
    /// Ensures the pool exists, approves the position manager for both
    /// amounts, then mints over the default tick range with zero minimums.
    ///
    /// Steps already performed are not rolled back when a later one fails.
    pub async fn ensure_pool_and_add_liquidity(
        &self,
        a: impl Into<TokenRef>,
        b: impl Into<TokenRef>,
        fee: u32,
        amount_a: U256,
        amount_b: U256,
    ) -> BotResult<LiquidityOutcome> {
        let (a, b) = (a.into(), b.into());

        let (pool_tx, pool) = self.ensure_pool(a.clone(), b.clone(), fee).await?;
        if let Some(tx) = pool_tx {
            info!("🏊 lp ensure: pool created tx={} addr={}", short(&tx.to_string()), short(&pool.to_checksum(None)));
        }

        let spender = self.contracts().position_manager;
        self.ensure_allowance(a.clone(), spender, amount_a).await?;
        self.ensure_allowance(b.clone(), spender, amount_b).await?;

        let mint_tx = self
            .mint_liquidity(MintRequest {
                token_a: a,
                token_b: b,
                amount_a,
                amount_b,
                fee,
                tick_lower: DEFAULT_TICK_LOWER,
                tick_upper: DEFAULT_TICK_UPPER,
                amount0_min: U256::ZERO,
                amount1_min: U256::ZERO,
            })
            .await?;

        Ok(LiquidityOutcome { pool, pool_tx, mint_tx })
    }
}
