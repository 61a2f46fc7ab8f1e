//! Liquidity position minting

use alloy::{
    primitives::{aliases::{I24, U24}, TxHash, U256},
    sol_types::SolCall,
};
use tracing::info;
use crate::{
    dex::{abi::INonfungiblePositionManager, Dex},
    errors::{enforce, BotError, BotResult},
    types::{orient_amounts, ActionKind, PoolKey, TokenRef},
    utils::short,
};

/// Caller-oriented mint parameters: `amount_a` belongs to `token_a`
/// whatever the canonical order turns out to be.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub token_a: TokenRef,
    pub token_b: TokenRef,
    pub amount_a: U256,
    pub amount_b: U256,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_min: U256,
    pub amount1_min: U256,
}

fn tick(value: i32) -> BotResult<I24> {
    I24::try_from(value).map_err(|_| BotError::Config(format!("tick {} out of int24 range", value)))
}

impl Dex<'_> {
    pub async fn mint_liquidity(&self, request: MintRequest) -> BotResult<Option<TxHash>> {
        let context = format!(
            "{}/{} fee={} amounts={}/{}",
            request.token_a, request.token_b, request.fee, request.amount_a, request.amount_b
        );
        let result = self.try_mint(request).await;
        enforce(ActionKind::MintLiquidity, &context, result)
    }

    async fn try_mint(&self, request: MintRequest) -> BotResult<TxHash> {
        let a = self.registry().resolve(request.token_a)?;
        let b = self.registry().resolve(request.token_b)?;

        let (key, flipped) = PoolKey::canonical(a.address, b.address, request.fee);
        let (amount0, amount1) = orient_amounts(flipped, request.amount_a, request.amount_b);

        let params = INonfungiblePositionManager::MintParams {
            token0: key.token0,
            token1: key.token1,
            fee: U24::from(request.fee),
            tickLower: tick(request.tick_lower)?,
            tickUpper: tick(request.tick_upper)?,
            amount0Desired: amount0,
            amount1Desired: amount1,
            amount0Min: request.amount0_min,
            amount1Min: request.amount1_min,
            recipient: self.owner(),
            deadline: self.deadline().await?,
        };
        let input = INonfungiblePositionManager::mintCall { params }.abi_encode();
        let confirmation = self
            .submit(ActionKind::MintLiquidity, self.contracts().position_manager, input.into(), U256::ZERO)
            .await?;

        info!(
            "💧 lp mint {}/{} fee={} | {}",
            self.registry().label_for(&key.token0),
            self.registry().label_for(&key.token1),
            request.fee,
            short(&confirmation.tx_hash.to_string())
        );
        Ok(confirmation.tx_hash)
    }
}
