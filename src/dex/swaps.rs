//! Single-hop exact-input swaps through the V3 router

use alloy::{
    primitives::{aliases::{U160, U24}, TxHash, U256},
    sol_types::SolCall,
};
use tracing::info;
use crate::{
    dex::{abi::ISwapRouter, Dex},
    errors::{enforce, BotResult},
    types::{ActionKind, TokenRef},
    utils::{fmt_amount, short},
};

impl Dex<'_> {
    /// Swaps `amount_in` of `token_in` for `token_out`, paid to the wallet.
    ///
    /// `min_amount_out` is taken as given; zero accepts any price.
    pub async fn swap_exact_input_single(
        &self,
        token_in: impl Into<TokenRef>,
        token_out: impl Into<TokenRef>,
        amount_in: U256,
        min_amount_out: U256,
        fee: u32,
    ) -> BotResult<Option<TxHash>> {
        let (token_in, token_out) = (token_in.into(), token_out.into());
        let context = format!("{} -> {} in={} fee={}", token_in, token_out, amount_in, fee);
        let result = self
            .try_swap(token_in, token_out, amount_in, min_amount_out, fee)
            .await;
        enforce(ActionKind::Swap, &context, result)
    }

    async fn try_swap(
        &self,
        token_in: TokenRef,
        token_out: TokenRef,
        amount_in: U256,
        min_amount_out: U256,
        fee: u32,
    ) -> BotResult<TxHash> {
        let token_in = self.registry().resolve(token_in)?;
        let token_out = self.registry().resolve(token_out)?;

        let params = ISwapRouter::ExactInputSingleParams {
            tokenIn: token_in.address,
            tokenOut: token_out.address,
            fee: U24::from(fee),
            recipient: self.owner(),
            deadline: self.deadline().await?,
            amountIn: amount_in,
            amountOutMinimum: min_amount_out,
            sqrtPriceLimitX96: U160::ZERO,
        };
        let input = ISwapRouter::exactInputSingleCall { params }.abi_encode();
        let confirmation = self
            .submit(ActionKind::Swap, self.contracts().router, input.into(), U256::ZERO)
            .await?;

        info!(
            "🔄 swap {} {} -> {} minOut={} fee={} | {}",
            fmt_amount(amount_in, token_in.decimals),
            self.registry().label_for(&token_in.address),
            self.registry().label_for(&token_out.address),
            min_amount_out,
            fee,
            short(&confirmation.tx_hash.to_string())
        );
        Ok(confirmation.tx_hash)
    }
}
