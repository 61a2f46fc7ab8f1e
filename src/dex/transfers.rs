//! ERC-20 and native transfers

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    sol_types::SolCall,
};
use tracing::info;
use crate::{
    dex::{abi::IERC20, Dex},
    errors::{enforce, BotResult},
    types::{ActionKind, TokenRef},
    utils::{fmt_amount, short},
};

impl Dex<'_> {
    pub async fn transfer_erc20(
        &self,
        token: impl Into<TokenRef>,
        to: Address,
        amount: U256,
    ) -> BotResult<Option<TxHash>> {
        let token = token.into();
        let context = format!("{} {} -> {}", amount, token, short(&to.to_checksum(None)));
        let result = self.try_transfer_erc20(token, to, amount).await;
        enforce(ActionKind::TransferErc20, &context, result)
    }

    async fn try_transfer_erc20(&self, token: TokenRef, to: Address, amount: U256) -> BotResult<TxHash> {
        let token = self.registry().resolve(token)?;
        let input = IERC20::transferCall { to, value: amount }.abi_encode();
        let confirmation = self
            .submit(ActionKind::TransferErc20, token.address, input.into(), U256::ZERO)
            .await?;

        info!(
            "💸 transfer erc20 {} {} -> {} | {}",
            fmt_amount(amount, token.decimals),
            self.registry().label_for(&token.address),
            short(&to.to_checksum(None)),
            short(&confirmation.tx_hash.to_string())
        );
        Ok(confirmation.tx_hash)
    }

    pub async fn transfer_native(&self, to: Address, amount_wei: U256) -> BotResult<Option<TxHash>> {
        let context = format!("{} wei -> {}", amount_wei, short(&to.to_checksum(None)));
        let result = self
            .submit(ActionKind::TransferNative, to, Bytes::new(), amount_wei)
            .await
            .map(|confirmation| {
                info!(
                    "💸 transfer native {} wei -> {} | {}",
                    amount_wei,
                    short(&to.to_checksum(None)),
                    short(&confirmation.tx_hash.to_string())
                );
                confirmation.tx_hash
            });
        enforce(ActionKind::TransferNative, &context, result)
    }
}
