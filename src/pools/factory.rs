//! Pool lookup and creation

use alloy::{
    primitives::{aliases::{U160, U24}, Address, TxHash, U256},
    sol_types::SolCall,
};
use tracing::info;
use crate::{
    dex::{abi::{INonfungiblePositionManager, IUniswapV3Factory}, Dex},
    errors::{enforce, BotResult},
    types::{ActionKind, PoolKey, TokenRef},
    utils::short,
};

/// `sqrtPriceX96` for a 1:1 starting price.
pub fn initial_sqrt_price() -> U160 {
    U160::from(1u8) << 96usize
}

impl Dex<'_> {
    /// Pool address for the pair, or the zero address when no pool exists.
    ///
    /// A failed lookup is logged and also reported as the zero address.
    pub async fn get_pool(
        &self,
        a: impl Into<TokenRef>,
        b: impl Into<TokenRef>,
        fee: u32,
    ) -> BotResult<Address> {
        let (a, b) = (a.into(), b.into());
        let context = format!("{}/{} fee={}", a, b, fee);
        let result = self.try_get_pool(a, b, fee).await;
        Ok(enforce(ActionKind::PoolLookup, &context, result)?.unwrap_or(Address::ZERO))
    }

    async fn try_get_pool(&self, a: TokenRef, b: TokenRef, fee: u32) -> BotResult<Address> {
        let a = self.registry().resolve(a)?;
        let b = self.registry().resolve(b)?;
        self.read(
            self.contracts().factory,
            IUniswapV3Factory::getPoolCall {
                tokenA: a.address,
                tokenB: b.address,
                fee: U24::from(fee),
            },
        )
        .await
    }

    /// Creates and initializes the pool unless it already exists.
    ///
    /// Returns the creation transaction (if one was sent) and the pool
    /// address read back from the factory.
    pub async fn ensure_pool(
        &self,
        a: impl Into<TokenRef>,
        b: impl Into<TokenRef>,
        fee: u32,
    ) -> BotResult<(Option<TxHash>, Address)> {
        let (a, b) = (a.into(), b.into());
        let context = format!("{}/{} fee={}", a, b, fee);
        let result = self.try_ensure_pool(a, b, fee).await;
        Ok(enforce(ActionKind::CreatePool, &context, result)?.unwrap_or((None, Address::ZERO)))
    }

    async fn try_ensure_pool(&self, a: TokenRef, b: TokenRef, fee: u32) -> BotResult<(Option<TxHash>, Address)> {
        let a = self.registry().resolve(a)?;
        let b = self.registry().resolve(b)?;

        let existing = self.get_pool(a.address, b.address, fee).await?;
        if existing != Address::ZERO {
            return Ok((None, existing));
        }

        let (key, _) = PoolKey::canonical(a.address, b.address, fee);
        let input = INonfungiblePositionManager::createAndInitializePoolIfNecessaryCall {
            token0: key.token0,
            token1: key.token1,
            fee: U24::from(fee),
            sqrtPriceX96: initial_sqrt_price(),
        }
        .abi_encode();
        let confirmation = self
            .submit(ActionKind::CreatePool, self.contracts().position_manager, input.into(), U256::ZERO)
            .await?;

        let pool = self.get_pool(key.token0, key.token1, fee).await?;
        info!(
            "🏊 pool ensure {}/{} fee={} pool={} | {}",
            self.registry().label_for(&key.token0),
            self.registry().label_for(&key.token1),
            fee,
            short(&pool.to_checksum(None)),
            short(&confirmation.tx_hash.to_string())
        );
        Ok((Some(confirmation.tx_hash), pool))
    }
}
