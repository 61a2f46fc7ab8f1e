//! Shared plumbing for the on-chain action primitives

use alloy::{
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
    sol_types::{SolCall, SolValue},
};
use crate::{
    config::{RunConfig, DEADLINE_SECS},
    errors::{BotError, BotResult},
    network::{ChainClient, Confirmation},
    registry::TokenRegistry,
    types::{ActionKind, ContractAddresses},
};

/// Minimum gas for token approvals and transfers.
pub const MIN_TOKEN_GAS: u64 = 60_000;

/// Action primitives for one wallet, bound to its chain client.
///
/// Every primitive routes its result through the failure policy table, so
/// callers get `Ok(None)` for absorbed failures and `Err` for propagated ones.
pub struct Dex<'a> {
    client: &'a dyn ChainClient,
    registry: &'a TokenRegistry,
    contracts: &'a ContractAddresses,
    gas_limit_default: u64,
}

impl<'a> Dex<'a> {
    pub fn new(
        client: &'a dyn ChainClient,
        registry: &'a TokenRegistry,
        contracts: &'a ContractAddresses,
        run: &RunConfig,
    ) -> Self {
        Self {
            client,
            registry,
            contracts,
            gas_limit_default: run.gas_limit_default,
        }
    }

    pub fn owner(&self) -> Address {
        self.client.address()
    }

    pub fn registry(&self) -> &TokenRegistry {
        self.registry
    }

    pub fn contracts(&self) -> &ContractAddresses {
        self.contracts
    }

    pub fn gas_limit_for(&self, kind: ActionKind) -> u64 {
        match kind {
            ActionKind::Approve | ActionKind::TransferErc20 => (self.gas_limit_default / 5).max(MIN_TOKEN_GAS),
            ActionKind::TransferNative => self.gas_limit_default / 10,
            _ => self.gas_limit_default,
        }
    }

    /// `eth_call` against `to`, decoding a single return value.
    pub(crate) async fn read<C, T>(&self, to: Address, call: C) -> BotResult<T>
    where
        C: SolCall,
        T: SolValue + From<<T::SolType as alloy::sol_types::SolType>::RustType>,
    {
        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(call.abi_encode()).into());
        let data = self.client.call(tx).await?;
        T::abi_decode(&data).map_err(|e| BotError::Contract {
            contract: to,
            message: format!("Failed to decode {} result", C::SIGNATURE),
            source: e.into(),
        })
    }

    /// Signs, submits and waits for one transaction.
    pub(crate) async fn submit(
        &self,
        kind: ActionKind,
        to: Address,
        input: Bytes,
        value: U256,
    ) -> BotResult<Confirmation> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(input.into())
            .value(value)
            .gas_limit(self.gas_limit_for(kind));
        self.client.send_and_confirm(tx).await
    }

    /// Latest block timestamp plus the standard deadline window.
    pub(crate) async fn deadline(&self) -> BotResult<U256> {
        let now = self.client.latest_timestamp().await?;
        Ok(U256::from(now + DEADLINE_SECS))
    }
}
