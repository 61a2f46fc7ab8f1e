//! Chain access seam used by every action primitive

use alloy::{
    primitives::{Address, Bytes, TxHash},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use std::sync::Arc;
use crate::{errors::BotResult, types::WalletCredential};

/// Receipt data the bot cares about once a transaction is mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
}

/// A connected chain handle bound to one wallet.
///
/// `send_and_confirm` fills in nonce, gas price and chain id, signs with the
/// wallet's key, submits and waits for the receipt. A reverted receipt is an
/// error.
#[async_trait]
pub trait ChainClient: Send + Sync {
    fn address(&self) -> Address;

    async fn call(&self, tx: TransactionRequest) -> BotResult<Bytes>;

    async fn latest_timestamp(&self) -> BotResult<u64>;

    async fn send_and_confirm(&self, tx: TransactionRequest) -> BotResult<Confirmation>;
}

/// Produces a [`ChainClient`] for a wallet. Fails fast when the node is
/// unreachable.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, wallet: &WalletCredential) -> BotResult<Arc<dyn ChainClient>>;
}
