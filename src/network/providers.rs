//! HTTP JSON-RPC provider setup and transaction submission

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::{eip2718::Encodable2718, BlockNumberOrTag},
    network::TxSignerSync,
    primitives::{Address, Bytes, TxKind},
    providers::{Provider, RootProvider},
    rpc::{client::RpcClient, types::TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::Http,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use crate::{
    errors::{BotError, BotResult},
    network::client::{ChainClient, ChainConnector, Confirmation},
    types::WalletCredential,
    utils::short,
};

pub const RPC_TIMEOUT_SECS: u64 = 30;
pub const RECEIPT_TIMEOUT_SECS: u64 = 300;

/// Connects wallets to a single HTTP JSON-RPC endpoint.
pub struct RpcConnector {
    rpc_url: reqwest::Url,
    http: reqwest::Client,
}

impl RpcConnector {
    pub fn new(rpc_url: &str) -> BotResult<Self> {
        let rpc_url = rpc_url
            .parse()
            .map_err(|e| BotError::Config(format!("OG_RPC is not a valid URL: {}", e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(RPC_TIMEOUT_SECS))
            .build()
            .map_err(|e| BotError::rpc("Failed to build HTTP client", e))?;
        Ok(Self { rpc_url, http })
    }

    fn provider(&self) -> RootProvider {
        let transport = Http::with_client(self.http.clone(), self.rpc_url.clone());
        RootProvider::new(RpcClient::new(transport, false))
    }

    /// Asks the endpoint for its chain id. Any failure means the node is
    /// unreachable and is reported as a network error.
    pub async fn check_connection(&self) -> BotResult<u64> {
        Self::chain_id(&self.provider(), &self.rpc_url).await
    }

    async fn chain_id(provider: &RootProvider, rpc_url: &reqwest::Url) -> BotResult<u64> {
        provider
            .get_chain_id()
            .await
            .map_err(|e| BotError::rpc(format!("RPC not connected: {}", rpc_url), e))
    }
}

#[async_trait]
impl ChainConnector for RpcConnector {
    async fn connect(&self, wallet: &WalletCredential) -> BotResult<Arc<dyn ChainClient>> {
        let provider = self.provider();
        let chain_id = Self::chain_id(&provider, &self.rpc_url).await?;

        debug!("🔗 Connected to chain {} for {}", chain_id, short(&wallet.address().to_checksum(None)));
        Ok(Arc::new(RpcChainClient {
            provider,
            signer: wallet.signer().clone(),
            chain_id,
            receipt_timeout: Duration::from_secs(RECEIPT_TIMEOUT_SECS),
        }))
    }
}

/// [`ChainClient`] over a live node, signing legacy transactions locally.
pub struct RpcChainClient {
    provider: RootProvider,
    signer: PrivateKeySigner,
    chain_id: u64,
    receipt_timeout: Duration,
}

impl RpcChainClient {
    fn tx_error(message: impl Into<String>, source: impl Into<anyhow::Error>) -> BotError {
        BotError::Network {
            message: message.into(),
            source: Some(source.into()),
            retry_count: 0,
        }
    }

    async fn sign(&self, request: TransactionRequest) -> BotResult<(Bytes, alloy::primitives::TxHash)> {
        let nonce = self
            .provider
            .get_transaction_count(self.signer.address())
            .await
            .map_err(|e| BotError::rpc("eth_getTransactionCount", e))?;
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| BotError::rpc("eth_gasPrice", e))?;

        let gas_limit = request
            .gas
            .ok_or_else(|| BotError::Config("transaction request without gas limit".to_string()))?;

        let mut tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: request.to.unwrap_or(TxKind::Create),
            value: request.value.unwrap_or_default(),
            input: request.input.into_input().unwrap_or_default(),
        };

        let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
            .map_err(|e| Self::tx_error("Sign tx failed", e))?;
        let signed: TxEnvelope = tx.into_signed(sig).into();
        Ok((signed.encoded_2718().into(), *signed.tx_hash()))
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn call(&self, tx: TransactionRequest) -> BotResult<Bytes> {
        let tx = tx.from(self.signer.address());
        self.provider
            .call(tx)
            .await
            .map_err(|e| BotError::rpc("eth_call", e))
    }

    async fn latest_timestamp(&self) -> BotResult<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| BotError::rpc("eth_getBlockByNumber", e))?
            .ok_or_else(|| BotError::Network {
                message: "latest block not available".to_string(),
                source: None,
                retry_count: 0,
            })?;
        Ok(block.header.timestamp)
    }

    async fn send_and_confirm(&self, tx: TransactionRequest) -> BotResult<Confirmation> {
        let (raw, tx_hash) = self.sign(tx).await?;
        debug!("📤 Submitting {}", short(&tx_hash.to_string()));

        let receipt = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| BotError::rpc("eth_sendRawTransaction", e))?
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| Self::tx_error(format!("waiting for receipt of {}", short(&tx_hash.to_string())), e))?;

        if !receipt.status() {
            return Err(BotError::Reverted {
                tx_hash: receipt.transaction_hash,
            });
        }

        info!("⛏️ Mined {} in block {:?}", short(&receipt.transaction_hash.to_string()), receipt.block_number);
        Ok(Confirmation {
            tx_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_endpoint_is_reported_as_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let connector = RpcConnector::new(&server.url()).unwrap();
        let err = connector.check_connection().await.unwrap_err();
        assert!(matches!(err, BotError::Network { .. }));
        assert!(err.to_string().contains("RPC not connected"));
    }

    #[tokio::test]
    async fn refused_connection_is_reported_as_network_error() {
        let connector = RpcConnector::new("http://127.0.0.1:1").unwrap();
        let err = connector.check_connection().await.unwrap_err();
        assert!(matches!(err, BotError::Network { .. }));
    }

    #[test]
    fn malformed_url_is_a_configuration_error() {
        assert!(matches!(RpcConnector::new("not a url"), Err(BotError::Config(_))));
    }
}
