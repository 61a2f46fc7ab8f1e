//! Token generation capability used by the strategy engine

use alloy::primitives::Address;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;
use crate::{
    config::{DeployConfig, LlmConfig},
    errors::BotResult,
    network::ChainClient,
    token_gen::{
        compiler::compile,
        deploy::{creation_code, deploy_contract},
        llm::LlmClient,
        sanitize::{local_fallback, sanitize},
        template::render,
    },
    types::{DeployedToken, TokenSpec},
    utils::short,
};

#[async_trait]
pub trait TokenGenerationService: Send + Sync {
    /// Picks a token for `owner`. Always produces a valid spec.
    async fn select_token(&self, owner: Address) -> TokenSpec;

    /// Compiles and deploys `spec` from the client's wallet.
    async fn deploy_token(&self, client: &dyn ChainClient, spec: &TokenSpec) -> BotResult<DeployedToken>;
}

/// Remote text generation with a local fallback, plus `solc` based deployment.
pub struct TokenGenerator {
    llm: LlmClient,
    deploy: DeployConfig,
}

impl TokenGenerator {
    pub fn new(llm: &LlmConfig, deploy: &DeployConfig) -> BotResult<Self> {
        Ok(Self {
            llm: LlmClient::new(llm)?,
            deploy: deploy.clone(),
        })
    }

    pub fn from_parts(llm: LlmClient, deploy: DeployConfig) -> Self {
        Self { llm, deploy }
    }
}

fn finish_selection(raw: Option<serde_json::Value>) -> TokenSpec {
    let mut rng = rand::rng();
    let raw = raw.unwrap_or_else(|| {
        info!("🤖 LLM providers unavailable, using local defaults");
        local_fallback(&mut rng)
    });
    sanitize(&raw, &mut rng)
}

#[async_trait]
impl TokenGenerationService for TokenGenerator {
    async fn select_token(&self, owner: Address) -> TokenSpec {
        let raw = self.llm.request_selection(&owner.to_checksum(None)).await;
        finish_selection(raw)
    }

    async fn deploy_token(&self, client: &dyn ChainClient, spec: &TokenSpec) -> BotResult<DeployedToken> {
        let contract = render(spec, &self.deploy.solc_version)?;
        let compiled = compile(&self.deploy.solc_path, &contract).await?;
        let code = creation_code(&compiled.bytecode, contract.initial_supply);

        let confirmation = deploy_contract(
            client,
            code,
            self.deploy.gas_limit,
            Duration::from_secs(self.deploy.timeout_secs),
        )
        .await?;
        let address = confirmation.contract_address.unwrap_or_default();

        info!(
            "🪙 deploy {} address={} tx={}",
            contract.contract_name,
            address,
            short(&confirmation.tx_hash.to_string())
        );
        Ok(DeployedToken {
            address,
            tx_hash: confirmation.tx_hash,
            contract_name: contract.contract_name,
            display_name: contract.display_name,
        })
    }
}
