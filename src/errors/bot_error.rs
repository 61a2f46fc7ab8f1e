//! Custom error types for the bot

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Contract interaction failed: {contract} - {message}")]
    Contract {
        contract: Address,
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Transaction {tx_hash} reverted")]
    Reverted {
        tx_hash: TxHash,
    },

    #[error("Invalid token reference: {reference:?}")]
    InvalidTokenReference {
        reference: String,
    },

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Contract compilation failed: {message}")]
    Compilation {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Interrupted by shutdown signal")]
    Interrupted,
}

impl BotError {
    pub fn is_interrupt(&self) -> bool {
        matches!(self, BotError::Interrupted)
    }

    /// Wraps an RPC transport failure with a short description of the call.
    pub fn rpc<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BotError::Network {
            message: message.into(),
            source: Some(source.into()),
            retry_count: 0,
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
