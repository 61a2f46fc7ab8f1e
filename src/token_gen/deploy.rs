//! Contract deployment

use alloy::{
    network::TransactionBuilder,
    primitives::{Bytes, U256},
    rpc::types::TransactionRequest,
    sol_types::SolValue,
};
use std::time::Duration;
use tracing::info;
use crate::{
    errors::{BotError, BotResult},
    network::{ChainClient, Confirmation},
    utils::short,
};

/// Creation bytecode followed by the ABI-encoded `initialSupply` argument.
pub fn creation_code(bytecode: &Bytes, initial_supply: U256) -> Bytes {
    let mut code = bytecode.to_vec();
    code.extend_from_slice(&initial_supply.abi_encode());
    code.into()
}

/// Sends the creation transaction and waits for its receipt, bounded by
/// `timeout`.
pub async fn deploy_contract(
    client: &dyn ChainClient,
    code: Bytes,
    gas_limit: u64,
    timeout: Duration,
) -> BotResult<Confirmation> {
    let tx = TransactionRequest::default()
        .into_create()
        .input(code.into())
        .gas_limit(gas_limit);

    let confirmation = tokio::time::timeout(timeout, client.send_and_confirm(tx))
        .await
        .map_err(|_| BotError::Network {
            message: format!("deployment not confirmed within {}s", timeout.as_secs()),
            source: None,
            retry_count: 0,
        })??;

    if confirmation.contract_address.is_none() {
        return Err(BotError::Network {
            message: format!("receipt {} has no contract address", short(&confirmation.tx_hash.to_string())),
            source: None,
            retry_count: 0,
        });
    }
    info!("🚀 Deployment confirmed | {}", short(&confirmation.tx_hash.to_string()));
    Ok(confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_argument_is_appended() {
        let code = creation_code(&Bytes::from_static(&[0x60, 0x80]), U256::from(5u8));
        assert_eq!(code.len(), 2 + 32);
        assert_eq!(code[..2], [0x60, 0x80]);
        assert_eq!(code[33], 5);
    }
}
