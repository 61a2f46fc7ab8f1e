//! In-memory chain used by the integration tests
//!
//! `MockChain` decodes calldata with the same `sol!` bindings the bot uses,
//! keeps allowances and pools in memory and records every transaction.

#![allow(dead_code)]

use alloy::{
    primitives::{Address, Bytes, TxHash, TxKind, U256},
    rpc::types::TransactionRequest,
    sol_types::{SolCall, SolValue},
};
use async_trait::async_trait;
use og_auto_bot::{
    config::RunConfig,
    dex::abi::{IERC20, INonfungiblePositionManager, ISwapRouter, IUniswapV3Factory},
    errors::{BotError, BotResult},
    network::{ChainClient, ChainConnector, Confirmation},
    registry::TokenRegistry,
    strategy::StrategyContext,
    token_gen::TokenGenerationService,
    types::{ActionKind, ContractAddresses, PoolKey, TokenEntry, WalletCredential},
    utils::Pacer,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const BLOCK_TIMESTAMP: u64 = 1_700_000_000;
pub const DEPLOYED_ADDRESS: Address = Address::repeat_byte(0xde);

/// A transaction the mock accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Approve { token: Address, spender: Address, amount: U256 },
    TransferErc20 { token: Address, to: Address, amount: U256 },
    TransferNative { to: Address, value: U256 },
    Swap {
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_out: U256,
        recipient: Address,
        deadline: U256,
        gas_limit: u64,
    },
    CreatePool { token0: Address, token1: Address, fee: u32 },
    Mint { token0: Address, token1: Address, amount0: U256, amount1: U256 },
    Deploy { code: Bytes },
}

impl Sent {
    pub fn kind(&self) -> ActionKind {
        match self {
            Sent::Approve { .. } => ActionKind::Approve,
            Sent::TransferErc20 { .. } => ActionKind::TransferErc20,
            Sent::TransferNative { .. } => ActionKind::TransferNative,
            Sent::Swap { .. } => ActionKind::Swap,
            Sent::CreatePool { .. } => ActionKind::CreatePool,
            Sent::Mint { .. } => ActionKind::MintLiquidity,
            Sent::Deploy { .. } => ActionKind::DeployToken,
        }
    }
}

#[derive(Default)]
struct State {
    allowances: HashMap<(Address, Address), U256>,
    pools: HashMap<PoolKey, Address>,
    sent: Vec<Sent>,
    reverted: Vec<ActionKind>,
    reads: usize,
    nonce: u64,
}

pub struct MockChain {
    owner: Address,
    fail_on: HashSet<ActionKind>,
    state: Mutex<State>,
}

fn unexpected(message: String) -> BotError {
    BotError::Network {
        message,
        source: None,
        retry_count: 0,
    }
}

fn call_target(tx: &TransactionRequest) -> BotResult<Address> {
    match tx.to {
        Some(TxKind::Call(to)) => Ok(to),
        _ => Err(unexpected("eth_call without a target".to_string())),
    }
}

impl MockChain {
    pub fn new(owner: Address) -> Self {
        Self::failing(owner, [])
    }

    /// Every transaction of the given kinds reverts.
    pub fn failing(owner: Address, kinds: impl IntoIterator<Item = ActionKind>) -> Self {
        Self {
            owner,
            fail_on: kinds.into_iter().collect(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.sent().iter().filter(|s| s.kind() == kind).count()
    }

    pub fn reverted(&self) -> Vec<ActionKind> {
        self.state.lock().unwrap().reverted.clone()
    }

    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub fn interactions(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.reads + state.sent.len() + state.reverted.len()
    }

    pub fn set_allowance(&self, token: Address, spender: Address, amount: U256) {
        self.state.lock().unwrap().allowances.insert((token, spender), amount);
    }

    pub fn add_pool(&self, a: Address, b: Address, fee: u32, pool: Address) {
        let (key, _) = PoolKey::canonical(a, b, fee);
        self.state.lock().unwrap().pools.insert(key, pool);
    }

    fn decode(&self, tx: &TransactionRequest) -> BotResult<Sent> {
        let input = tx.input.input().cloned().unwrap_or_default();
        let value = tx.value.unwrap_or_default();

        let to = match tx.to {
            Some(TxKind::Call(to)) => to,
            _ => return Ok(Sent::Deploy { code: input }),
        };

        if input.is_empty() {
            return Ok(Sent::TransferNative { to, value });
        }
        if let Ok(c) = IERC20::approveCall::abi_decode(&input) {
            return Ok(Sent::Approve { token: to, spender: c.spender, amount: c.value });
        }
        if let Ok(c) = IERC20::transferCall::abi_decode(&input) {
            return Ok(Sent::TransferErc20 { token: to, to: c.to, amount: c.value });
        }
        if let Ok(c) = ISwapRouter::exactInputSingleCall::abi_decode(&input) {
            let p = c.params;
            return Ok(Sent::Swap {
                token_in: p.tokenIn,
                token_out: p.tokenOut,
                amount_in: p.amountIn,
                min_out: p.amountOutMinimum,
                recipient: p.recipient,
                deadline: p.deadline,
                gas_limit: tx.gas.unwrap_or_default(),
            });
        }
        if let Ok(c) = INonfungiblePositionManager::createAndInitializePoolIfNecessaryCall::abi_decode(&input) {
            return Ok(Sent::CreatePool { token0: c.token0, token1: c.token1, fee: c.fee.to::<u32>() });
        }
        if let Ok(c) = INonfungiblePositionManager::mintCall::abi_decode(&input) {
            let p = c.params;
            return Ok(Sent::Mint {
                token0: p.token0,
                token1: p.token1,
                amount0: p.amount0Desired,
                amount1: p.amount1Desired,
            });
        }
        Err(unexpected(format!("unknown calldata sent to {}", to)))
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn address(&self) -> Address {
        self.owner
    }

    async fn call(&self, tx: TransactionRequest) -> BotResult<Bytes> {
        let to = call_target(&tx)?;
        let input = tx.input.input().cloned().unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        state.reads += 1;

        if let Ok(c) = IERC20::allowanceCall::abi_decode(&input) {
            let current = state.allowances.get(&(to, c.spender)).copied().unwrap_or_default();
            return Ok(current.abi_encode().into());
        }
        if let Ok(c) = IUniswapV3Factory::getPoolCall::abi_decode(&input) {
            let (key, _) = PoolKey::canonical(c.tokenA, c.tokenB, c.fee.to::<u32>());
            let pool = state.pools.get(&key).copied().unwrap_or(Address::ZERO);
            return Ok(pool.abi_encode().into());
        }
        Err(unexpected(format!("unknown eth_call to {}", to)))
    }

    async fn latest_timestamp(&self) -> BotResult<u64> {
        self.state.lock().unwrap().reads += 1;
        Ok(BLOCK_TIMESTAMP)
    }

    async fn send_and_confirm(&self, tx: TransactionRequest) -> BotResult<Confirmation> {
        let sent = self.decode(&tx)?;
        let mut state = self.state.lock().unwrap();
        state.nonce += 1;
        let tx_hash = TxHash::left_padding_from(&state.nonce.to_be_bytes());

        if self.fail_on.contains(&sent.kind()) {
            state.reverted.push(sent.kind());
            return Err(BotError::Reverted { tx_hash });
        }

        let mut contract_address = None;
        match &sent {
            Sent::Approve { token, spender, amount } => {
                state.allowances.insert((*token, *spender), *amount);
            }
            Sent::CreatePool { token0, token1, fee } => {
                let pool = Address::with_last_byte(0xa0 + state.pools.len() as u8);
                state.pools.insert(PoolKey { token0: *token0, token1: *token1, fee: *fee }, pool);
            }
            Sent::Deploy { .. } => contract_address = Some(DEPLOYED_ADDRESS),
            _ => {}
        }
        state.sent.push(sent);

        Ok(Confirmation {
            tx_hash,
            contract_address,
            block_number: Some(state.nonce),
        })
    }
}

/// Hands out one [`MockChain`] per wallet and counts connections.
#[derive(Default)]
pub struct MockConnector {
    failures: HashMap<Address, Vec<ActionKind>>,
    chains: Mutex<HashMap<Address, Arc<MockChain>>>,
    connects: Mutex<Vec<Address>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, wallet: Address, kind: ActionKind) -> Self {
        self.failures.entry(wallet).or_default().push(kind);
        self
    }

    pub fn connects(&self) -> Vec<Address> {
        self.connects.lock().unwrap().clone()
    }

    pub fn chain(&self, wallet: Address) -> Option<Arc<MockChain>> {
        self.chains.lock().unwrap().get(&wallet).cloned()
    }
}

#[async_trait]
impl ChainConnector for MockConnector {
    async fn connect(&self, wallet: &WalletCredential) -> BotResult<Arc<dyn ChainClient>> {
        let address = wallet.address();
        self.connects.lock().unwrap().push(address);

        let mut chains = self.chains.lock().unwrap();
        let chain = chains
            .entry(address)
            .or_insert_with(|| {
                let kinds = self.failures.get(&address).cloned().unwrap_or_default();
                Arc::new(MockChain::failing(address, kinds))
            })
            .clone();
        Ok(chain as Arc<dyn ChainClient>)
    }
}

/// An endpoint that refuses every connection.
#[derive(Default)]
pub struct DeadConnector {
    attempts: Mutex<usize>,
}

impl DeadConnector {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl ChainConnector for DeadConnector {
    async fn connect(&self, _wallet: &WalletCredential) -> BotResult<Arc<dyn ChainClient>> {
        *self.attempts.lock().unwrap() += 1;
        Err(unexpected("RPC not connected: http://127.0.0.1:1".to_string()))
    }
}

/// A node that accepts transactions but never mines them.
pub struct StalledChain {
    owner: Address,
}

#[async_trait]
impl ChainClient for StalledChain {
    fn address(&self) -> Address {
        self.owner
    }

    async fn call(&self, tx: TransactionRequest) -> BotResult<Bytes> {
        let input = tx.input.input().cloned().unwrap_or_default();
        if IERC20::allowanceCall::abi_decode(&input).is_ok() {
            return Ok(U256::MAX.abi_encode().into());
        }
        Ok(Address::ZERO.abi_encode().into())
    }

    async fn latest_timestamp(&self) -> BotResult<u64> {
        Ok(BLOCK_TIMESTAMP)
    }

    async fn send_and_confirm(&self, _tx: TransactionRequest) -> BotResult<Confirmation> {
        std::future::pending().await
    }
}

#[derive(Default)]
pub struct StalledConnector;

#[async_trait]
impl ChainConnector for StalledConnector {
    async fn connect(&self, wallet: &WalletCredential) -> BotResult<Arc<dyn ChainClient>> {
        Ok(Arc::new(StalledChain { owner: wallet.address() }) as Arc<dyn ChainClient>)
    }
}

pub fn weth() -> Address {
    Address::with_last_byte(0x01)
}

pub fn usdc() -> Address {
    Address::with_last_byte(0x02)
}

pub fn dai() -> Address {
    Address::with_last_byte(0x03)
}

pub fn token_entries() -> Vec<TokenEntry> {
    vec![
        TokenEntry { symbol: "WETH".to_string(), address: weth(), decimals: 18 },
        TokenEntry { symbol: "USDC".to_string(), address: usdc(), decimals: 6 },
        TokenEntry { symbol: "DAI".to_string(), address: dai(), decimals: 18 },
    ]
}

pub fn owner() -> Address {
    Address::repeat_byte(0x11)
}

pub fn wallets(n: u8) -> Vec<WalletCredential> {
    (1..=n)
        .map(|i| WalletCredential::parse(&format!("0x{:064x}", i)).unwrap())
        .collect()
}

/// Run settings with every pause removed and the optional phases off.
pub fn quiet_run() -> RunConfig {
    RunConfig {
        lp_probability: 0.0,
        enable_deploy: false,
        ..RunConfig::default()
    }
    .without_pauses()
}

/// Owns everything a [`StrategyContext`] borrows.
pub struct Fixture {
    pub run: RunConfig,
    pub registry: TokenRegistry,
    pub contracts: ContractAddresses,
    pub pacer: Pacer,
}

impl Fixture {
    pub fn new(run: RunConfig) -> Self {
        Self {
            run,
            registry: TokenRegistry::new(token_entries()),
            contracts: ContractAddresses::default(),
            pacer: Pacer::detached(),
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn ctx(&self) -> StrategyContext<'_> {
        self.ctx_with(None)
    }

    pub fn ctx_with<'a>(&'a self, service: Option<&'a dyn TokenGenerationService>) -> StrategyContext<'a> {
        StrategyContext {
            run: &self.run,
            registry: &self.registry,
            contracts: &self.contracts,
            token_service: service,
            pacer: &self.pacer,
        }
    }
}
