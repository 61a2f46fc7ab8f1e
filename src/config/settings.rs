//! Bot configuration settings and environment variable handling

use alloy::primitives::Address;
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use crate::{
    config::tokens::load_token_table,
    errors::{BotError, BotResult},
    types::{ContractAddresses, TokenEntry},
};

// Action sizing
pub const ERC20_AMOUNT_RANGE: RangeInclusive<u128> = 1_000_000_000..=1_000_000_000_000;
pub const NATIVE_AMOUNT_RANGE: RangeInclusive<u128> = 100_000_000..=10_000_000_000;

// Transaction constants
pub const DEFAULT_GAS_LIMIT: u64 = 400_000;
pub const DEFAULT_DEPLOY_GAS_LIMIT: u64 = 800_000;
pub const DEADLINE_SECS: u64 = 600;
pub const DEFAULT_V3_FEE: u32 = 500;
pub const MAX_V3_FEE: u32 = 1_000_000;
pub const DEFAULT_TICK_LOWER: i32 = -70_000;
pub const DEFAULT_TICK_UPPER: i32 = 70_000;

// Text generation
pub const DEFAULT_NOUS_BASE_URL: &str = "https://api.nousresearch.com/v1";
pub const DEFAULT_NOUS_MODEL: &str = "hermes-3-llama-3.1-70b";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const FALLBACK_MODEL: &str = "nousresearch/hermes-3-llama-3.1-70b";

/// Numeric and behavioral parameters of a run. Shared by reference across
/// every wallet in a batch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub max_wallets_per_batch: usize,
    pub random_skip_prob: f64,
    pub swaps: RangeInclusive<u32>,
    pub transfers: RangeInclusive<u32>,
    pub lp_probability: f64,
    pub enable_deploy: bool,
    pub deploy_probability: f64,
    pub auto_deploy_token: bool,
    pub sleep_between: RangeInclusive<u64>,
    pub action_sleep_base: u64,
    pub action_sleep_jitter: u64,
    pub settle_sleep: RangeInclusive<u64>,
    pub lp_settle_sleep: RangeInclusive<u64>,
    pub wallet_failure_cooldown_secs: u64,
    pub gas_limit_default: u64,
    pub v3_fee: u32,
    pub debug_errors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_wallets_per_batch: 5,
            random_skip_prob: 0.0,
            swaps: 2..=4,
            transfers: 1..=3,
            lp_probability: 0.6,
            enable_deploy: false,
            deploy_probability: 0.4,
            auto_deploy_token: false,
            sleep_between: 40..=120,
            action_sleep_base: 40,
            action_sleep_jitter: 80,
            settle_sleep: 1..=3,
            lp_settle_sleep: 3..=10,
            wallet_failure_cooldown_secs: 5,
            gas_limit_default: DEFAULT_GAS_LIMIT,
            v3_fee: DEFAULT_V3_FEE,
            debug_errors: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmProvider {
    pub name: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Tried in order.
    pub providers: Vec<LlmProvider>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub solc_path: String,
    pub solc_version: String,
    pub gas_limit: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub color: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: Option<String>,
    pub contracts: ContractAddresses,
    pub run: RunConfig,
    pub llm: LlmConfig,
    pub deploy: DeployConfig,
    pub logging: LoggingConfig,
    pub run_continuously: bool,
    pub batch_pause_secs: u64,
    pub tokens: Vec<TokenEntry>,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Typed view over a key lookup. Empty values count as unset.
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, name: &str, default: &str) -> String {
        self.raw(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: FromStr>(&self, name: &str, default: T) -> T {
        self.raw(name).and_then(|s| s.parse().ok()).unwrap_or(default)
    }

    fn flag(&self, name: &str, default: bool) -> bool {
        self.raw(name).and_then(|s| parse_bool(&s)).unwrap_or(default)
    }

    fn probability(&self, name: &str, default: f64) -> f64 {
        let p: f64 = self.parsed(name, default);
        if p.is_nan() { default } else { p.max(0.0).min(1.0) }
    }

    fn address(&self, name: &str, default: Address) -> BotResult<Address> {
        match self.raw(name) {
            None => Ok(default),
            Some(raw) => Address::from_str(&raw)
                .map_err(|_| BotError::Config(format!("{} is not a valid address: {:?}", name, raw))),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> BotResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };
        let defaults = RunConfig::default();
        let known = ContractAddresses::default();

        let contracts = ContractAddresses {
            router: env.address("ROUTER", known.router)?,
            position_manager: env.address("POS_MANAGER", known.position_manager)?,
            factory: env.address("V3_FACTORY", known.factory)?,
        };

        let run = RunConfig {
            max_wallets_per_batch: env.parsed("MAX_WALLETS_PER_BATCH", defaults.max_wallets_per_batch),
            random_skip_prob: env.probability("RANDOM_SKIP_PROB", defaults.random_skip_prob),
            swaps: env.parsed("SWAPS_MIN", 2)..=env.parsed("SWAPS_MAX", 4),
            transfers: env.parsed("TRANSFERS_MIN", 1)..=env.parsed("TRANSFERS_MAX", 3),
            lp_probability: env.probability("LP_PROBABILITY", defaults.lp_probability),
            enable_deploy: env.flag("ENABLE_DEPLOY", false),
            deploy_probability: env.probability("DEPLOY_PROBABILITY", defaults.deploy_probability),
            auto_deploy_token: env.flag("AUTO_DEPLOY_TOKEN", false),
            sleep_between: env.parsed("SLEEP_BETWEEN_MIN", 40)..=env.parsed("SLEEP_BETWEEN_MAX", 120),
            action_sleep_base: env.parsed("ACTION_SLEEP_BASE", defaults.action_sleep_base),
            action_sleep_jitter: env.parsed("ACTION_SLEEP_JITTER", defaults.action_sleep_jitter),
            settle_sleep: env.parsed("SETTLE_SLEEP_MIN", 1)..=env.parsed("SETTLE_SLEEP_MAX", 3),
            lp_settle_sleep: env.parsed("LP_SETTLE_SLEEP_MIN", 3)..=env.parsed("LP_SETTLE_SLEEP_MAX", 10),
            wallet_failure_cooldown_secs: env
                .parsed("WALLET_FAILURE_COOLDOWN_SECS", defaults.wallet_failure_cooldown_secs),
            gas_limit_default: env.parsed("GAS_LIMIT_DEFAULT", DEFAULT_GAS_LIMIT).max(21_000),
            v3_fee: env.parsed("V3_FEE", DEFAULT_V3_FEE),
            debug_errors: env.flag("DEBUG", false),
        };

        let llm = LlmConfig {
            providers: vec![
                LlmProvider {
                    name: "nous".to_string(),
                    api_key: env.raw("NOUS_API_KEY"),
                    base_url: env.string("NOUS_BASE_URL", DEFAULT_NOUS_BASE_URL),
                    model: env.string("NOUS_MODEL", DEFAULT_NOUS_MODEL),
                },
                LlmProvider {
                    name: "openrouter".to_string(),
                    api_key: env.raw("OPENROUTER_API_KEY"),
                    base_url: env.string("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
                    model: env.string("OPENROUTER_MODEL", FALLBACK_MODEL),
                },
            ],
            timeout_secs: env.parsed("LLM_TIMEOUT", 30u64).max(1),
        };

        let deploy = DeployConfig {
            solc_path: env.string("SOLC_PATH", "solc"),
            solc_version: env.string("SOLC_VERSION", "0.8.20"),
            gas_limit: env.parsed("DEPLOY_GAS_LIMIT", DEFAULT_DEPLOY_GAS_LIMIT),
            timeout_secs: env.parsed("DEPLOY_TIMEOUT", 180u64).max(1),
        };

        let logging = LoggingConfig {
            level: env.string("LOG_LEVEL", "info").to_ascii_lowercase(),
            color: env.flag("LOG_COLOR", true),
            json: env.flag("LOG_JSON", false),
        };

        let config = Self {
            rpc_url: env.raw("OG_RPC"),
            contracts,
            run,
            llm,
            deploy,
            logging,
            run_continuously: env.flag("RUN_CONTINUOUSLY", false),
            batch_pause_secs: env.parsed("BATCH_PAUSE_SECS", 60),
            tokens: load_token_table(|name| env.raw(name))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects inverted ranges and other settings the engine cannot honor.
    pub fn validate(&self) -> BotResult<()> {
        self.run.validate()?;
        if self.tokens.is_empty() {
            return Err(BotError::Config("token table is empty".to_string()));
        }
        Ok(())
    }

    pub fn require_rpc_url(&self) -> BotResult<&str> {
        self.rpc_url
            .as_deref()
            .ok_or_else(|| BotError::Config("OG_RPC is required".to_string()))
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(name: &str, range: &RangeInclusive<T>) -> BotResult<()> {
    if range.start() > range.end() {
        return Err(BotError::Config(format!(
            "{}_MIN ({}) is greater than {}_MAX ({})",
            name,
            range.start(),
            name,
            range.end()
        )));
    }
    Ok(())
}

impl RunConfig {
    pub fn validate(&self) -> BotResult<()> {
        check_range("SWAPS", &self.swaps)?;
        check_range("TRANSFERS", &self.transfers)?;
        check_range("SLEEP_BETWEEN", &self.sleep_between)?;
        check_range("SETTLE_SLEEP", &self.settle_sleep)?;
        check_range("LP_SETTLE_SLEEP", &self.lp_settle_sleep)?;
        if self.v3_fee > MAX_V3_FEE {
            return Err(BotError::Config(format!("V3_FEE {} exceeds {}", self.v3_fee, MAX_V3_FEE)));
        }
        if self.max_wallets_per_batch == 0 {
            return Err(BotError::Config("MAX_WALLETS_PER_BATCH must be at least 1".to_string()));
        }
        Ok(())
    }

    /// A configuration with every pause set to zero.
    pub fn without_pauses(mut self) -> Self {
        self.sleep_between = 0..=0;
        self.action_sleep_base = 0;
        self.action_sleep_jitter = 0;
        self.settle_sleep = 0..=0;
        self.lp_settle_sleep = 0..=0;
        self.wallet_failure_cooldown_secs = 0;
        self
    }
}
