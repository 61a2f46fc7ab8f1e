//! Per-wallet action sequence
//!
//! Phases run strictly in order: swaps, transfers, an optional liquidity
//! position, an optional token selection (and deployment), then a pause
//! before the next wallet. Any propagated failure ends the wallet's run.

use alloy::primitives::{TxHash, U256};
use tracing::{info, info_span, Instrument};
use crate::{
    config::RunConfig,
    dex::Dex,
    errors::BotResult,
    network::ChainClient,
    registry::TokenRegistry,
    strategy::Randomizer,
    token_gen::TokenGenerationService,
    types::{ActionKind, ActionOutcome, ContractAddresses, WalletReport},
    utils::{short, Pacer},
};

/// Everything a wallet run reads but never changes.
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
    pub run: &'a RunConfig,
    pub registry: &'a TokenRegistry,
    pub contracts: &'a ContractAddresses,
    pub token_service: Option<&'a dyn TokenGenerationService>,
    pub pacer: &'a Pacer,
}

pub struct WalletStrategy<'a> {
    ctx: StrategyContext<'a>,
}

fn record(
    report: &mut WalletReport,
    kind: ActionKind,
    detail: String,
    result: BotResult<Option<TxHash>>,
) -> BotResult<Option<TxHash>> {
    match &result {
        Ok(tx_hash) => report.record(ActionOutcome::success(kind, detail, *tx_hash)),
        Err(e) => report.record(ActionOutcome::failure(kind, detail, e)),
    }
    result
}

impl<'a> WalletStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }

    /// Runs every phase for the wallet behind `client`, appending outcomes to
    /// `report` as they happen so a failed run still shows its progress.
    pub async fn run(
        &self,
        client: &dyn ChainClient,
        rng: &mut Randomizer,
        report: &mut WalletReport,
    ) -> BotResult<()> {
        let owner = client.address();
        let span = info_span!("wallet", address = %short(&owner.to_checksum(None)));
        self.run_phases(client, rng, report).instrument(span).await
    }

    async fn run_phases(
        &self,
        client: &dyn ChainClient,
        rng: &mut Randomizer,
        report: &mut WalletReport,
    ) -> BotResult<()> {
        let dex = Dex::new(client, self.ctx.registry, self.ctx.contracts, self.ctx.run);
        let symbols = self.ctx.registry.symbols();

        self.swap_phase(&dex, &symbols, rng, report).await?;
        self.transfer_phase(&dex, &symbols, rng, report).await?;
        self.liquidity_phase(&dex, &symbols, rng, report).await?;
        self.deploy_phase(client, rng, report).await?;

        let pause = rng.secs_in(&self.ctx.run.sleep_between);
        self.ctx.pacer.sleep_secs(pause, "between wallets").await
    }

    async fn pace(&self, rng: &mut Randomizer, settle: &std::ops::RangeInclusive<u64>) -> BotResult<()> {
        let run = self.ctx.run;
        let pause = rng.jitter(run.action_sleep_base, run.action_sleep_jitter);
        self.ctx.pacer.sleep_secs(pause, "after action").await?;
        let settle = rng.secs_in(settle);
        self.ctx.pacer.sleep_secs(settle, "settle").await
    }

    async fn swap_phase(
        &self,
        dex: &Dex<'_>,
        symbols: &[String],
        rng: &mut Randomizer,
        report: &mut WalletReport,
    ) -> BotResult<()> {
        let run = self.ctx.run;
        let swaps = rng.count_in(&run.swaps);
        info!("🔄 {} swap(s) planned", swaps);

        for _ in 0..swaps {
            let (token_in, token_out) = rng.pick_two_distinct(symbols)?;
            let amount_in = rng.erc20_amount();
            let router = self.ctx.contracts.router;

            if let Some(tx) = dex.ensure_allowance(token_in, router, amount_in).await? {
                report.record(ActionOutcome::success(
                    ActionKind::Approve,
                    format!("{} for router", token_in),
                    Some(tx),
                ));
            }

            let detail = format!("{} -> {} in={}", token_in, token_out, amount_in);
            let result = dex
                .swap_exact_input_single(token_in, token_out, amount_in, U256::ZERO, run.v3_fee)
                .await;
            record(report, ActionKind::Swap, detail, result)?;

            self.pace(rng, &run.settle_sleep).await?;
        }
        Ok(())
    }

    async fn transfer_phase(
        &self,
        dex: &Dex<'_>,
        symbols: &[String],
        rng: &mut Randomizer,
        report: &mut WalletReport,
    ) -> BotResult<()> {
        let run = self.ctx.run;
        let owner = dex.owner();
        let transfers = rng.count_in(&run.transfers);
        info!("💸 {} transfer(s) planned", transfers);

        for _ in 0..transfers {
            if rng.chance(0.5) {
                let amount = rng.native_amount();
                let result = dex.transfer_native(owner, amount).await;
                record(report, ActionKind::TransferNative, format!("{} wei to self", amount), result)?;
            } else {
                let symbol = rng.pick(symbols).cloned().unwrap_or_default();
                let amount = rng.erc20_amount();
                let detail = format!("{} {} to self", amount, symbol);
                let result = dex.transfer_erc20(symbol, owner, amount).await;
                record(report, ActionKind::TransferErc20, detail, result)?;
            }

            self.pace(rng, &run.settle_sleep).await?;
        }
        Ok(())
    }

    async fn liquidity_phase(
        &self,
        dex: &Dex<'_>,
        symbols: &[String],
        rng: &mut Randomizer,
        report: &mut WalletReport,
    ) -> BotResult<()> {
        let run = self.ctx.run;
        if !rng.chance(run.lp_probability) {
            return Ok(());
        }

        let (a, b) = rng.pick_two_distinct(symbols)?;
        let (amount_a, amount_b) = (rng.erc20_amount(), rng.erc20_amount());
        let detail = format!("{}/{} fee={} amounts={}/{}", a, b, run.v3_fee, amount_a, amount_b);

        let result = dex
            .ensure_pool_and_add_liquidity(a, b, run.v3_fee, amount_a, amount_b)
            .await
            .map(|outcome| {
                if let Some(tx) = outcome.pool_tx {
                    report.record(ActionOutcome::success(ActionKind::CreatePool, format!("{}/{}", a, b), Some(tx)));
                }
                outcome.mint_tx
            });
        record(report, ActionKind::MintLiquidity, detail, result)?;

        self.pace(rng, &run.lp_settle_sleep).await
    }

    async fn deploy_phase(
        &self,
        client: &dyn ChainClient,
        rng: &mut Randomizer,
        report: &mut WalletReport,
    ) -> BotResult<()> {
        let run = self.ctx.run;
        if !run.enable_deploy || !rng.chance(run.deploy_probability) {
            return Ok(());
        }
        let Some(service) = self.ctx.token_service else {
            return Ok(());
        };

        let spec = service.select_token(client.address()).await;
        info!("🧪 token selection: {}", spec);
        report.record(ActionOutcome::success(ActionKind::TokenSpec, spec.to_string(), None));
        report.token_spec = Some(spec.clone());

        if run.auto_deploy_token {
            let detail = format!("{} ({})", spec.params.name, spec.params.symbol);
            let result = service
                .deploy_token(client, &spec)
                .await
                .map(|deployed| Some(deployed.tx_hash));
            record(report, ActionKind::DeployToken, detail, result)?;
        }

        self.pace(rng, &(0..=0)).await
    }
}
