//! One batch over the wallet pool
//!
//! Wallets run one after another. A wallet's failure is logged, recorded
//! with whatever it got through, and followed by a cooldown; the batch then
//! moves on. An interrupt ends the batch at once, even mid-transaction, and
//! an unreachable chain endpoint is fatal.

use tracing::{debug, error, info, info_span, warn, Instrument};
use crate::{
    errors::{BotError, BotResult},
    network::{ChainClient, ChainConnector},
    strategy::{Randomizer, StrategyContext, WalletStrategy},
    types::{BatchReport, WalletCredential, WalletFailure, WalletReport},
    utils::{log_failure, print_wallet_summary, short},
};

pub struct BatchOrchestrator<'a> {
    wallets: &'a [WalletCredential],
    connector: &'a dyn ChainConnector,
    ctx: StrategyContext<'a>,
    rng: Randomizer,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        wallets: &'a [WalletCredential],
        connector: &'a dyn ChainConnector,
        ctx: StrategyContext<'a>,
        rng: Randomizer,
    ) -> Self {
        Self {
            wallets,
            connector,
            ctx,
            rng,
        }
    }

    /// Shuffles the pool, takes up to `max_wallets_per_batch` wallets and
    /// runs each one unless the skip roll says otherwise.
    pub async fn run_batch_once(&mut self) -> BotResult<BatchReport> {
        if self.wallets.is_empty() {
            return Err(BotError::Config("wallet pool is empty (set PRIVATE_KEYS)".to_string()));
        }
        self.ctx.pacer.check()?;

        let mut pool: Vec<&'a WalletCredential> = self.wallets.iter().collect();
        self.rng.shuffle(&mut pool);
        pool.truncate(self.ctx.run.max_wallets_per_batch);

        let mut report = BatchReport::new(pool.iter().map(|w| w.address()).collect());
        let span = info_span!("batch", id = %report.batch_id);
        self.run_selected(&pool, &mut report).instrument(span).await?;
        Ok(report)
    }

    async fn run_selected(&mut self, pool: &[&'a WalletCredential], report: &mut BatchReport) -> BotResult<()> {
        let labels: Vec<String> = pool
            .iter()
            .map(|w| short(&w.address().to_checksum(None)))
            .collect();
        info!("🎲 Batch selected {} wallet(s): {}", pool.len(), labels.join(", "));

        for wallet in pool {
            self.ctx.pacer.check()?;
            let address = wallet.address();
            let label = short(&address.to_checksum(None));

            if self.rng.chance(self.ctx.run.random_skip_prob) {
                info!("⏭️ Skipping {} this batch", label);
                report.skipped.push(address);
                continue;
            }

            info!("👛 Wallet {} starting", label);
            let mut wallet_report = WalletReport::new(address);
            let pacer = self.ctx.pacer;
            let client = tokio::select! {
                client = self.connector.connect(wallet) => client,
                _ = pacer.interrupted() => Err(BotError::Interrupted),
            };
            let client = match client {
                Ok(client) => client,
                Err(e) if e.is_interrupt() => return Err(e),
                Err(e) => {
                    error!("❌ Chain endpoint unreachable while connecting {}: {}", label, e);
                    return Err(e);
                }
            };

            let outcome = tokio::select! {
                result = self.run_wallet(client.as_ref(), &mut wallet_report) => result,
                _ = pacer.interrupted() => Err(BotError::Interrupted),
            };
            match outcome {
                Ok(()) => {
                    print_wallet_summary(&wallet_report);
                    if let Ok(json) = serde_json::to_string(&wallet_report) {
                        debug!(target: "og_auto_bot::outcomes", "{}", json);
                    }
                    report.completed.push(wallet_report);
                }
                Err(e) if e.is_interrupt() => {
                    warn!("🛑 Interrupted while running {}", label);
                    return Err(e);
                }
                Err(e) => {
                    log_failure(self.ctx.run.debug_errors, &format!("Wallet {} failed", label), &e);
                    report.failed.push(WalletFailure {
                        wallet: address,
                        reason: e.to_string(),
                        partial: wallet_report,
                    });
                    self.ctx
                        .pacer
                        .sleep_secs(self.ctx.run.wallet_failure_cooldown_secs, "wallet failure cooldown")
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn run_wallet(&mut self, client: &dyn ChainClient, report: &mut WalletReport) -> BotResult<()> {
        WalletStrategy::new(self.ctx)
            .run(client, &mut self.rng, report)
            .await
    }
}
