//! OG Auto Bot - Main Entry Point

use og_auto_bot::*;
use anyhow::{Context, Result};
use tracing::{error, info, warn};
use og_auto_bot::{
    network::RpcConnector,
    orchestrator::BatchOrchestrator,
    registry::TokenRegistry,
    strategy::{Randomizer, StrategyContext},
    token_gen::{TokenGenerationService, TokenGenerator},
    utils::{print_batch_summary, shutdown_channel, Pacer},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    utils::setup_output_directories()?;
    let _logging_guard = utils::setup_logging(&config.logging)?;

    info!("🤖 OG Auto Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration:");
    info!("   Router: {}", config.contracts.router);
    info!("   Position Manager: {}", config.contracts.position_manager);
    info!("   Factory: {}", config.contracts.factory);
    info!("   Tokens: {}", config.tokens.len());
    info!("   Max Wallets/Batch: {}", config.run.max_wallets_per_batch);
    info!("   Swaps: {:?} | Transfers: {:?}", config.run.swaps, config.run.transfers);
    info!("   LP Probability: {}", config.run.lp_probability);
    info!("   Deploy: {} (p={}, auto={})", config.run.enable_deploy, config.run.deploy_probability, config.run.auto_deploy_token);
    info!("   Run Continuously: {}", config.run_continuously);

    let wallets = parse_wallets(&std::env::var("PRIVATE_KEYS").unwrap_or_default())?;
    if wallets.is_empty() {
        return Err(BotError::Config("PRIVATE_KEYS is empty".to_string()).into());
    }
    info!("   Wallets: {}", wallets.len());

    let connector = RpcConnector::new(config.require_rpc_url()?)?;
    let chain_id = connector.check_connection().await.inspect_err(|e| error!("❌ Fatal: {}", e))?;
    info!("🔗 Connected to chain {}", chain_id);
    let registry = TokenRegistry::new(config.tokens.iter().cloned());

    let generator = if config.run.enable_deploy {
        Some(TokenGenerator::new(&config.llm, &config.deploy)?)
    } else {
        None
    };

    let (shutdown_tx, pacer) = shutdown_channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("\n📛 Received shutdown signal (Ctrl+C)...");
        let _ = shutdown_tx.send(true);

        // A second Ctrl+C skips the orderly shutdown
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("📛 Second Ctrl+C, exiting now");
            std::process::exit(130);
        }
    });

    let ctx = StrategyContext {
        run: &config.run,
        registry: &registry,
        contracts: &config.contracts,
        token_service: generator.as_ref().map(|g| g as &dyn TokenGenerationService),
        pacer: &pacer,
    };
    let mut orchestrator = BatchOrchestrator::new(&wallets, &connector, ctx, Randomizer::from_entropy());

    match run_loop(&mut orchestrator, &config, &pacer).await {
        Err(BotError::Interrupted) => {
            info!("Shutdown requested, exiting...");
            Ok(())
        }
        Err(e) => {
            error!("❌ Fatal: {}", e);
            Err(e.into())
        }
        Ok(()) => Ok(()),
    }
}

/// Runs one batch, or keeps running batches until interrupted when
/// `RUN_CONTINUOUSLY` is set.
async fn run_loop(orchestrator: &mut BatchOrchestrator<'_>, config: &Config, pacer: &Pacer) -> BotResult<()> {
    loop {
        let report = orchestrator.run_batch_once().await?;
        print_batch_summary(&report);

        if !config.run_continuously {
            return Ok(());
        }
        info!("⏳ Next batch in {}s", config.batch_pause_secs);
        pacer.sleep_secs(config.batch_pause_secs, "between batches").await?;
    }
}
