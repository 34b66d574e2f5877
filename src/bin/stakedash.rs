//! Staking dashboard CLI
//!
//! Command-line interface for the farming and protocol-stats dashboards.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use stakedash::chain::contracts::{AbiLabel, ContractRegistry, RpcErc20, RpcFarming, RpcLiquidityMining};
use stakedash::chain::provider::{ProviderConfig, ReadonlyProvider};
use stakedash::chain::Address;
use stakedash::cli::output::{OutputFormat, OutputFormatter};
use stakedash::config::DashboardConfig;
use stakedash::farming::aggregator::{FarmingAggregator, FarmingParams};
use stakedash::indexer::client::HttpIndexerClient;
use stakedash::prices::helper::{HttpPriceHelper, PriceApiConfig};
use stakedash::stats::aggregator::{StatsAggregator, StatsParams};
use stakedash::wallet::session::ReadonlySession;

/// Staking dashboard CLI - farming positions and protocol statistics
#[derive(Parser)]
#[command(name = "stakedash")]
#[command(version = stakedash::VERSION)]
#[command(about = "Staking dashboard aggregator", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "STAKEDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (text, json, json-pretty)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the farming dashboard
    Farming {
        /// Account to load a position for
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Load protocol statistics
    Stats,

    /// Submit an exit transaction (unstake everything and claim)
    Exit {
        /// Account submitting the transaction
        #[arg(short, long)]
        user: String,
    },

    /// Submit a claim-only transaction
    Claim {
        /// Account submitting the transaction
        #[arg(short, long)]
        user: String,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the active configuration
    Show,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run_command(&cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(cli.format);

    match &cli.command {
        Commands::Farming { user } => cmd_farming(cli, user.as_deref(), &formatter).await,
        Commands::Stats => cmd_stats(cli, &formatter).await,
        Commands::Exit { user } => cmd_tx(cli, user, TxKind::Exit, &formatter).await,
        Commands::Claim { user } => cmd_tx(cli, user, TxKind::Claim, &formatter).await,
        Commands::Config(cmd) => cmd_config(cli, cmd, &formatter),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

async fn cmd_farming(
    cli: &Cli,
    user: Option<&str>,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let session = match user {
        Some(raw) => ReadonlySession::connected_as(parse_address(raw)?),
        None => ReadonlySession::new(),
    };
    let aggregator = build_farming(&config, session)?;

    let spinner = create_spinner("Loading farming dashboard...");
    aggregator.initial_load().await?;
    spinner.finish_and_clear();

    formatter.section("Pool");
    formatter.data(&aggregator.pool_state().await);

    if user.is_some() {
        formatter.section("Position");
        formatter.data(&aggregator.position().await);
    }

    Ok(())
}

async fn cmd_stats(cli: &Cli, formatter: &OutputFormatter) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let provider = Arc::new(ReadonlyProvider::new(ProviderConfig {
        url: config.rpc_url.clone(),
        timeout_secs: config.timeout_secs,
    })?);
    let prices = HttpPriceHelper::new(price_config(&config), provider)?;
    let indexer = HttpIndexerClient::new(config.indexer_url.clone(), config.timeout_secs)?;

    let aggregator = StatsAggregator::new(
        indexer,
        prices,
        StatsParams {
            reward_token: config.contracts.reward_token.clone(),
            holders: config.holders.clone(),
        },
    );

    let spinner = create_spinner("Loading protocol statistics...");
    aggregator.refresh().await?;
    spinner.finish_and_clear();

    formatter.section("Protocol");
    formatter.data(&aggregator.stats().await);

    Ok(())
}

enum TxKind {
    Exit,
    Claim,
}

async fn cmd_tx(
    cli: &Cli,
    user: &str,
    kind: TxKind,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let session = ReadonlySession::connected_as(parse_address(user)?);
    let aggregator = build_farming(&config, session)?;

    match kind {
        TxKind::Exit => {
            aggregator.exit().await;
            formatter.kv("exit", "dispatched; submission failures are logged");
        }
        TxKind::Claim => {
            aggregator.claim().await;
            formatter.kv("claim", "dispatched; submission failures are logged");
        }
    }

    Ok(())
}

fn cmd_config(
    cli: &Cli,
    cmd: &ConfigCommands,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let path = config_path(cli);

    match cmd {
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }
            DashboardConfig::default().save(&path)?;
            formatter.success(&format!("Wrote configuration to {}", path.display()));
            Ok(())
        }
        ConfigCommands::Show => {
            let config = load_config(cli)?;
            formatter.data(&config);
            Ok(())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

type CliFarmingAggregator = FarmingAggregator<
    RpcFarming,
    RpcLiquidityMining,
    RpcErc20,
    HttpPriceHelper,
    ReadonlySession,
>;

fn build_farming(
    config: &DashboardConfig,
    session: ReadonlySession,
) -> anyhow::Result<CliFarmingAggregator> {
    let provider = Arc::new(ReadonlyProvider::new(ProviderConfig {
        url: config.rpc_url.clone(),
        timeout_secs: config.timeout_secs,
    })?);

    let mut registry = ContractRegistry::new(Arc::clone(&provider));
    registry.register(
        "Farming",
        config.contracts.farming.clone(),
        AbiLabel::Farming,
    );
    registry.register(
        "LiquidityMining",
        config.contracts.liquidity_mining.clone(),
        AbiLabel::LiquidityMining,
    );

    let params = FarmingParams {
        farming_address: config.contracts.farming.clone(),
        reward_token: config.contracts.reward_token.clone(),
        farming_lp_token: config.contracts.farming_lp_token.clone(),
        liquidity_mining_address: config.contracts.liquidity_mining.clone(),
        lm_reward_token: config.contracts.lm_reward_token.clone(),
        lm_lp_token: config.contracts.lm_lp_token.clone(),
        lm_pool_id: config.lm_pool_id,
    };

    Ok(FarmingAggregator::new(
        registry.farming("Farming")?,
        registry.liquidity_mining("LiquidityMining")?,
        registry.erc20_at(config.contracts.lm_lp_token.clone()),
        HttpPriceHelper::new(price_config(config), provider)?,
        Arc::new(session),
        params,
    ))
}

fn price_config(config: &DashboardConfig) -> PriceApiConfig {
    PriceApiConfig {
        api_url: config.price_api_url.clone(),
        timeout_secs: config.timeout_secs,
        interest_fee_bps: config.interest_fee_bps,
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(DashboardConfig::default_path)
}

fn load_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let path = config_path(cli);
    let config = if path.exists() {
        DashboardConfig::load(&path)?
    } else {
        DashboardConfig::from_env()
    };
    config.validate()?;
    Ok(config)
}

fn parse_address(raw: &str) -> anyhow::Result<Address> {
    Address::parse(raw).map_err(|e| anyhow::anyhow!("Invalid address: {}", e))
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
