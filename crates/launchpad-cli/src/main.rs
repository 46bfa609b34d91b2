//! Launchpad CLI
//!
//! Command-line front end for the launch economics engine: tokenomics
//! previews, halving-step sweeps and local token creation.

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use launchpad_economics::{
    preview, Amount, BondingCurve, CreateTokenRequest, EconomicsConfig, Launchpad,
    LaunchRequest, PriceQuote, TokenomicsPreview, UsdValue, DEFAULT_HALVING_SWEEP,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(version = "0.1.0")]
#[command(about = "Burn-to-mint token launch economics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "launchpad.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a launch and print its graph series
    Preview {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Print an epoch table instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Compare halving steps for one parameter set
    Sweep {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Halving steps to compare, percent
        #[arg(long, value_delimiter = ',')]
        steps: Option<Vec<u8>>,
    },

    /// Create a token pair from a request file
    Create {
        /// CreateTokenRequest TOML file
        request: PathBuf,

        /// Creator identity
        #[arg(long, default_value = "local")]
        owner: String,

        /// Fee token USD price, used to value the creation fee
        #[arg(long)]
        fee_token_price: Option<UsdValue>,
    },

    /// Print the default configuration
    Config,
}

/// Launch parameters from flags or a TOML file
#[derive(Args)]
struct LaunchArgs {
    /// LaunchRequest TOML file (overrides the flags below)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Primary max supply
    #[arg(long, default_value = "1000000")]
    max_supply: String,

    /// Primary minted at TGE
    #[arg(long, default_value = "1")]
    tge: String,

    /// Secondary burned per epoch
    #[arg(long, default_value = "1000000")]
    burn: String,

    /// Primary minted per burn unit in the first epoch
    #[arg(long, default_value = "20000")]
    reward: String,

    /// Reward cut per epoch, percent
    #[arg(long, default_value = "50")]
    step: u8,

    /// Read amounts as e8s instead of whole tokens
    #[arg(long)]
    e8s: bool,
}

impl LaunchArgs {
    fn to_request(&self) -> anyhow::Result<LaunchRequest> {
        if let Some(path) = &self.params {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(toml::from_str(&content)?);
        }

        Ok(LaunchRequest {
            primary_max_supply: parse_amount(&self.max_supply, self.e8s)?,
            tge_allocation: parse_amount(&self.tge, self.e8s)?,
            initial_secondary_burn: parse_amount(&self.burn, self.e8s)?,
            initial_reward_per_burn_unit: parse_amount(&self.reward, self.e8s)?,
            halving_step_percent: self.step,
        })
    }
}

/// Parse a token quantity into e8s
fn parse_amount(value: &str, raw_e8s: bool) -> anyhow::Result<u64> {
    let e8s = if raw_e8s {
        value.trim().parse::<u128>()?
    } else {
        value.parse::<Amount>()?.e8s()
    };
    u64::try_from(e8s).with_context(|| format!("{} does not fit in u64 e8s", value))
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_writer(std::io::stderr))
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<EconomicsConfig> {
    if path.exists() {
        Ok(EconomicsConfig::load(path)?)
    } else {
        tracing::debug!("Config {:?} not found, using defaults", path);
        Ok(EconomicsConfig::default())
    }
}

fn print_summary(preview: &TokenomicsPreview) {
    let graph = &preview.graph;
    println!(
        "{:<10} {:>24} {:>24} {:>18} {:>20}",
        "Epoch", "Minted", "Supply", "USD/token", "USD total"
    );
    for row in 0..graph.len() {
        println!(
            "{:<10} {:>24} {:>24} {:>18} {:>20}",
            graph.minted_per_epoch_data_x[row],
            graph.minted_per_epoch_data_y[row],
            graph.cumulative_supply_data_y[row],
            graph.cost_to_mint_data_y[row],
            graph.cumulative_usd_cost_data_y[row],
        );
    }

    let s = &preview.summary;
    println!();
    println!("Epochs:          {} ({} halving)", s.epoch_count, s.halving_epochs);
    println!("Termination:     {:?}", s.termination);
    println!("Total supply:    {}", s.total_supply);
    println!("Secondary burned: {}", s.total_secondary_burned);
    println!("Total USD cost:  ${}", s.total_usd_cost);
}

/// Simulate every step on the blocking pool; results keep input order
async fn run_sweep(
    request: LaunchRequest,
    steps: Vec<u8>,
    secondary_usd_price: UsdValue,
) -> anyhow::Result<()> {
    let handles: Vec<_> = steps
        .into_iter()
        .map(|step| {
            let request = LaunchRequest {
                halving_step_percent: step,
                ..request.clone()
            };
            tokio::task::spawn_blocking(move || {
                let params = request.validate()?;
                let projection = BondingCurve::new(params)
                    .with_secondary_price(secondary_usd_price)
                    .simulate()?;
                Ok::<_, launchpad_economics::TokenomicsError>((step, projection.summary))
            })
        })
        .collect();

    println!(
        "{:>5} {:>7} {:>20} {:>24} {:>20}",
        "Step", "Epochs", "Final rate", "Secondary burned", "USD total"
    );
    for handle in handles {
        match handle.await? {
            Ok((step, summary)) => println!(
                "{:>4}% {:>7} {:>20} {:>24} {:>20}",
                step,
                summary.epoch_count,
                summary.final_reward_rate,
                summary.total_secondary_burned,
                summary.total_usd_cost,
            ),
            Err(e) => println!("  error [{}]: {}", e.kind(), e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Preview { launch, summary } => {
            let request = launch.to_request()?;
            let preview = preview(&request, config.pricing.secondary_usd_price)?;

            if summary {
                print_summary(&preview);
            } else {
                println!("{}", serde_json::to_string_pretty(&preview.graph)?);
            }
        }

        Commands::Sweep { launch, steps } => {
            let request = launch.to_request()?;
            let steps = steps.unwrap_or_else(|| DEFAULT_HALVING_SWEEP.to_vec());
            tracing::info!("Sweeping {} halving steps", steps.len());
            run_sweep(request, steps, config.pricing.secondary_usd_price).await?;
        }

        Commands::Create { request, owner, fee_token_price } => {
            let content = std::fs::read_to_string(&request)
                .with_context(|| format!("reading {}", request.display()))?;
            let request: CreateTokenRequest = toml::from_str(&content)?;

            let now = Utc::now();
            let launchpad = Launchpad::new(&config);
            let mut prices = launchpad.price_cache();
            if let Some(price) = fee_token_price {
                prices.store(PriceQuote::new(price, now));
            }

            let created = launchpad.create_token(&owner, request, &prices, now)?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }

        Commands::Config => {
            print!("{}", EconomicsConfig::default().to_toml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_tokens() {
        assert_eq!(parse_amount("1.5", false).unwrap(), 150_000_000);
        assert_eq!(parse_amount("20000", false).unwrap(), 2_000_000_000_000);
    }

    #[test]
    fn test_parse_amount_e8s() {
        assert_eq!(parse_amount("42", true).unwrap(), 42);
        assert!(parse_amount("1.5", true).is_err());
    }

    #[test]
    fn test_parse_amount_too_large() {
        assert!(parse_amount("1000000000000", false).is_err());
    }

    #[test]
    fn test_default_flags_build_request() {
        let cli = Cli::parse_from(["launchpad", "preview"]);
        let Commands::Preview { launch, .. } = cli.command else {
            panic!("expected preview");
        };
        let request = launch.to_request().unwrap();
        assert_eq!(request.primary_max_supply, 100_000_000_000_000);
        assert_eq!(request.tge_allocation, 100_000_000);
        assert_eq!(request.halving_step_percent, 50);
    }

    #[test]
    fn test_sweep_steps_flag() {
        let cli = Cli::parse_from(["launchpad", "sweep", "--steps", "25,50,90"]);
        let Commands::Sweep { steps, .. } = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(steps, Some(vec![25, 50, 90]));
    }
}
