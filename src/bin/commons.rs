//! Commons SDK - command line interface
//!
//! Formatting helpers, name resolution, tip attestations, indexer analytics
//! and contract reads for the Commons token ecosystem.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use commons_sdk::{
    address::parse_address,
    amount::{
        format_token_amount, parse_units, COMMONS_DECIMALS, DEFAULT_DISPLAY_DECIMALS, MAX_DECIMALS,
    },
    analytics::{balance_shares, filter_accounts, sort_accounts, AccountCard, AccountSort},
    attestation::{decode_tip, summary_line, UNREADABLE_TIP},
    client::CommonsClient,
    config::{CommonsNetworkConfig, Config, NetworkConstants},
    ens::NameResolver,
    indexer::IndexerClient,
    staking::{approve_call, check_stake, parse_stake_input, stake_call},
    time::{format_block_timestamp, format_duration},
    tipping::{prepare_tip, tip_calls},
    Address, U256,
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "commons")]
#[command(about = "Commons token toolkit", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network table from config/network.toml (e.g. celo)
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Format base units for display (truncating)
    FormatAmount {
        /// Amount in base units
        amount: String,
        #[arg(long, default_value_t = COMMONS_DECIMALS, value_parser = decimals_parser())]
        decimals: u32,
        #[arg(long, default_value_t = DEFAULT_DISPLAY_DECIMALS, value_parser = decimals_parser())]
        display_decimals: u32,
    },

    /// Convert a decimal amount to base units
    ParseAmount {
        amount: String,
        #[arg(long, default_value_t = COMMONS_DECIMALS, value_parser = decimals_parser())]
        decimals: u32,
    },

    /// Format seconds as HH:MM:SS
    Countdown { seconds: u64 },

    /// Format a unix timestamp as MM/DD/YYYY
    Date { timestamp: String },

    /// Shorten an address to 0x1234...abcd
    Shorten { address: String },

    /// Print an address in checksum casing
    Checksum { address: String },

    /// Resolve a name (or pass through a hex address)
    Resolve { name: String },

    /// Decode a tip attestation payload (decodedDataJson)
    DecodeTip { json: String },

    /// List indexed accounts
    Accounts {
        /// balance or stakedNFTs
        #[arg(long, default_value = "balance")]
        sort: String,
        /// Match on address or balance
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// List tip attestations
    Tips,

    /// Show the reward claim state of an account
    ClaimStatus { account: String },

    /// Show the membership NFT of an account
    Membership { account: String },

    /// Check a stake and print the stake call to submit
    Stake {
        #[arg(long)]
        account: String,
        #[arg(long)]
        amount: String,
    },

    /// Print the approve call granting the staking contract an allowance
    ApproveStake {
        #[arg(long)]
        amount: String,
    },

    /// Validate a tip and print the calls to submit
    PrepareTip {
        /// Recipient: directory name, ENS name or hex address
        recipient: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        amount: String,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&path)?;
    debug!("Using config {}", path.display());

    if let Some(network) = &cli.network {
        let constants = NetworkConstants::load(network)
            .with_context(|| format!("Unknown network '{}'", network))?;
        let name_service = config.network.name_service.clone();
        config.network =
            CommonsNetworkConfig::from_constants(&constants).with_name_service(name_service);
    }
    config.network = config.network.apply_env_overrides();
    Ok(config)
}

fn decimals_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(MAX_DECIMALS))
}

fn parse_account(text: &str) -> anyhow::Result<Address> {
    Ok(parse_address(text)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    let network = &config.network;

    match &cli.command {
        Commands::FormatAmount {
            amount,
            decimals,
            display_decimals,
        } => {
            let amount = U256::from_str_radix(amount, 10)
                .map_err(|e| anyhow!("Invalid base-unit amount '{}': {}", amount, e))?;
            println!("{}", format_token_amount(Some(amount), *decimals, *display_decimals));
        }
        Commands::ParseAmount { amount, decimals } => {
            println!("{}", parse_units(amount, *decimals)?);
        }
        Commands::Countdown { seconds } => println!("{}", format_duration(*seconds)),
        Commands::Date { timestamp } => println!("{}", format_block_timestamp(timestamp)),
        Commands::Shorten { address } => println!("{}", commons_sdk::shorten_address(address)),
        Commands::Checksum { address } => println!("{}", parse_account(address)?),
        Commands::Resolve { name } => {
            let resolver = NameResolver::mainnet(&network.name_service);
            match resolver.resolve(name).await {
                Some(address) => println!("{}", address),
                None => bail!("Could not resolve '{}'", name),
            }
        }
        Commands::DecodeTip { json } => match decode_tip(json) {
            Ok(payload) => print_json(&payload)?,
            Err(e) => {
                println!("{}", UNREADABLE_TIP);
                return Err(e.into());
            }
        },
        Commands::Accounts { sort, filter } => {
            let sort: AccountSort = sort.parse()?;
            let indexer = IndexerClient::new(&network.indexer);
            let accounts = indexer.fetch_accounts().await?;
            info!("Fetched {} accounts", accounts.len());

            let accounts = sort_accounts(filter_accounts(&accounts, filter), sort);
            for (card, share) in accounts
                .iter()
                .map(AccountCard::from_account)
                .zip(balance_shares(&accounts))
            {
                println!(
                    "{}  {}  ({})  staked NFTs: {}",
                    card.title,
                    card.balance,
                    share.percent(),
                    card.staked_count
                );
                if let Some(last) = card.last_staked {
                    println!(
                        "    last staked #{}: {} [{}] {}",
                        last.token_id, last.amount, last.status, last.timestamp
                    );
                }
            }
        }
        Commands::Tips => {
            let indexer = IndexerClient::new(&network.indexer);
            let records = indexer.fetch_tip_attestations().await?;
            info!("Fetched {} tip attestations", records.len());
            for record in &records {
                println!("{}", summary_line(record));
            }
        }
        Commands::ClaimStatus { account } => {
            let account = parse_account(account)?;
            let client = CommonsClient::new(network.clone());
            let status = client.claim_status(account).await?;
            let balance = client.balance_of(account).await?;
            println!(
                "Balance: {} ${}",
                format_token_amount(Some(balance), network.token.decimals, DEFAULT_DISPLAY_DECIMALS),
                network.token.symbol
            );
            println!("{}", status.action_label());
            if status.whitelisted {
                println!("Next claim in {}", status.countdown());
            }
        }
        Commands::Membership { account } => {
            let account = parse_account(account)?;
            let client = CommonsClient::new(network.clone());
            match client.staked_token(account).await? {
                Some(token_id) => {
                    println!("Token ID: {}", token_id);
                    print_json(&client.token_metadata(token_id).await?)?;
                }
                None => println!("No membership NFT staked"),
            }
        }
        Commands::Stake { account, amount } => {
            let account = parse_account(account)?;
            let amount = parse_stake_input(amount)?;
            let client = CommonsClient::new(network.clone());
            let balance = client.balance_of(account).await?;
            let allowance = client.staking_allowance(account).await?;
            let amount = check_stake(amount, balance, allowance)?;
            print_json(&stake_call(amount, &network.contracts)?)?;
        }
        Commands::ApproveStake { amount } => {
            let amount = parse_stake_input(amount)?;
            print_json(&approve_call(amount, &network.contracts)?)?;
        }
        Commands::PrepareTip {
            recipient,
            from,
            comment,
            amount,
        } => {
            let from = parse_account(from)?;
            let identifier = config
                .recipient(recipient)
                .map(|r| r.address.clone())
                .unwrap_or_else(|| recipient.clone());

            let resolver = NameResolver::mainnet(&network.name_service);
            let to = resolver.resolve(&identifier).await;

            let client = CommonsClient::new(network.clone());
            let balance = client.balance_of(from).await?;
            let praise = prepare_tip(comment, from, to, amount, balance)?;
            let allowance = client.allowance(from, network.contracts.praise).await?;
            print_json(&tip_calls(&praise, allowance, &network.contracts))?;
        }
    }

    Ok(())
}
