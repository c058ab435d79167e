//! stakectl command line interface
//!
//! Looks up validators on a beacon node and manages the local wallets used
//! to name them.

mod accounts;
mod logging;
mod settings;
mod shared_import;

use crate::accounts::WalletAccounts;
use crate::logging::init_logging;
use crate::settings::{load as load_config, string_list, Settings};
use crate::shared_import::SharedImportInput;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{Config, Value};
use stakectl_beacon_client::BeaconClient;
use stakectl_types::{BlsPublicKey, StateId, ValidatorRecord};
use stakectl_validator_resolution::{Context as ResolutionContext, ValidatorResolver};
use stakectl_wallet::{Account, WalletKind, WalletStore};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stakectl")]
#[command(about = "Ethereum staking command line tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Operation timeout, e.g. 10s, 2m, 500ms
    #[arg(long, global = true)]
    timeout: Option<String>,

    /// Beacon node URL
    #[arg(long, global = true)]
    connection: Option<String>,

    /// Wallet store directory
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Remote wallet endpoint
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Suppress output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log progress
    #[arg(long, global = true)]
    verbose: bool,

    /// Log debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validator operations
    Validator {
        #[command(subcommand)]
        action: ValidatorCommands,
    },
    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },
    /// Account operations
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
}

#[derive(Subcommand)]
enum ValidatorCommands {
    /// Show validators by index, public key, account or index range
    Info {
        /// Validators, comma separated or repeated
        #[arg(long = "validators", alias = "validator", value_delimiter = ',')]
        validators: Vec<String>,
        /// State to query
        #[arg(long, default_value = "head")]
        state: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Import a wallet from a shared export
    SharedImport {
        /// Export file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Key shares, comma separated or repeated
        #[arg(long, value_delimiter = ',')]
        shares: Vec<String>,
    },
    /// Create an empty wallet
    Create {
        /// Wallet name
        #[arg(long)]
        wallet: String,
        /// Hold distributed (threshold) accounts
        #[arg(long)]
        distributed: bool,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Add an account to a wallet
    Create {
        /// Account path, wallet/account
        #[arg(long)]
        account: String,
        /// Account public key
        #[arg(long)]
        public_key: String,
        /// Composite public key of a distributed account
        #[arg(long)]
        composite_public_key: Option<String>,
        /// Signing threshold of a distributed account
        #[arg(long)]
        threshold: Option<u32>,
        /// Distributed participant as id=endpoint, repeatable
        #[arg(long = "participant", value_parser = parse_participant)]
        participants: Vec<(u64, String)>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut quiet = cli.global.quiet;

    match run(cli, &mut quiet).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !quiet {
                eprintln!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, quiet: &mut bool) -> Result<()> {
    let config = load_config(cli.global.config.as_deref(), overrides(&cli))?;
    let settings = Settings::from_config(&config)?;
    *quiet = settings.quiet;
    init_logging(&settings);

    match cli.command {
        Commands::Validator { action } => handle_validator_commands(action, &config, &settings).await,
        Commands::Wallet { action } => handle_wallet_commands(action, &config, &settings).await,
        Commands::Account { action } => handle_account_commands(action, &settings),
    }
}

/// Command line values that take precedence over file and environment.
fn overrides(cli: &Cli) -> Vec<(&'static str, Value)> {
    let global = &cli.global;
    let mut overrides = Vec::new();

    if let Some(timeout) = &global.timeout {
        overrides.push(("timeout", Value::from(timeout.as_str())));
    }
    if let Some(connection) = &global.connection {
        overrides.push(("connection", Value::from(connection.as_str())));
    }
    if let Some(base_dir) = &global.base_dir {
        overrides.push(("base_dir", Value::from(base_dir.to_string_lossy().into_owned())));
    }
    if let Some(remote) = &global.remote {
        overrides.push(("remote", Value::from(remote.as_str())));
    }
    for (key, set) in [("quiet", global.quiet), ("verbose", global.verbose), ("debug", global.debug)] {
        if set {
            overrides.push((key, Value::from(true)));
        }
    }

    match &cli.command {
        Commands::Validator {
            action: ValidatorCommands::Info { validators, .. },
        } if !validators.is_empty() => {
            overrides.push(("validators", Value::from(validators.clone())));
        }
        Commands::Wallet {
            action: WalletCommands::SharedImport { file, shares },
        } => {
            if let Some(file) = file {
                overrides.push(("file", Value::from(file.to_string_lossy().into_owned())));
            }
            if !shares.is_empty() {
                overrides.push(("shares", Value::from(shares.clone())));
            }
        }
        _ => {}
    }

    overrides
}

async fn handle_validator_commands(
    cmd: ValidatorCommands,
    config: &Config,
    settings: &Settings,
) -> Result<()> {
    match cmd {
        ValidatorCommands::Info { state, json, .. } => {
            let ids = string_list(config, "validators")?;
            if ids.is_empty() {
                bail!("no validators specified");
            }

            let client = BeaconClient::new(settings.connection.clone());
            let accounts = WalletAccounts::new(WalletStore::new(settings.base_dir.clone()));
            let resolver = ValidatorResolver::new(Arc::new(client), Arc::new(accounts));

            let ctx = ResolutionContext::with_timeout(settings.timeout);
            let records = resolver
                .resolve_validators(&ctx, &ids, &StateId::new(state))
                .await
                .context("failed to resolve validators")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if !settings.quiet {
                for record in &records {
                    println!("{}", format_record(record));
                }
            }
        }
    }

    Ok(())
}

fn format_record(record: &ValidatorRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.index,
        record.pubkey(),
        record.status,
        record.balance
    )
}

async fn handle_wallet_commands(
    cmd: WalletCommands,
    config: &Config,
    settings: &Settings,
) -> Result<()> {
    let store = WalletStore::new(settings.base_dir.clone());

    match cmd {
        WalletCommands::SharedImport { .. } => {
            let input = SharedImportInput::from_config(config)?;
            let wallet = shared_import::process(&input, store).await?;
            if !input.quiet {
                println!("Imported wallet {}", wallet.name());
            }
        }
        WalletCommands::Create {
            wallet,
            distributed,
        } => {
            let kind = if distributed {
                WalletKind::Distributed
            } else {
                WalletKind::NonDeterministic
            };
            let wallet = store
                .create_wallet(&wallet, kind)
                .context("failed to create wallet")?;
            if !settings.quiet {
                println!("{}", wallet.uuid());
            }
        }
    }

    Ok(())
}

fn handle_account_commands(cmd: AccountCommands, settings: &Settings) -> Result<()> {
    let store = WalletStore::new(settings.base_dir.clone());

    match cmd {
        AccountCommands::Create {
            account,
            public_key,
            composite_public_key,
            threshold,
            participants,
        } => {
            let (wallet_name, account_name) = stakectl_wallet::parse_account_path(&account)?;
            let public_key: BlsPublicKey = public_key.parse().context("invalid public key")?;

            let account = match composite_public_key {
                Some(composite) => {
                    let composite: BlsPublicKey =
                        composite.parse().context("invalid composite public key")?;
                    let threshold =
                        threshold.ok_or_else(|| anyhow!("threshold is required for distributed accounts"))?;
                    let participants: BTreeMap<u64, String> = participants.into_iter().collect();
                    Account::distributed(account_name, public_key, composite, threshold, participants)
                }
                None => Account::new(account_name, public_key),
            };

            let created = account.uuid;
            store
                .add_account(wallet_name, account)
                .context("failed to create account")?;
            if !settings.quiet {
                println!("{created}");
            }
        }
    }

    Ok(())
}

fn parse_participant(value: &str) -> std::result::Result<(u64, String), String> {
    let (id, endpoint) = value
        .split_once('=')
        .ok_or_else(|| format!("expected id=endpoint, got {value}"))?;
    let id = id
        .parse::<u64>()
        .map_err(|e| format!("invalid participant id {id}: {e}"))?;
    if endpoint.is_empty() {
        return Err(format!("missing endpoint for participant {id}"));
    }
    Ok((id, endpoint.to_string()))
}
