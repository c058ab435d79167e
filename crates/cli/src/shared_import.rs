//! `wallet shared-import`

use crate::settings::{parse_duration, string_list};
use anyhow::{bail, Context, Result};
use config::{Config, ConfigError};
use parking_lot::Mutex;
use stakectl_wallet::{Wallet, WalletStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Everything the import needs, gathered and checked up front.
#[derive(Debug, Clone)]
pub struct SharedImportInput {
    pub timeout: Duration,
    pub quiet: bool,
    pub verbose: bool,
    pub debug: bool,
    pub file: PathBuf,
    pub data: Vec<u8>,
    pub shares: Vec<String>,
}

impl SharedImportInput {
    pub fn from_config(config: &Config) -> Result<Self> {
        if !optional_string(config, "remote")?.is_empty() {
            bail!("wallet import not available for remote wallets");
        }

        let timeout = optional_string(config, "timeout")?;
        let timeout = if timeout.is_empty() {
            Duration::ZERO
        } else {
            parse_duration(&timeout).with_context(|| format!("invalid timeout {timeout}"))?
        };
        if timeout.is_zero() {
            bail!("timeout is required");
        }

        let quiet = optional_bool(config, "quiet")?;
        let verbose = optional_bool(config, "verbose")?;
        let debug = optional_bool(config, "debug")?;

        let file = optional_string(config, "file")?;
        if file.is_empty() {
            bail!("file is required");
        }
        let file = PathBuf::from(file);
        let data = std::fs::read(&file).context("failed to read wallet import file")?;

        let shares = string_list(config, "shares")?;
        if shares.is_empty() {
            bail!("failed to obtain shares");
        }

        Ok(Self {
            timeout,
            quiet,
            verbose,
            debug,
            file,
            data,
            shares,
        })
    }
}

/// Whether the blocking import may still write the wallet.
#[derive(Debug, Default)]
struct ImportGate {
    abandoned: bool,
    committed: bool,
}

/// Import the wallet, giving up once the input's timeout has passed.
///
/// A timed-out import never writes. If the write had already begun when the
/// timeout fired, it is awaited and the import succeeds.
pub async fn process(input: &SharedImportInput, store: WalletStore) -> Result<Wallet> {
    debug!(file = %input.file.display(), shares = input.shares.len(), "importing shared wallet");

    let gate = Arc::new(Mutex::new(ImportGate::default()));
    let worker_gate = gate.clone();
    let data = input.data.clone();
    let shares = input.shares.clone();
    let mut import = tokio::task::spawn_blocking(move || {
        import_unless_abandoned(&store, &data, &shares, &worker_gate)
    });

    let joined = match tokio::time::timeout(input.timeout, &mut import).await {
        Ok(joined) => joined,
        Err(_) => {
            let committed = {
                let mut gate = gate.lock();
                gate.abandoned = true;
                gate.committed
            };
            if !committed {
                bail!("timed out importing wallet");
            }
            debug!("timeout reached while saving wallet, waiting for the write");
            import.await
        }
    };

    let wallet = joined
        .context("wallet import task failed")?
        .context("failed to import wallet")?
        .context("timed out importing wallet")?;

    info!(
        wallet = %wallet.name(),
        accounts = wallet.accounts.len(),
        shares = input.shares.len(),
        "imported shared wallet"
    );
    Ok(wallet)
}

/// Validate, then save unless the caller has already given up.
fn import_unless_abandoned(
    store: &WalletStore,
    data: &[u8],
    shares: &[String],
    gate: &Mutex<ImportGate>,
) -> stakectl_wallet::Result<Option<Wallet>> {
    let wallet = store.check_shared_import(data, shares)?;
    {
        let mut gate = gate.lock();
        if gate.abandoned {
            return Ok(None);
        }
        gate.committed = true;
    }
    store.save(&wallet)?;
    Ok(Some(wallet))
}

fn optional_string(config: &Config, key: &str) -> Result<String> {
    match config.get_string(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

fn optional_bool(config: &Config, key: &str) -> Result<bool> {
    match config.get_bool(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
