//! Layered configuration: defaults, config file, `STAKECTL_*` environment,
//! then command line overrides.

use anyhow::{anyhow, bail, Context, Result};
use config::{Config, ConfigError, Environment, File, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "STAKECTL";
pub const DEFAULT_CONNECTION: &str = "http://localhost:5052";
pub const DEFAULT_TIMEOUT: &str = "10s";

/// Default wallet store location.
pub fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stakectl")
        .join("wallets")
}

/// Config file read when `--config` is not given, if it exists.
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stakectl").join("config.toml"))
}

/// Build the configuration. An explicit `config_file` must exist.
pub fn load(config_file: Option<&Path>, overrides: Vec<(&'static str, Value)>) -> Result<Config> {
    let mut builder = Config::builder()
        .set_default("timeout", DEFAULT_TIMEOUT)?
        .set_default("connection", DEFAULT_CONNECTION)?
        .set_default("base_dir", default_base_dir().to_string_lossy().into_owned())?
        .set_default("remote", "")?
        .set_default("quiet", false)?
        .set_default("verbose", false)?
        .set_default("debug", false)?;

    match config_file {
        Some(path) => builder = builder.add_source(File::from(path).required(true)),
        None => {
            if let Some(path) = default_config_file() {
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

    for (key, value) in overrides {
        builder = builder.set_override(key, value)?;
    }

    builder.build().context("failed to load configuration")
}

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: String,
    pub base_dir: PathBuf,
    pub timeout: Duration,
    pub remote: String,
    pub quiet: bool,
    pub verbose: bool,
    pub debug: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.get_string("timeout")?;
        Ok(Self {
            connection: config.get_string("connection")?,
            base_dir: PathBuf::from(config.get_string("base_dir")?),
            timeout: parse_duration(&timeout).with_context(|| format!("invalid timeout {timeout}"))?,
            remote: config.get_string("remote")?,
            quiet: config.get_bool("quiet")?,
            verbose: config.get_bool("verbose")?,
            debug: config.get_bool("debug")?,
        })
    }
}

/// Parse `500ms`, `10s`, `2m`, `1h` or a bare number of seconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value = value.trim();
    if value.is_empty() {
        bail!("empty duration");
    }

    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(split) => value.split_at(split),
        None => (value, "s"),
    };
    let number: u64 = number
        .parse()
        .map_err(|_| anyhow!("invalid duration {value}"))?;

    match unit {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => Ok(Duration::from_secs(number.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(number.saturating_mul(3600))),
        _ => bail!("invalid duration unit in {value}"),
    }
}

/// Read a list that may be an array (config file) or a comma separated
/// string (environment). Missing keys are empty.
pub fn string_list(config: &Config, key: &str) -> Result<Vec<String>> {
    let items = match config.get::<Vec<String>>(key) {
        Ok(items) => items,
        Err(_) => match config.get_string(key) {
            Ok(value) => value.split(',').map(str::to_string).collect(),
            Err(ConfigError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        },
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
