//! # Configuration Module
//!
//! This module handles loading and validating configuration from
//! environment variables. All settings are centralized here.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let policy = config.funding_policy()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LND_GRPC_HOST` | Channel daemon gRPC endpoint | `localhost:10009` |
//! | `LND_TLS_CERT_PATH` | Daemon TLS certificate | `~/.dcrlnd/tls.cert` |
//! | `LND_TLS_DOMAIN` | Name the certificate is issued for | `localhost` |
//! | `LND_MACAROON_PATH` | Admin macaroon | `~/.dcrlnd/data/chain/decred/testnet/admin.macaroon` |
//! | `SERVER_HOST` | HTTP server host | `127.0.0.1` |
//! | `SERVER_PORT` | HTTP server port | `8080` |
//! | `FAUCET_NETWORK` | Network label shown to users | `decred` |
//! | `FAUCET_NUM_CONFS` | Confirmations shown to users | `3` |
//! | `FAUCET_MIN_CHANNEL_SIZE` | Smallest channel, atoms | `50000` |
//! | `FAUCET_MAX_CHANNEL_SIZE` | Largest channel, atoms | `1073741824` |
//! | `FAUCET_ZOMBIE_AGE_HOURS` | Peer-unseen threshold | `48` |
//! | `FAUCET_SWEEP_INTERVAL_SECS` | Zombie sweep period | `3600` |
//! | `WIPE_CHANNELS` | Close all channels and exit | `false` |
//! | `CLOSE_CHANNEL` | Close one channel (`<txid>:<index>[,force]`) and exit | unset |
//! | `LOG_LEVEL` | Default log filter | `info` |

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Largest channel the faucet will create to another peer, in atoms.
pub const DEFAULT_MAX_CHANNEL_SIZE: i64 = 1 << 30;

/// Smallest channel the faucet will extend to a peer, in atoms.
pub const DEFAULT_MIN_CHANNEL_SIZE: i64 = 50_000;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Failed to parse a value
    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ==========================================
    // CHANNEL DAEMON SETTINGS
    // ==========================================

    /// `host:port` of the daemon's gRPC server.
    pub lnd_grpc_host: String,

    /// Path to the daemon's self-signed TLS certificate (PEM).
    pub tls_cert_path: String,

    /// Domain the TLS certificate was issued for.
    pub tls_domain: String,

    /// Path to the admin macaroon used to authenticate RPCs.
    pub macaroon_path: String,

    // ==========================================
    // SERVER SETTINGS
    // ==========================================

    /// HTTP server host address.
    ///
    /// Use `127.0.0.1` for localhost only, `0.0.0.0` to accept
    /// connections from any interface.
    pub server_host: String,

    /// HTTP server port number.
    pub server_port: u16,

    // ==========================================
    // FAUCET SETTINGS
    // ==========================================

    /// Network label displayed alongside the faucet state.
    pub network: String,

    /// Number of confirmations a new channel needs, shown to users.
    pub num_confs: u32,

    /// Smallest channel capacity accepted, in atoms (inclusive).
    pub min_channel_size: i64,

    /// Largest channel capacity accepted, in atoms (inclusive).
    pub max_channel_size: i64,

    /// Hours a peer may go unseen before its inactive channels are closed.
    pub zombie_age_hours: u64,

    /// Seconds between zombie sweeps.
    pub sweep_interval_secs: u64,

    /// Close every channel and exit instead of serving requests.
    pub wipe_channels: bool,

    /// Close this one channel and exit instead of serving requests.
    pub close_channel: Option<AdminClose>,

    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Use `dotenvy::dotenv()` before calling this to load from `.env` file.
    /// Paths go through `shellexpand`, so `~` and `$VAR` are honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Channel daemon
            lnd_grpc_host: get_env_or_default("LND_GRPC_HOST", "localhost:10009"),
            tls_cert_path: expand_path(
                "LND_TLS_CERT_PATH",
                &get_env_or_default("LND_TLS_CERT_PATH", "~/.dcrlnd/tls.cert"),
            )?,
            tls_domain: get_env_or_default("LND_TLS_DOMAIN", "localhost"),
            macaroon_path: expand_path(
                "LND_MACAROON_PATH",
                &get_env_or_default(
                    "LND_MACAROON_PATH",
                    "~/.dcrlnd/data/chain/decred/testnet/admin.macaroon",
                ),
            )?,

            // Server
            server_host: get_env_or_default("SERVER_HOST", "127.0.0.1"),
            server_port: parse_env("SERVER_PORT", "8080")?,

            // Faucet
            network: get_env_or_default("FAUCET_NETWORK", "decred"),
            num_confs: parse_env("FAUCET_NUM_CONFS", "3")?,
            min_channel_size: parse_env(
                "FAUCET_MIN_CHANNEL_SIZE",
                &DEFAULT_MIN_CHANNEL_SIZE.to_string(),
            )?,
            max_channel_size: parse_env(
                "FAUCET_MAX_CHANNEL_SIZE",
                &DEFAULT_MAX_CHANNEL_SIZE.to_string(),
            )?,
            zombie_age_hours: parse_env("FAUCET_ZOMBIE_AGE_HOURS", "48")?,
            sweep_interval_secs: parse_env("FAUCET_SWEEP_INTERVAL_SECS", "3600")?,
            wipe_channels: parse_bool("WIPE_CHANNELS", &get_env_or_default("WIPE_CHANNELS", "false"))?,
            close_channel: parse_admin_close(&get_env_or_default("CLOSE_CHANNEL", ""))?,
            log_level: get_env_or_default("LOG_LEVEL", "info"),
        })
    }

    /// Build the immutable funding policy from this configuration.
    ///
    /// Fails when the bounds are inconsistent or a duration is zero.
    pub fn funding_policy(&self) -> Result<FundingPolicy, ConfigError> {
        if self.min_channel_size <= 0 {
            return Err(ConfigError::InvalidValue(
                "FAUCET_MIN_CHANNEL_SIZE".to_string(),
                "must be positive".to_string(),
            ));
        }
        if self.min_channel_size > self.max_channel_size {
            return Err(ConfigError::InvalidValue(
                "FAUCET_MAX_CHANNEL_SIZE".to_string(),
                format!("must be at least {}", self.min_channel_size),
            ));
        }
        if self.zombie_age_hours == 0 {
            return Err(ConfigError::InvalidValue(
                "FAUCET_ZOMBIE_AGE_HOURS".to_string(),
                "must be non-zero".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "FAUCET_SWEEP_INTERVAL_SECS".to_string(),
                "must be non-zero".to_string(),
            ));
        }

        let zombie_age_secs = self.zombie_age_hours.checked_mul(3600).ok_or_else(|| {
            ConfigError::InvalidValue(
                "FAUCET_ZOMBIE_AGE_HOURS".to_string(),
                format!("{} hours is out of range", self.zombie_age_hours),
            )
        })?;

        Ok(FundingPolicy {
            min_channel_size: self.min_channel_size,
            max_channel_size: self.max_channel_size,
            zombie_age: Duration::from_secs(zombie_age_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
        })
    }
}

/// Process-wide policy constants, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingPolicy {
    /// Smallest channel capacity accepted, in atoms (inclusive).
    pub min_channel_size: i64,

    /// Largest channel capacity accepted, in atoms (inclusive).
    pub max_channel_size: i64,

    /// How long a peer may go unseen before its inactive channels are zombies.
    pub zombie_age: Duration,

    /// Time between zombie sweeps.
    pub sweep_interval: Duration,
}

impl Default for FundingPolicy {
    fn default() -> Self {
        Self {
            min_channel_size: DEFAULT_MIN_CHANNEL_SIZE,
            max_channel_size: DEFAULT_MAX_CHANNEL_SIZE,
            zombie_age: Duration::from_secs(48 * 3600),
            sweep_interval: Duration::from_secs(3600),
        }
    }
}

/// One-shot administrative close requested through `CLOSE_CHANNEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminClose {
    /// Channel point as given, `<txid>:<index>`. Parsed by the faucet.
    pub channel_point: String,

    /// Close unilaterally instead of cooperatively.
    pub force: bool,
}

/// Parse `<txid>:<index>[,force]`. An empty value means no close.
fn parse_admin_close(value: &str) -> Result<Option<AdminClose>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let (channel_point, force) = match value.split_once(',') {
        None => (value, false),
        Some((point, "force")) => (point, true),
        Some((_, flag)) => {
            return Err(ConfigError::InvalidValue(
                "CLOSE_CHANNEL".to_string(),
                format!("unknown flag {:?}, expected \"force\"", flag),
            ))
        }
    };

    Ok(Some(AdminClose {
        channel_point: channel_point.trim().to_string(),
        force,
    }))
}

/// Get an environment variable with a default value.
///
/// Returns the default if the variable is not set.
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError(key.to_string(), e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::ParseError(
            key.to_string(),
            format!("expected a boolean, got {:?}", other),
        )),
    }
}

fn expand_path(key: &str, path: &str) -> Result<String, ConfigError> {
    shellexpand::full(path)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}
