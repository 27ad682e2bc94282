//! # Utilities Module
//!
//! Value types and helpers shared across the faucet:
//!
//! - `TxId` - a 32-byte transaction hash, displayed byte-reversed like every
//!   block explorer does
//! - `ChannelPoint` - the `<txid>:<index>` outpoint addressing a channel
//! - conversions between user-facing coin amounts and daemon atoms

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of atoms in one coin.
pub const ATOMS_PER_COIN: f64 = 1e8;

/// Length of a transaction hash in bytes.
pub const TXID_LEN: usize = 32;

/// Errors produced while parsing transaction ids and channel points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelPointError {
    /// The string has no `:` separating txid and output index.
    #[error("channel point {0:?} is missing the output index")]
    MissingIndex(String),

    /// The txid part is not 64 hex characters.
    #[error("invalid funding txid {0:?}")]
    InvalidTxid(String),

    /// Raw hash bytes had the wrong length.
    #[error("txid must be {TXID_LEN} bytes, got {0}")]
    InvalidLength(usize),

    /// The output index is not a decimal u32.
    #[error("invalid output index {0:?}")]
    InvalidIndex(String),
}

/// A transaction hash in wire (internal) byte order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId([u8; TXID_LEN]);

impl TxId {
    /// Build a txid from raw hash bytes as carried in RPC messages.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ChannelPointError> {
        let hash: [u8; TXID_LEN] = bytes
            .try_into()
            .map_err(|_| ChannelPointError::InvalidLength(bytes.len()))?;
        Ok(Self(hash))
    }

    /// Raw bytes in wire order.
    pub fn as_bytes(&self) -> &[u8; TXID_LEN] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self)
    }
}

impl FromStr for TxId {
    type Err = ChannelPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != TXID_LEN * 2 {
            return Err(ChannelPointError::InvalidTxid(s.to_string()));
        }
        let mut bytes =
            hex::decode(s).map_err(|_| ChannelPointError::InvalidTxid(s.to_string()))?;
        bytes.reverse();
        Self::from_slice(&bytes)
    }
}

impl Serialize for TxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Funding outpoint of a channel.
///
/// The canonical text form is `"<64-hex-char txid>:<decimal output index>"`,
/// which is what the daemon reports in channel listings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ChannelPoint {
    pub txid: TxId,
    pub output_index: u32,
}

impl ChannelPoint {
    pub fn new(txid: TxId, output_index: u32) -> Self {
        Self { txid, output_index }
    }
}

impl fmt::Display for ChannelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.output_index)
    }
}

impl FromStr for ChannelPoint {
    type Err = ChannelPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, index) = s
            .split_once(':')
            .ok_or_else(|| ChannelPointError::MissingIndex(s.to_string()))?;

        let txid = txid.parse()?;
        let output_index = index
            .parse()
            .map_err(|_| ChannelPointError::InvalidIndex(index.to_string()))?;

        Ok(Self { txid, output_index })
    }
}

impl Serialize for ChannelPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a decimal coin amount entered by a user into atoms.
///
/// Returns `None` when the text is not a finite number. The result is
/// rounded to the nearest atom, so `"0.29"` is 29_000_000 rather than one
/// atom short.
///
/// ## Examples
///
/// ```rust,ignore
/// assert_eq!(coins_to_atoms("1.5"), Some(150_000_000));
/// assert_eq!(coins_to_atoms("abc"), None);
/// ```
pub fn coins_to_atoms(amount: &str) -> Option<i64> {
    let coins: f64 = amount.trim().parse().ok()?;
    if !coins.is_finite() {
        return None;
    }
    Some((coins * ATOMS_PER_COIN).round() as i64)
}

/// Convert atoms to a coin amount for display.
pub fn atoms_to_coins(atoms: i64) -> f64 {
    atoms as f64 / ATOMS_PER_COIN
}

/// Format atoms as a coin string without trailing zeros, e.g. `"0.0005"`.
pub fn format_coins(atoms: i64) -> String {
    let formatted = format!("{:.8}", atoms_to_coins(atoms));
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Extract the git commit hash from a daemon version string.
///
/// Daemons built with `make install` report something like
/// `0.3.0-beta commit=v0.3.0-12-g1a2b...`. The right-most 40 characters are
/// taken as the hash when enough of them follow the `commit=` marker.
/// Returns an empty string otherwise.
pub fn parse_commit_hash(version: &str) -> String {
    const MARKER: &str = "commit=";
    const HASH_LEN: usize = 40;

    let Some(pos) = version.rfind(MARKER) else {
        return String::new();
    };
    if version.len() - pos - MARKER.len() < HASH_LEN {
        return String::new();
    }

    version
        .get(version.len() - HASH_LEN..)
        .map(|hash| hash.replace('\'', ""))
        .unwrap_or_default()
}

/// Truncate a string to a maximum length.
///
/// Useful for logging long public keys.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len || max_len < 5 || !s.is_ascii() {
        s.to_string()
    } else {
        let half = (max_len - 3) / 2;
        format!("{}...{}", &s[..half], &s[s.len() - half..])
    }
}
