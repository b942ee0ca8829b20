//! Error types
//!
//! Nothing in the game is fatal: these errors are logged by the caller and the
//! affected feature degrades (no sound, no saved high score, default tuning).

use thiserror::Error;

/// Failure talking to the persistent key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    /// No store is reachable (private browsing, storage disabled)
    #[error("storage unavailable")]
    Unavailable,
    /// The store refused the write (quota, security policy)
    #[error("failed to write key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// Invalid game balance configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning json is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("spawn interval range is inverted: {min}..={max}")]
    InvertedSpawnRange { min: u32, max: u32 },
}

/// A manifest asset that could not be fetched
#[derive(Debug, Error)]
#[error("asset {key} failed to load from {url}")]
pub struct AssetError {
    pub key: &'static str,
    pub url: &'static str,
}
