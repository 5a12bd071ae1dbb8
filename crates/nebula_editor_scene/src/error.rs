// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while loading engine configuration.

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config text is not valid RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The config could not be written as RON
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// The cycle length must be a positive, finite number of seconds
    #[error("Invalid cycle length: {0}")]
    InvalidCycleLength(f64),

    /// The renderer must be allowed to show at least one background
    #[error("Preview limit must be at least 1")]
    InvalidPreviewLimit,
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
