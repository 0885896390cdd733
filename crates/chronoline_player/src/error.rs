// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player errors.

use chronoline_timeline::TimelineError;
use thiserror::Error;

/// Errors raised while loading settings or running playback
#[derive(Debug, Error)]
pub enum PlayerError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be written
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings written by a newer player
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest version this player reads
        supported: u32,
    },

    /// Settings values out of range
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Timeline rejected a query or edit
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
