//! Error types for loading the currency rate file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while producing a rate table from the rate file.
///
/// Every variant is fatal: the converter reports the diagnostic and exits
/// without entering the interactive loop.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The rate file does not exist at the given path.
    #[error("JSON file not found: {}", .path.display())]
    NotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The rate file exists but could not be read.
    #[error("Error reading currency data: {0}")]
    Io(#[from] io::Error),

    /// The rate file content does not parse as the expected JSON shape.
    #[error("Error loading currency data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A currency entry carries a rate that cannot be converted through.
    #[error("Invalid rate for {code}: {rate} (rates must be positive)")]
    InvalidRate {
        /// Currency code as it appeared in the file.
        code: String,
        /// The offending rate value.
        rate: f64,
    },
}
