//! Error types for loading review inputs.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading the rule configuration or the change list.
///
/// Problems inside a well-formed document (a pattern whose value is not a
/// list, a rule without an id) are not errors; they are logged and skipped.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML, or has the wrong top-level shape.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}
