//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The stack parameter name cannot be carried in a query string as-is.
	#[error("invalid query parameter name: {0:?}")]
	InvalidParam(String),

	/// A wire key cannot be used inside a bracketed query key.
	#[error("invalid wire key for `{field}`: {value:?}")]
	InvalidKey {
		/// Which key table field was rejected (`name` or `data`).
		field: &'static str,
		/// The rejected value.
		value: String,
	},

	/// The name and data wire keys are identical.
	#[error("wire keys for name and data must differ (both are {0:?})")]
	DuplicateKeys(String),

	/// `max_depth` was set to zero.
	#[error("max_depth must be at least 1")]
	ZeroDepth,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
