//! Error types for query decoding.

use thiserror::Error;

/// Errors that can occur when decoding a parameter from a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
	/// A bracketed key is not of the form `root[a][b]`.
	#[error("malformed key: {key}")]
	MalformedKey {
		/// The decoded key as it appeared in the query.
		key: String,
	},

	/// A bracketed key nests deeper than the codec allows.
	#[error("key '{key}' nests deeper than {max} levels")]
	TooDeep {
		/// The decoded key as it appeared in the query.
		key: String,
		/// Maximum supported nesting depth.
		max: usize,
	},

	/// The same path is used both as a scalar and as a container.
	#[error("conflicting scalar and nested values at '{key}'")]
	Conflict {
		/// The key at which the conflict was detected.
		key: String,
	},

	/// A single-valued parameter appears more than once.
	#[error("parameter '{root}' appears {count} times")]
	Repeated {
		/// The repeated root parameter.
		root: String,
		/// Number of occurrences.
		count: usize,
	},

	/// A parameter value is not valid JSON.
	#[error("invalid JSON in '{root}': {message}")]
	Json {
		/// The root parameter carrying the value.
		root: String,
		/// Parser diagnostic.
		message: String,
	},
}

/// Result type for query decoding.
pub type Result<T> = std::result::Result<T, QueryError>;
