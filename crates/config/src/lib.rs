//! Configuration for the overlay stack synchronizer.
//!
//! Configuration is written in TOML. Every field is optional:
//!
//! ```toml
//! # Query parameter carrying the overlay stack.
//! param = "d"
//!
//! # "brackets" (qs-compatible) or "json" (type-preserving).
//! codec = "brackets"
//!
//! # Whether opening/closing pushes a history entry or replaces the current one.
//! history = "push"
//!
//! # Refuse to open more overlays than this. Unbounded when omitted.
//! max_depth = 8
//!
//! # Short wire keys for entry fields.
//! [keys]
//! name = "n"
//! data = "d"
//! ```
//!
//! # Configuration Files
//!
//! [`OverlayConfig::load_default`] looks for `$XDG_CONFIG_HOME/tether/config.toml`
//! (or the platform equivalent) and falls back to defaults when it is absent.

pub mod error;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Characters that would change how a key or parameter is split when parsed.
const RESERVED: &[char] = &['[', ']', '&', '=', '#', '?', '+', '%'];

/// Synchronizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
	/// Query parameter carrying the serialized stack.
	pub param: String,
	/// Short wire keys for entry fields.
	pub keys: KeyTable,
	/// Encoding of the stack inside the query string.
	pub codec: CodecKind,
	/// History behaviour of writes.
	pub history: HistoryMode,
	/// Maximum number of simultaneously open overlays.
	pub max_depth: Option<usize>,
}

impl Default for OverlayConfig {
	fn default() -> Self {
		Self {
			param: "d".to_string(),
			keys: KeyTable::default(),
			codec: CodecKind::default(),
			history: HistoryMode::default(),
			max_depth: None,
		}
	}
}

/// Bidirectional mapping between entry field names and their wire keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyTable {
	/// Wire key for the overlay name.
	pub name: String,
	/// Wire key for the overlay data.
	pub data: String,
}

impl Default for KeyTable {
	fn default() -> Self {
		Self {
			name: "n".to_string(),
			data: "d".to_string(),
		}
	}
}

/// Query-string encoding of the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
	/// `qs`-style bracket notation.
	#[default]
	Brackets,
	/// Compact JSON in a single parameter.
	Json,
}

/// How a write is recorded in navigation history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
	/// Add a history entry, so back closes the overlay.
	#[default]
	Push,
	/// Overwrite the current history entry.
	Replace,
}

impl OverlayConfig {
	/// Parse a TOML string into a validated [`OverlayConfig`].
	pub fn parse(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Load the user configuration file, or defaults if there is none.
	pub fn load_default() -> Result<Self> {
		match default_path() {
			Some(path) if path.is_file() => {
				tracing::debug!(path = %path.display(), "config.load");
				Self::load(path)
			}
			_ => Ok(Self::default()),
		}
	}

	/// Checks that the parameter and wire keys survive a query-string round trip.
	pub fn validate(&self) -> Result<()> {
		if !is_plain(&self.param) {
			return Err(ConfigError::InvalidParam(self.param.clone()));
		}
		for (field, value) in [("name", &self.keys.name), ("data", &self.keys.data)] {
			// All-digit keys would be read back as list indices.
			if !is_plain(value) || value.bytes().all(|b| b.is_ascii_digit()) {
				return Err(ConfigError::InvalidKey {
					field,
					value: value.clone(),
				});
			}
		}
		if self.keys.name == self.keys.data {
			return Err(ConfigError::DuplicateKeys(self.keys.name.clone()));
		}
		if self.max_depth == Some(0) {
			return Err(ConfigError::ZeroDepth);
		}
		Ok(())
	}
}

/// Location of the user configuration file.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("tether").join("config.toml"))
}

fn is_plain(s: &str) -> bool {
	!s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c.is_control() || RESERVED.contains(&c))
}
