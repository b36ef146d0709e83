//! Query-string codecs for nested values.
//!
//! A URL query string is modelled as an ordered list of raw segments
//! ([`QueryString`]). A [`QueryCodec`] maps a nested [`serde_json::Value`]
//! to the segments rooted at one parameter and back. Segments under other
//! roots are never re-encoded, so foreign parameters survive a
//! read-modify-write cycle byte-for-byte.
//!
//! Two codecs are provided:
//! * [`Brackets`]: `qs`-style `root[key][0]=value` pairs with typed
//!   literals for non-string values, the default
//! * [`Json`]: `root=<compact JSON>`
//!
//! Both are lossless for any JSON value.

pub mod brackets;
pub mod error;
pub mod json;
pub mod query_string;

pub use brackets::Brackets;
pub use error::{QueryError, Result};
pub use json::Json;
pub use query_string::QueryString;
use serde_json::{Map, Value};

/// Maps nested values to and from the query pairs under one root parameter.
pub trait QueryCodec: std::fmt::Debug + Send + Sync {
	/// Short identifier used in logs and configuration.
	fn name(&self) -> &'static str;

	/// Returns the root parameter a decoded pair key belongs to.
	fn root_of<'a>(&self, key: &'a str) -> &'a str {
		key
	}

	/// Flattens `value` into decoded `(key, value)` pairs rooted at `root`.
	///
	/// Returning no pairs means the value has no representation; writing it
	/// removes the root.
	fn encode(&self, root: &str, value: &Value) -> Vec<(String, String)>;

	/// Rebuilds the value from the decoded pairs whose root is `root`.
	///
	/// `pairs` only contains pairs for which [`QueryCodec::root_of`] returned
	/// `root`, in query order. Returns `Ok(None)` when `pairs` is empty.
	fn decode(&self, root: &str, pairs: &[(String, String)]) -> Result<Option<Value>>;
}

/// Parses a whole query string into a mapping of root parameter to value.
pub fn parse(codec: &dyn QueryCodec, text: &str) -> Result<Map<String, Value>> {
	let query = QueryString::parse(text);
	let mut out = Map::new();
	for root in query.roots(codec) {
		if let Some(value) = query.decode(codec, &root)? {
			out.insert(root, value);
		}
	}
	Ok(out)
}

/// Serializes a mapping of root parameter to value into query-string text
/// (without the leading `?`).
pub fn stringify(codec: &dyn QueryCodec, map: &Map<String, Value>) -> String {
	let mut query = QueryString::default();
	for (root, value) in map {
		query.set(codec, root, value);
	}
	query.to_string()
}
