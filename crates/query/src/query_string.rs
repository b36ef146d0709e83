use std::fmt;

use serde_json::Value;
use url::form_urlencoded;

use crate::{QueryCodec, Result};

/// Ordered, raw view of a URL query string.
///
/// Each `&`-separated segment keeps its original bytes alongside the decoded
/// key and value. Mutations only touch the segments of the root being
/// written; every other segment is emitted exactly as it was parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
	segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
	raw: String,
	key: String,
	value: String,
}

impl Segment {
	/// `raw` holds no `&`, so it is exactly one form pair. `+` reads as a
	/// space and invalid UTF-8 is replaced.
	fn from_raw(raw: &str) -> Self {
		let (key, value) = form_urlencoded::parse(raw.as_bytes()).next().unwrap_or_default();
		Self {
			raw: raw.to_string(),
			key: key.into_owned(),
			value: value.into_owned(),
		}
	}

	fn from_pair(key: String, value: String) -> Self {
		Self {
			raw: format!("{}={}", urlencoding::encode(&key), urlencoding::encode(&value)),
			key,
			value,
		}
	}
}

impl QueryString {
	/// Parses query-string text, with or without the leading `?`.
	///
	/// Empty segments (`a=1&&b=2`) are dropped.
	pub fn parse(search: &str) -> Self {
		let search = search.strip_prefix('?').unwrap_or(search);
		let segments = search.split('&').filter(|raw| !raw.is_empty()).map(Segment::from_raw).collect();
		Self { segments }
	}

	/// Returns true if the query has no segments.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns the distinct root parameters in order of first appearance.
	pub fn roots(&self, codec: &dyn QueryCodec) -> Vec<String> {
		let mut roots: Vec<String> = Vec::new();
		for segment in &self.segments {
			let root = codec.root_of(&segment.key);
			if !roots.iter().any(|r| r == root) {
				roots.push(root.to_string());
			}
		}
		roots
	}

	/// Returns true if any segment belongs to `root`.
	pub fn contains(&self, codec: &dyn QueryCodec, root: &str) -> bool {
		self.segments.iter().any(|s| codec.root_of(&s.key) == root)
	}

	/// Returns the decoded pairs belonging to `root`, in query order.
	pub fn pairs(&self, codec: &dyn QueryCodec, root: &str) -> Vec<(String, String)> {
		self.segments
			.iter()
			.filter(|s| codec.root_of(&s.key) == root)
			.map(|s| (s.key.clone(), s.value.clone()))
			.collect()
	}

	/// Decodes the value under `root`, or `None` if the root is absent.
	pub fn decode(&self, codec: &dyn QueryCodec, root: &str) -> Result<Option<Value>> {
		codec.decode(root, &self.pairs(codec, root))
	}

	/// Writes `value` under `root`.
	///
	/// The new segments take the position of the first old segment of `root`,
	/// or are appended when the root was absent. A value with no encoded form
	/// removes the root entirely.
	pub fn set(&mut self, codec: &dyn QueryCodec, root: &str, value: &Value) {
		let pairs = codec.encode(root, value);
		if pairs.is_empty() {
			self.remove(codec, root);
			return;
		}

		let at = self.segments.iter().position(|s| codec.root_of(&s.key) == root).unwrap_or(self.segments.len());
		self.remove(codec, root);
		let at = at.min(self.segments.len());
		self.segments.splice(at..at, pairs.into_iter().map(|(k, v)| Segment::from_pair(k, v)));
	}

	/// Removes every segment of `root`. Returns true if anything was removed.
	pub fn remove(&mut self, codec: &dyn QueryCodec, root: &str) -> bool {
		let before = self.segments.len();
		self.segments.retain(|s| codec.root_of(&s.key) != root);
		self.segments.len() != before
	}
}

impl fmt::Display for QueryString {
	/// Formats the query without the leading `?`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, segment) in self.segments.iter().enumerate() {
			if i > 0 {
				f.write_str("&")?;
			}
			f.write_str(&segment.raw)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
