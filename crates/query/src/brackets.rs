//! `qs`-compatible bracket notation.
//!
//! `{"n": "edit", "d": {"id": "42"}}` under root `d` becomes
//! `d[n]=edit&d[d][id]=42`, and a list becomes `d[0][n]=a&d[1][n]=b`.
//!
//! Strings travel as plain text. Anything the bracket form cannot carry
//! faithfully is written as a typed literal: `~` followed by compact JSON.
//! That covers numbers, booleans and `null`, empty containers, objects whose
//! keys are empty, contain brackets or read as list indices, and containers
//! at [`MAX_DEPTH`]. A string that itself starts with `~` gets a second `~`.
//! Plain `qs` input without literals decodes as before.

use serde_json::{Map, Value};

use crate::{QueryCodec, QueryError, Result};

/// Maximum number of bracketed segments after the root.
pub const MAX_DEPTH: usize = 8;

/// Prefix of a typed literal value.
pub const LITERAL: char = '~';

/// Bracket-notation codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Brackets;

impl QueryCodec for Brackets {
	fn name(&self) -> &'static str {
		"brackets"
	}

	fn root_of<'a>(&self, key: &'a str) -> &'a str {
		match key.find('[') {
			Some(i) if i > 0 => &key[..i],
			_ => key,
		}
	}

	fn encode(&self, root: &str, value: &Value) -> Vec<(String, String)> {
		let mut out = Vec::new();
		flatten(root.to_string(), 0, value, &mut out);
		out
	}

	fn decode(&self, root: &str, pairs: &[(String, String)]) -> Result<Option<Value>> {
		if pairs.is_empty() {
			return Ok(None);
		}

		let mut tree = Node::empty();
		for (key, value) in pairs {
			let path = split_key(key, root)?;
			tree.insert(&path, value.clone()).map_err(|()| QueryError::Conflict { key: key.clone() })?;
		}
		Ok(Some(tree.finish()))
	}
}

fn flatten(prefix: String, depth: usize, value: &Value, out: &mut Vec<(String, String)>) {
	match value {
		Value::Object(map) if depth < MAX_DEPTH && expandable(map) => {
			for (key, child) in map {
				flatten(format!("{prefix}[{key}]"), depth + 1, child, out);
			}
		}
		Value::Array(items) if depth < MAX_DEPTH && !items.is_empty() => {
			for (i, child) in items.iter().enumerate() {
				flatten(format!("{prefix}[{i}]"), depth + 1, child, out);
			}
		}
		Value::String(s) if s.starts_with(LITERAL) => out.push((prefix, format!("{LITERAL}{s}"))),
		Value::String(s) => out.push((prefix, s.clone())),
		other => out.push((prefix, format!("{LITERAL}{other}"))),
	}
}

/// Whether `map` survives as `[key]` segments: non-empty, every key usable
/// as a segment, and not mistaken for a list on the way back.
fn expandable(map: &Map<String, Value>) -> bool {
	!map.is_empty()
		&& map.keys().all(|k| !k.is_empty() && !k.contains(['[', ']']))
		&& dense_indices(map.keys().map(String::as_str)).is_none()
}

/// Reads one scalar, undoing the literal escapes of [`flatten`].
///
/// A `~` prefix that is not followed by valid JSON is kept as text.
fn unescape(raw: String) -> Value {
	let Some(rest) = raw.strip_prefix(LITERAL) else {
		return Value::String(raw);
	};
	if rest.starts_with(LITERAL) {
		return Value::String(rest.to_string());
	}
	serde_json::from_str(rest).unwrap_or(Value::String(raw))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
	Key(String),
	/// `[]`: append at the next free index.
	Push,
}

fn split_key(key: &str, root: &str) -> Result<Vec<PathSegment>> {
	let malformed = || QueryError::MalformedKey { key: key.to_string() };
	let mut rest = key.strip_prefix(root).ok_or_else(malformed)?;
	let mut path = Vec::new();

	while !rest.is_empty() {
		let inner = rest.strip_prefix('[').ok_or_else(malformed)?;
		let end = inner.find(']').ok_or_else(malformed)?;
		let segment = &inner[..end];
		path.push(if segment.is_empty() {
			PathSegment::Push
		} else {
			PathSegment::Key(segment.to_string())
		});
		rest = &inner[end + 1..];
	}

	if path.len() > MAX_DEPTH {
		return Err(QueryError::TooDeep {
			key: key.to_string(),
			max: MAX_DEPTH,
		});
	}
	Ok(path)
}

/// Intermediate decode tree; children keep query order.
#[derive(Debug)]
enum Node {
	Scalar(Vec<String>),
	Branch(Vec<(String, Node)>),
}

impl Node {
	fn empty() -> Self {
		Node::Branch(Vec::new())
	}

	fn insert(&mut self, path: &[PathSegment], value: String) -> std::result::Result<(), ()> {
		let Some((head, rest)) = path.split_first() else {
			return match self {
				Node::Branch(children) if children.is_empty() => {
					*self = Node::Scalar(vec![value]);
					Ok(())
				}
				Node::Scalar(values) => {
					values.push(value);
					Ok(())
				}
				Node::Branch(_) => Err(()),
			};
		};

		let Node::Branch(children) = self else {
			return Err(());
		};
		let key = match head {
			PathSegment::Key(key) => key.clone(),
			PathSegment::Push => children.len().to_string(),
		};
		let idx = match children.iter().position(|(k, _)| *k == key) {
			Some(idx) => idx,
			None => {
				children.push((key, Node::empty()));
				children.len() - 1
			}
		};
		children[idx].1.insert(rest, value)
	}

	fn finish(self) -> Value {
		match self {
			Node::Scalar(mut values) => {
				if values.len() == 1 {
					unescape(values.remove(0))
				} else {
					Value::Array(values.into_iter().map(unescape).collect())
				}
			}
			Node::Branch(children) => match dense_indices(children.iter().map(|(k, _)| k.as_str())) {
				Some(order) => {
					let mut slots: Vec<Option<Node>> = children.into_iter().map(|(_, node)| Some(node)).collect();
					Value::Array(order.into_iter().filter_map(|i| slots[i].take()).map(Node::finish).collect())
				}
				None => Value::Object(children.into_iter().map(|(k, node)| (k, node.finish())).collect::<Map<_, _>>()),
			},
		}
	}
}

/// If the keys are exactly the canonical indices `0..len`, returns the key
/// positions sorted by index.
fn dense_indices<'a>(keys: impl ExactSizeIterator<Item = &'a str>) -> Option<Vec<usize>> {
	let len = keys.len();
	if len == 0 {
		return None;
	}
	let mut order = vec![usize::MAX; len];
	for (pos, key) in keys.enumerate() {
		if !key.bytes().all(|b| b.is_ascii_digit()) || (key.len() > 1 && key.starts_with('0')) {
			return None;
		}
		let index: usize = key.parse().ok()?;
		if index >= len || order[index] != usize::MAX {
			return None;
		}
		order[index] = pos;
	}
	Some(order)
}
