//! On-the-wire form of the overlay stack.
//!
//! Internal types always use full field names; the [`KeyTable`] compression
//! (`name` → `n`, `data` → `d` by default) is applied only here. A single
//! entry is written as a bare object and two or more as a list. Both shapes
//! are accepted when reading.

use serde_json::{Map, Value};
use tether_config::KeyTable;
use tether_query::QueryError;
use thiserror::Error;

use crate::entry::{OverlayData, OverlayEntry, OverlayStack};

/// Reasons a stored stack could not be decoded.
///
/// Never surfaced to callers of [`crate::OverlaySync`]; a stack that fails to
/// decode is read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
	#[error("query decode failed: {0}")]
	Query(#[from] QueryError),
	#[error("stack is neither an entry nor a list of entries")]
	NotAStack,
	#[error("entry {index} is not an object")]
	NotAnEntry { index: usize },
	#[error("entry {index} has no name")]
	MissingName { index: usize },
	#[error("entry {index} has a non-string name")]
	InvalidName { index: usize },
	#[error("entry {index} has data that is not a mapping")]
	InvalidData { index: usize },
	#[error("entry {index} has unexpected key {key:?}")]
	UnknownKey { index: usize, key: String },
}

/// Encodes a stack; `None` for an empty stack, which has no wire form.
pub fn encode_stack(stack: &OverlayStack, keys: &KeyTable) -> Option<Value> {
	match stack.entries() {
		[] => None,
		[single] => Some(encode_entry(single, keys)),
		entries => Some(Value::Array(entries.iter().map(|e| encode_entry(e, keys)).collect())),
	}
}

pub fn encode_entry(entry: &OverlayEntry, keys: &KeyTable) -> Value {
	let mut obj = Map::with_capacity(2);
	obj.insert(keys.name.clone(), Value::String(entry.name.clone()));
	obj.insert(keys.data.clone(), Value::Object(entry.data.clone()));
	Value::Object(obj)
}

/// Decodes a bare entry or a list of entries.
///
/// A repeated name keeps its first occurrence.
pub fn decode_stack(value: &Value, keys: &KeyTable) -> Result<OverlayStack, WireError> {
	let items = match value {
		Value::Array(items) => items.as_slice(),
		Value::Object(_) => std::slice::from_ref(value),
		_ => return Err(WireError::NotAStack),
	};

	let mut stack = OverlayStack::new();
	for (index, item) in items.iter().enumerate() {
		let entry = decode_entry(index, item, keys)?;
		let name = entry.name.clone();
		if !stack.push(entry) {
			tracing::debug!(index, name = %name, "overlay.wire.duplicate_dropped");
		}
	}
	Ok(stack)
}

fn decode_entry(index: usize, item: &Value, keys: &KeyTable) -> Result<OverlayEntry, WireError> {
	let Value::Object(obj) = item else {
		return Err(WireError::NotAnEntry { index });
	};
	if let Some(key) = obj.keys().find(|k| **k != keys.name && **k != keys.data) {
		return Err(WireError::UnknownKey { index, key: key.clone() });
	}

	let name = match obj.get(&keys.name) {
		Some(Value::String(name)) => name.clone(),
		Some(_) => return Err(WireError::InvalidName { index }),
		None => return Err(WireError::MissingName { index }),
	};
	let data = match obj.get(&keys.data) {
		None | Some(Value::Null) => OverlayData::new(),
		Some(Value::Object(data)) => data.clone(),
		// Plain `qs` links carry a mapping keyed `0..n` as a list.
		Some(Value::Array(items)) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v.clone())).collect(),
		Some(_) => return Err(WireError::InvalidData { index }),
	};
	Ok(OverlayEntry { name, data })
}
