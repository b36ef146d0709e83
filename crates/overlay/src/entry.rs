use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Small reference data attached to an overlay (ids, not payloads).
pub type OverlayData = Map<String, Value>;

/// A named overlay and its data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
	pub name: String,
	#[serde(default)]
	pub data: OverlayData,
}

impl OverlayEntry {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			data: OverlayData::new(),
		}
	}

	pub fn with_data(name: impl Into<String>, data: OverlayData) -> Self {
		Self { name: name.into(), data }
	}

	/// Adds one data field, builder style.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}
}

/// Argument accepted by every synchronizer operation: a bare name or a full entry.
///
/// Operations that only need the name ignore the data of an `Entry`.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayTarget {
	Name(String),
	Entry(OverlayEntry),
}

impl OverlayTarget {
	pub fn name(&self) -> &str {
		match self {
			Self::Name(name) => name,
			Self::Entry(entry) => &entry.name,
		}
	}

	/// Resolves to the canonical entry shape; a bare name carries empty data.
	pub fn into_entry(self) -> OverlayEntry {
		match self {
			Self::Name(name) => OverlayEntry::new(name),
			Self::Entry(entry) => entry,
		}
	}
}

impl From<&str> for OverlayTarget {
	fn from(name: &str) -> Self {
		Self::Name(name.to_string())
	}
}

impl From<String> for OverlayTarget {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl From<&String> for OverlayTarget {
	fn from(name: &String) -> Self {
		Self::Name(name.clone())
	}
}

impl From<OverlayEntry> for OverlayTarget {
	fn from(entry: OverlayEntry) -> Self {
		Self::Entry(entry)
	}
}

impl From<&OverlayEntry> for OverlayTarget {
	fn from(entry: &OverlayEntry) -> Self {
		Self::Entry(entry.clone())
	}
}

/// Ordered overlay entries, topmost last, at most one per name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OverlayStack {
	entries: Vec<OverlayEntry>,
}

impl OverlayStack {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[OverlayEntry] {
		&self.entries
	}

	pub fn iter(&self) -> std::slice::Iter<'_, OverlayEntry> {
		self.entries.iter()
	}

	/// The most recently opened entry.
	pub fn top(&self) -> Option<&OverlayEntry> {
		self.entries.last()
	}

	pub fn get(&self, name: &str) -> Option<&OverlayEntry> {
		self.entries.iter().find(|e| e.name == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Appends `entry` unless its name is already present. Returns true if appended.
	pub fn push(&mut self, entry: OverlayEntry) -> bool {
		if self.contains(&entry.name) {
			return false;
		}
		self.entries.push(entry);
		true
	}

	/// Removes the entry named `name`, keeping the relative order of the rest.
	pub fn remove(&mut self, name: &str) -> Option<OverlayEntry> {
		let idx = self.entries.iter().position(|e| e.name == name)?;
		Some(self.entries.remove(idx))
	}

	pub fn pop(&mut self) -> Option<OverlayEntry> {
		self.entries.pop()
	}

	/// Replaces the data of an open entry in place. Returns true if it changed.
	pub fn replace_data(&mut self, name: &str, data: OverlayData) -> bool {
		match self.entries.iter_mut().find(|e| e.name == name) {
			Some(entry) if entry.data != data => {
				entry.data = data;
				true
			}
			_ => false,
		}
	}
}

impl FromIterator<OverlayEntry> for OverlayStack {
	/// Later entries with an already-seen name are dropped.
	fn from_iter<I: IntoIterator<Item = OverlayEntry>>(iter: I) -> Self {
		let mut stack = Self::new();
		for entry in iter {
			stack.push(entry);
		}
		stack
	}
}

impl IntoIterator for OverlayStack {
	type Item = OverlayEntry;
	type IntoIter = std::vec::IntoIter<OverlayEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<'a> IntoIterator for &'a OverlayStack {
	type Item = &'a OverlayEntry;
	type IntoIter = std::slice::Iter<'a, OverlayEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}
