use std::sync::Arc;

use tether_config::{CodecKind, HistoryMode, KeyTable, OverlayConfig};
use tether_query::{Brackets, Json, QueryCodec, QueryString};
use tracing::{debug, trace, warn};

use crate::entry::{OverlayData, OverlayEntry, OverlayStack, OverlayTarget};
use crate::location::Location;
use crate::wire::{self, WireError};

/// Keeps a named overlay stack consistent with one query parameter of a [`Location`].
///
/// Holds no stack of its own: reads decode the URL on every call and writes
/// re-derive the stack from the current URL before changing it. Other query
/// parameters and the fragment are passed through byte-for-byte.
///
/// Redundant operations (opening an open overlay, closing a closed one) are
/// no-ops and do not navigate. A write whose URL would not read back as the
/// intended stack is refused, so the overlays already open stay open.
#[derive(Debug, Clone)]
pub struct OverlaySync<L> {
	location: L,
	codec: Arc<dyn QueryCodec>,
	param: String,
	keys: KeyTable,
	history: HistoryMode,
	max_depth: Option<usize>,
}

impl<L: Location> OverlaySync<L> {
	/// Creates a synchronizer with the default configuration (`d`, brackets, push).
	pub fn new(location: L) -> Self {
		Self::from_config(location, &OverlayConfig::default())
	}

	pub fn from_config(location: L, config: &OverlayConfig) -> Self {
		let codec: Arc<dyn QueryCodec> = match config.codec {
			CodecKind::Brackets => Arc::new(Brackets),
			CodecKind::Json => Arc::new(Json),
		};
		Self {
			location,
			codec,
			param: config.param.clone(),
			keys: config.keys.clone(),
			history: config.history,
			max_depth: config.max_depth,
		}
	}

	/// Replaces the codec chosen by the configuration.
	pub fn with_codec(mut self, codec: Arc<dyn QueryCodec>) -> Self {
		self.codec = codec;
		self
	}

	pub fn location(&self) -> &L {
		&self.location
	}

	pub fn param(&self) -> &str {
		&self.param
	}

	/// Stack decoded from the current URL. Undecodable state reads as empty.
	pub fn stack(&self) -> OverlayStack {
		let query = QueryString::parse(&self.location.search());
		self.read(&query)
	}

	/// Opens an overlay on top of the stack.
	///
	/// No-op if an overlay with the same name is open, whatever its data.
	pub fn open(&self, target: impl Into<OverlayTarget>) {
		let entry = target.into().into_entry();
		let max_depth = self.max_depth;
		self.modify("open", |stack| {
			if stack.contains(&entry.name) {
				return false;
			}
			if max_depth.is_some_and(|max| stack.len() >= max) {
				warn!(name = %entry.name, depth = stack.len(), "overlay.open.depth_limit");
				return false;
			}
			stack.push(entry)
		});
	}

	/// Closes the named overlay; no-op if it is not open.
	///
	/// Closing the last overlay removes the parameter from the URL.
	pub fn close(&self, target: impl Into<OverlayTarget>) {
		let target = target.into();
		self.modify("close", |stack| stack.remove(target.name()).is_some());
	}

	pub fn is_open(&self, target: impl Into<OverlayTarget>) -> bool {
		self.stack().contains(target.into().name())
	}

	pub fn are_any_open(&self) -> bool {
		!self.stack().is_empty()
	}

	/// Data of the named overlay, empty if it is not open.
	pub fn data(&self, target: impl Into<OverlayTarget>) -> OverlayData {
		let target = target.into();
		self.stack().get(target.name()).map(|e| e.data.clone()).unwrap_or_default()
	}

	/// The most recently opened overlay.
	pub fn top(&self) -> Option<OverlayEntry> {
		self.stack().pop()
	}

	/// Closes the most recently opened overlay, returning it.
	pub fn close_top(&self) -> Option<OverlayEntry> {
		let mut closed = None;
		self.modify("close_top", |stack| {
			closed = stack.pop();
			closed.is_some()
		});
		closed
	}

	/// Removes the stack parameter, including state that failed to decode.
	pub fn close_all(&self) {
		let mut query = QueryString::parse(&self.location.search());
		if query.remove(&*self.codec, &self.param) {
			self.commit("close_all", 0, &query);
		}
	}

	/// Replaces the data of an open overlay in place (last write wins).
	///
	/// No-op if the overlay is not open; use [`OverlaySync::open`] to add it.
	pub fn update(&self, entry: impl Into<OverlayTarget>) {
		let entry = entry.into().into_entry();
		self.modify("update", |stack| stack.replace_data(&entry.name, entry.data));
	}

	/// Binds the operations to a fixed overlay name.
	pub fn bind(&self, name: impl Into<String>) -> BoundOverlay<'_, L> {
		BoundOverlay { sync: self, name: name.into() }
	}

	fn read(&self, query: &QueryString) -> OverlayStack {
		self.try_read(query).unwrap_or_else(|error| {
			debug!(param = %self.param, codec = self.codec.name(), %error, "overlay.stack.decode_failed");
			OverlayStack::new()
		})
	}

	fn try_read(&self, query: &QueryString) -> Result<OverlayStack, WireError> {
		match query.decode(&*self.codec, &self.param)? {
			Some(value) => wire::decode_stack(&value, &self.keys),
			None => Ok(OverlayStack::new()),
		}
	}

	/// Read-modify-write of the stack parameter. `f` returns whether it changed the stack.
	fn modify(&self, op: &'static str, f: impl FnOnce(&mut OverlayStack) -> bool) {
		let mut query = QueryString::parse(&self.location.search());
		let mut stack = self.read(&query);
		if !f(&mut stack) {
			trace!(op, depth = stack.len(), "overlay.write.noop");
			return;
		}

		match wire::encode_stack(&stack, &self.keys) {
			Some(value) => {
				query.set(&*self.codec, &self.param, &value);
				let written = QueryString::parse(&query.to_string());
				match self.try_read(&written) {
					Ok(read_back) if read_back == stack => {}
					Ok(_) => {
						warn!(op, codec = self.codec.name(), "overlay.write.lossy");
						return;
					}
					Err(error) => {
						warn!(op, codec = self.codec.name(), %error, "overlay.write.undecodable");
						return;
					}
				}
			}
			None => {
				query.remove(&*self.codec, &self.param);
			}
		}
		self.commit(op, stack.len(), &query);
	}

	fn commit(&self, op: &'static str, depth: usize, query: &QueryString) {
		let path = self.location.pathname();
		let hash = self.location.hash();
		let target = if query.is_empty() {
			format!("{path}{hash}")
		} else {
			format!("{path}?{query}{hash}")
		};
		trace!(op, depth, target = %target, history = ?self.history, "overlay.write");
		self.location.navigate(&target, self.history);
	}
}

/// Synchronizer operations with the overlay name fixed at construction.
#[derive(Debug, Clone)]
pub struct BoundOverlay<'a, L> {
	sync: &'a OverlaySync<L>,
	name: String,
}

impl<L: Location> BoundOverlay<'_, L> {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn open(&self) {
		self.sync.open(self.name.as_str());
	}

	pub fn open_with(&self, data: OverlayData) {
		self.sync.open(OverlayEntry::with_data(self.name.clone(), data));
	}

	pub fn close(&self) {
		self.sync.close(self.name.as_str());
	}

	pub fn is_open(&self) -> bool {
		self.sync.is_open(self.name.as_str())
	}

	pub fn are_any_open(&self) -> bool {
		self.sync.are_any_open()
	}

	pub fn data(&self) -> OverlayData {
		self.sync.data(self.name.as_str())
	}

	pub fn update(&self, data: OverlayData) {
		self.sync.update(OverlayEntry::with_data(self.name.clone(), data));
	}
}
