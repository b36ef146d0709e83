use std::sync::Arc;

use parking_lot::Mutex;
use tether_config::HistoryMode;

/// The navigable address the overlay stack is stored in.
///
/// Implementations wrap the host router. `navigate` performs a client-side
/// route change to `target` (a path with an optional `?query` and `#fragment`)
/// without a full reload.
pub trait Location {
	/// Current path, without query.
	fn pathname(&self) -> String;

	/// Current query string, without the leading `?`.
	fn search(&self) -> String;

	/// Current fragment including the leading `#`, or empty.
	fn hash(&self) -> String {
		String::new()
	}

	fn navigate(&self, target: &str, mode: HistoryMode);
}

impl<L: Location + ?Sized> Location for &L {
	fn pathname(&self) -> String {
		(**self).pathname()
	}

	fn search(&self) -> String {
		(**self).search()
	}

	fn hash(&self) -> String {
		(**self).hash()
	}

	fn navigate(&self, target: &str, mode: HistoryMode) {
		(**self).navigate(target, mode)
	}
}

impl<L: Location + ?Sized> Location for Arc<L> {
	fn pathname(&self) -> String {
		(**self).pathname()
	}

	fn search(&self) -> String {
		(**self).search()
	}

	fn hash(&self) -> String {
		(**self).hash()
	}

	fn navigate(&self, target: &str, mode: HistoryMode) {
		(**self).navigate(target, mode)
	}
}

/// In-process session history.
///
/// Clones share the same history, mirroring a browser tab observed from
/// several components. `back`, `forward` and `set_href` model navigation that
/// happens outside the synchronizer.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
	inner: Arc<Mutex<History>>,
}

#[derive(Debug)]
struct History {
	entries: Vec<String>,
	index: usize,
}

impl History {
	fn current(&self) -> &str {
		&self.entries[self.index]
	}

	fn push(&mut self, href: String) {
		self.entries.truncate(self.index + 1);
		self.entries.push(href);
		self.index = self.entries.len() - 1;
	}
}

impl Default for MemoryLocation {
	fn default() -> Self {
		Self::new("/")
	}
}

impl MemoryLocation {
	/// Starts a history whose only entry is `href` (`/path?query`).
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(Mutex::new(History {
				entries: vec![href.into()],
				index: 0,
			})),
		}
	}

	/// Current path and query.
	pub fn href(&self) -> String {
		self.inner.lock().current().to_string()
	}

	/// Pushes `href` as if the user followed a link.
	pub fn set_href(&self, href: impl Into<String>) {
		self.inner.lock().push(href.into());
	}

	/// Steps back one entry. Returns false at the start of history.
	pub fn back(&self) -> bool {
		let mut history = self.inner.lock();
		if history.index == 0 {
			return false;
		}
		history.index -= 1;
		true
	}

	/// Steps forward one entry. Returns false at the end of history.
	pub fn forward(&self) -> bool {
		let mut history = self.inner.lock();
		if history.index + 1 >= history.entries.len() {
			return false;
		}
		history.index += 1;
		true
	}

	/// Number of entries in the session history.
	pub fn history_len(&self) -> usize {
		self.inner.lock().entries.len()
	}
}

/// Splits `href` into path, query (without `?`) and fragment (with `#`).
fn split_href(href: &str) -> (&str, &str, &str) {
	let (rest, hash) = href.find('#').map_or((href, ""), |i| href.split_at(i));
	let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
	(path, query, hash)
}

impl Location for MemoryLocation {
	fn pathname(&self) -> String {
		split_href(self.inner.lock().current()).0.to_string()
	}

	fn search(&self) -> String {
		split_href(self.inner.lock().current()).1.to_string()
	}

	fn hash(&self) -> String {
		split_href(self.inner.lock().current()).2.to_string()
	}

	fn navigate(&self, target: &str, mode: HistoryMode) {
		let mut history = self.inner.lock();
		match mode {
			HistoryMode::Push => history.push(target.to_string()),
			HistoryMode::Replace => {
				let index = history.index;
				history.entries[index] = target.to_string();
			}
		}
	}
}
