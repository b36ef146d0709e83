//! Per-key removal latch.

/// Remembers that the entity behind the current key was deleted.
///
/// Latches on [`RemovalLatch::mark_removed`] and stays set for as long as the
/// observed key stays the same. Any change of key, including to and from
/// `None`, clears it, so a component reused for a different entity is not
/// blocked by a stale flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalLatch<K> {
	key: Option<K>,
	removed: bool,
}

impl<K> Default for RemovalLatch<K> {
	fn default() -> Self {
		Self { key: None, removed: false }
	}
}

impl<K: PartialEq + Clone> RemovalLatch<K> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the key of this evaluation and returns the removal flag for it.
	pub fn observe(&mut self, key: Option<&K>) -> bool {
		if self.key.as_ref() != key {
			if self.removed {
				tracing::debug!("gate.removal.reset_on_key_change");
			}
			self.key = key.cloned();
			self.removed = false;
		}
		self.removed
	}

	/// Latches after a successful delete of `key`.
	pub fn mark_removed(&mut self, key: &K) {
		self.key = Some(key.clone());
		self.removed = true;
	}

	pub fn is_removed(&self) -> bool {
		self.removed
	}

	/// Key seen by the last evaluation.
	pub fn key(&self) -> Option<&K> {
		self.key.as_ref()
	}
}
