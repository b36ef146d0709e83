//! Stateful gate owned by one dependent fetch.

use tracing::trace;

use crate::permission::{GateDecision, RequiredKey, RunInputs, composite_loading, compute_run_permission};
use crate::removal::RemovalLatch;

/// Evaluates the run permission of one fetch on every render.
///
/// Owns the [`RemovalLatch`] for the fetch's key; the loading flags are
/// supplied fresh on each evaluation since they belong to other levels.
#[derive(Debug, Clone)]
pub struct FetchGate<K> {
	name: &'static str,
	latch: RemovalLatch<K>,
}

impl<K: RequiredKey + PartialEq + Clone> FetchGate<K> {
	/// Creates a gate; `name` only labels trace output.
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			latch: RemovalLatch::new(),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Computes the `enabled` flag for this render.
	pub fn evaluate(&mut self, serial_loading: bool, identity_loading: bool, key: Option<&K>) -> GateDecision {
		let is_removed = self.latch.observe(key);
		let inputs = RunInputs {
			serial_loading,
			identity_loading,
			required_key: key,
			is_removed,
		};
		let decision = inputs.readiness().decide();
		debug_assert_eq!(decision.enabled, compute_run_permission(&inputs));
		if let Some(reason) = decision.blocked_by {
			trace!(gate = self.name, %reason, "gate.withheld");
		}
		decision
	}

	/// Records a successful delete of `key`; later evaluations with the same
	/// key stay disabled.
	pub fn mark_removed(&mut self, key: &K) {
		trace!(gate = self.name, "gate.removal.latched");
		self.latch.mark_removed(key);
	}

	pub fn is_removed(&self) -> bool {
		self.latch.is_removed()
	}

	/// Loading state to expose to consumers and pass down as the next
	/// level's `serial_loading`.
	pub fn is_loading(&self, fetch_loading: bool, serial_loading: bool) -> bool {
		composite_loading(fetch_loading, [serial_loading])
	}
}
