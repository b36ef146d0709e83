//! Whole-chain evaluation of dependent fetches.
//!
//! Each level's gate is the AND of the negated upstream loading states and its
//! own readiness; each level's exposed loading state is the OR of its own
//! fetch and everything above it. A level therefore never starts while any
//! level above it is loading.

use crate::permission::{BlockReason, Readiness, composite_loading};

/// Readiness reported by one level, topmost first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stage {
	/// This level's own fetch is in flight.
	pub fetch_loading: bool,
	pub identity_loading: bool,
	/// The key this level needs (usually produced by the level above) is present.
	pub key_present: bool,
	pub removed: bool,
}

/// Gate and loading state computed for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
	/// Value for this level's `enabled` flag.
	pub enabled: bool,
	pub blocked_by: Option<BlockReason>,
	/// Loading state received from the level above.
	pub serial_loading: bool,
	/// Composite loading exposed by this level.
	pub is_loading: bool,
}

/// Outcomes for every level of a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainEvaluation {
	pub stages: Vec<StageOutcome>,
}

impl ChainEvaluation {
	/// Aggregate loading indicator for the whole chain.
	pub fn is_loading(&self) -> bool {
		self.stages.last().is_some_and(|s| s.is_loading)
	}

	pub fn enabled(&self, level: usize) -> bool {
		self.stages.get(level).is_some_and(|s| s.enabled)
	}

	/// Levels currently permitted to run.
	pub fn enabled_levels(&self) -> impl Iterator<Item = usize> + '_ {
		self.stages.iter().enumerate().filter(|(_, s)| s.enabled).map(|(i, _)| i)
	}
}

/// Folds the stages top-down into per-level gates and composite loading.
pub fn evaluate(stages: &[Stage]) -> ChainEvaluation {
	let mut serial_loading = false;
	let stages = stages
		.iter()
		.map(|stage| {
			let decision = Readiness {
				serial_loading,
				identity_loading: stage.identity_loading,
				key_present: stage.key_present,
				is_removed: stage.removed,
			}
			.decide();
			let is_loading = composite_loading(stage.fetch_loading, [serial_loading]);
			let outcome = StageOutcome {
				enabled: decision.enabled,
				blocked_by: decision.blocked_by,
				serial_loading,
				is_loading,
			};
			serial_loading = is_loading;
			outcome
		})
		.collect();
	ChainEvaluation { stages }
}
