//! Simulated render loop over a three-level dependent fetch chain
//! (order → line item → product).

use pretty_assertions::assert_eq;
use tether_gate::{BlockReason, FetchGate};

/// Stand-in for an async query: a started fetch resolves on the next tick.
#[derive(Debug, Default)]
struct FakeQuery {
	key: Option<String>,
	loading: bool,
	data: Option<String>,
}

impl FakeQuery {
	fn settle(&mut self) {
		if self.loading {
			self.loading = false;
			self.data = self.key.as_ref().map(|k| format!("{k}/child"));
		}
	}

	/// Starts a fetch when enabled and the key has not been fetched yet.
	fn drive(&mut self, enabled: bool, key: Option<&String>) -> bool {
		if !enabled || (self.key.as_ref() == key && (self.loading || self.data.is_some())) {
			return false;
		}
		self.key = key.cloned();
		self.loading = true;
		self.data = None;
		true
	}
}

#[derive(Debug, PartialEq, Eq)]
struct Start {
	tick: usize,
	level: usize,
	key: String,
}

struct Chain {
	root: String,
	identity_loading: bool,
	gates: Vec<FetchGate<String>>,
	queries: Vec<FakeQuery>,
	starts: Vec<Start>,
	last_blocked: Vec<Option<BlockReason>>,
	tick: usize,
}

impl Chain {
	fn new(root: &str) -> Self {
		Self {
			root: root.to_string(),
			identity_loading: true,
			gates: vec![FetchGate::new("order"), FetchGate::new("line_item"), FetchGate::new("product")],
			queries: (0..3).map(|_| FakeQuery::default()).collect(),
			starts: Vec::new(),
			last_blocked: vec![None; 3],
			tick: 0,
		}
	}

	/// One render pass; returns the aggregate loading indicator.
	fn render(&mut self) -> bool {
		for query in &mut self.queries {
			query.settle();
		}

		let mut serial_loading = false;
		for level in 0..self.gates.len() {
			let key = if level == 0 {
				Some(self.root.clone())
			} else {
				self.queries[level - 1].data.clone()
			};
			let decision = self.gates[level].evaluate(serial_loading, self.identity_loading, key.as_ref());
			self.last_blocked[level] = decision.blocked_by;
			if self.queries[level].drive(decision.enabled, key.as_ref()) {
				assert!(!serial_loading, "level {level} started under a loading upstream");
				self.starts.push(Start {
					tick: self.tick,
					level,
					key: key.clone().expect("started without a key"),
				});
			}
			serial_loading = self.gates[level].is_loading(self.queries[level].loading, serial_loading);
		}

		self.tick += 1;
		serial_loading
	}

	fn run_until_idle(&mut self) {
		for _ in 0..16 {
			if !self.render() {
				return;
			}
		}
		panic!("chain did not settle");
	}
}

#[test]
fn levels_start_strictly_in_order() {
	let mut chain = Chain::new("order-1");

	assert!(!chain.render());
	assert_eq!(chain.last_blocked, vec![Some(BlockReason::IdentityLoading); 3]);
	assert!(chain.starts.is_empty());

	chain.identity_loading = false;
	chain.run_until_idle();

	assert_eq!(
		chain.starts,
		vec![
			Start {
				tick: 1,
				level: 0,
				key: "order-1".into(),
			},
			Start {
				tick: 2,
				level: 1,
				key: "order-1/child".into(),
			},
			Start {
				tick: 3,
				level: 2,
				key: "order-1/child/child".into(),
			},
		]
	);
	assert_eq!(chain.queries[2].data.as_deref(), Some("order-1/child/child/child"));
}

#[test]
fn deleted_product_is_not_refetched_until_its_key_changes() {
	let mut chain = Chain::new("order-1");
	chain.identity_loading = false;
	chain.run_until_idle();
	let settled_starts = chain.starts.len();

	let deleted = chain.queries[2].key.clone().unwrap();
	chain.gates[2].mark_removed(&deleted);
	chain.queries[2].data = None;

	assert!(!chain.render());
	assert_eq!(chain.last_blocked[2], Some(BlockReason::Removed));
	assert_eq!(chain.starts.len(), settled_starts);

	chain.root = "order-2".to_string();
	chain.run_until_idle();

	let refetched: Vec<_> = chain.starts[settled_starts..].iter().map(|s| (s.level, s.key.as_str())).collect();
	assert_eq!(refetched, vec![(0, "order-2"), (1, "order-2/child"), (2, "order-2/child/child")]);
	assert!(!chain.gates[2].is_removed());
}
