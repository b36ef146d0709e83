//! Invariant catalog for the overlay stack, each with an executable proof.

use proptest::prelude::*;
use serde_json::Value;
use tether_config::KeyTable;
use tether_query::{Brackets, Json, QueryCodec, QueryString};

use crate::entry::{OverlayEntry, OverlayStack};
use crate::location::{Location, MemoryLocation};
use crate::sync::OverlaySync;
use crate::wire;

fn fresh() -> OverlaySync<MemoryLocation> {
	OverlaySync::new(MemoryLocation::new("/app?tab=1"))
}

/// Must report an overlay open right after `open` and closed right after `close`,
/// whatever else is on the stack.
///
/// - Enforced in: `OverlaySync::open`, `OverlaySync::close`
/// - Failure symptom: A drawer stays visible after its close button is pressed.
#[test]
fn test_open_close_visibility() {
	let sync = fresh();
	sync.open("a");
	sync.open("b");
	assert!(sync.is_open("a") && sync.is_open("b"));
	sync.close("a");
	assert!(!sync.is_open("a"));
	assert!(sync.is_open("b"));
	sync.open("a");
	assert!(sync.is_open("a"));
}

/// Must treat opening an already-open name as a no-op.
///
/// - Enforced in: `OverlaySync::open`
/// - Failure symptom: A double-click stacks the same drawer twice and it needs two closes.
#[test]
fn test_open_is_idempotent() {
	let sync = fresh();
	sync.open("a");
	let href = sync.location().href();
	let stack = sync.stack();
	sync.open("a");
	assert_eq!(sync.location().href(), href);
	assert_eq!(sync.stack(), stack);
}

/// Must treat closing a name that is not open as a no-op.
///
/// - Enforced in: `OverlaySync::close`
/// - Failure symptom: Spurious history entries; back appears to do nothing.
#[test]
fn test_close_is_idempotent() {
	let sync = fresh();
	sync.open("a");
	let href = sync.location().href();
	let len = sync.location().history_len();
	sync.close("b");
	assert_eq!(sync.location().href(), href);
	assert_eq!(sync.location().history_len(), len);
}

/// Must remove the parameter entirely when the last overlay closes.
///
/// - Enforced in: `OverlaySync::modify`
/// - Failure symptom: Shared links carry a dangling `d=` parameter.
#[test]
fn test_last_close_removes_parameter() {
	let sync = fresh();
	sync.open("a");
	sync.close("a");
	assert_eq!(sync.location().href(), "/app?tab=1");
	assert!(!sync.location().search().contains("d"));
}

/// Must return empty data for a name that was never opened, without failing.
///
/// - Enforced in: `OverlaySync::data`
/// - Failure symptom: A drawer body panics while the URL is being edited by hand.
#[test]
fn test_data_of_unknown_name_is_empty() {
	let sync = fresh();
	assert!(sync.data("never").is_empty());
	sync.open(OverlayEntry::new("other").with("id", "1"));
	assert!(sync.data("never").is_empty());
}

fn arb_value() -> impl Strategy<Value = Value> {
	let leaf = prop_oneof![
		Just(Value::Null),
		any::<bool>().prop_map(Value::Bool),
		any::<i64>().prop_map(Value::from),
		(-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 8.0)),
		".{0,10}".prop_map(Value::String),
	];
	leaf.prop_recursive(8, 32, 3, |inner| {
		prop_oneof![
			prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
			prop::collection::vec((".{0,6}", inner), 0..3).prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
		]
	})
}

fn arb_stack() -> impl Strategy<Value = OverlayStack> {
	let data = prop::collection::vec((".{0,6}", arb_value()), 0..4);
	let entry = (".{0,10}", data).prop_map(|(name, fields)| {
		fields.into_iter().fold(OverlayEntry::new(name), |entry, (k, v)| entry.with(k, v))
	});
	prop::collection::vec(entry, 0..5).prop_map(|entries| entries.into_iter().collect())
}

fn round_trip(stack: &OverlayStack, codec: &dyn QueryCodec) -> OverlayStack {
	let keys = KeyTable::default();
	let mut query = QueryString::parse("keep=1");
	match wire::encode_stack(stack, &keys) {
		Some(value) => query.set(codec, "d", &value),
		None => {
			query.remove(codec, "d");
		}
	}
	let reparsed = QueryString::parse(&query.to_string());
	match reparsed.decode(codec, "d").expect("encoded stack must decode") {
		Some(value) => wire::decode_stack(&value, &keys).expect("encoded stack must be well-formed"),
		None => OverlayStack::new(),
	}
}

proptest! {
	/// Must decode what was encoded, preserving order (round-trip law).
	///
	/// - Enforced in: `wire::encode_stack`, `wire::decode_stack`
	/// - Failure symptom: Reloading a shared link opens overlays in a different order or with other data.
	#[test]
	fn test_round_trip_law(stack in arb_stack()) {
		prop_assert_eq!(&round_trip(&stack, &Brackets), &stack);
		prop_assert_eq!(&round_trip(&stack, &Json), &stack);
	}

	/// Must report an overlay open right after `open`, whatever its data, and
	/// keep every overlay that was already open.
	///
	/// - Enforced in: `wire::encode_stack`, `Brackets`, `OverlaySync::modify`
	/// - Failure symptom: Opening a drawer with unusual data closes every drawer.
	#[test]
	fn test_open_with_any_data_is_visible(stack in arb_stack()) {
		let sync = fresh();
		for entry in stack.iter() {
			sync.open(entry);
		}
		prop_assert_eq!(sync.stack(), stack);
		prop_assert!(sync.location().search().starts_with("tab=1"));
	}

	/// Must never hold two entries with the same name, however the stack was built.
	///
	/// - Enforced in: `OverlayStack::push`, `wire::decode_stack`
	/// - Failure symptom: `close` removes one copy and the overlay stays open.
	#[test]
	fn test_names_are_unique(ops in prop::collection::vec((any::<bool>(), "[abc]"), 0..24)) {
		let sync = OverlaySync::new(MemoryLocation::default());
		for (open, name) in &ops {
			if *open {
				sync.open(name.as_str());
				prop_assert!(sync.is_open(name.as_str()));
			} else {
				sync.close(name.as_str());
				prop_assert!(!sync.is_open(name.as_str()));
			}
		}
		let stack = sync.stack();
		let mut names: Vec<_> = stack.iter().map(|e| e.name.clone()).collect();
		let len = names.len();
		names.sort();
		names.dedup();
		prop_assert_eq!(names.len(), len);
	}
}
