use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::{Brackets, Json};

#[test]
fn parse_strips_leading_question_mark() {
	let q = QueryString::parse("?a=1&b=2");
	assert_eq!(q.to_string(), "a=1&b=2");
}

#[test]
fn empty_segments_are_dropped() {
	let q = QueryString::parse("a=1&&b=2&");
	assert_eq!(q.to_string(), "a=1&b=2");
	assert!(QueryString::parse("").is_empty());
	assert!(QueryString::parse("?").is_empty());
}

#[test]
fn foreign_segments_keep_raw_bytes() {
	let mut q = QueryString::parse("tab=a%20b&x=1+2&flag");
	q.set(&Brackets, "d", &json!({"n": "settings"}));
	assert_eq!(q.to_string(), "tab=a%20b&x=1+2&flag&d%5Bn%5D=settings");
}

#[test]
fn set_replaces_in_place() {
	let mut q = QueryString::parse("a=1&d%5Bn%5D=old&b=2");
	q.set(&Brackets, "d", &json!({"n": "new"}));
	assert_eq!(q.to_string(), "a=1&d%5Bn%5D=new&b=2");
}

#[test]
fn set_with_scattered_root_collapses_at_first_position() {
	let mut q = QueryString::parse("d%5Bn%5D=x&a=1&d%5Bd%5D%5Bid%5D=7");
	q.set(&Brackets, "d", &json!({"n": "y"}));
	assert_eq!(q.to_string(), "d%5Bn%5D=y&a=1");
}

/// Codec with no representation for anything.
#[derive(Debug)]
struct Omit;

impl QueryCodec for Omit {
	fn name(&self) -> &'static str {
		"omit"
	}

	fn encode(&self, _root: &str, _value: &Value) -> Vec<(String, String)> {
		Vec::new()
	}

	fn decode(&self, _root: &str, _pairs: &[(String, String)]) -> crate::Result<Option<Value>> {
		Ok(None)
	}
}

#[test]
fn set_without_pairs_removes_root() {
	let mut q = QueryString::parse("a=1&d=x");
	q.set(&Omit, "d", &json!({"n": "a"}));
	assert_eq!(q.to_string(), "a=1");
	assert!(!q.contains(&Omit, "d"));
}

#[test]
fn set_empty_object_keeps_a_literal() {
	let mut q = QueryString::parse("a=1");
	q.set(&Brackets, "d", &json!({}));
	assert_eq!(q.to_string(), "a=1&d=~%7B%7D");
	assert_eq!(q.decode(&Brackets, "d").unwrap(), Some(json!({})));
}

#[test]
fn remove_reports_whether_anything_changed() {
	let mut q = QueryString::parse("a=1");
	assert!(!q.remove(&Brackets, "d"));
	let mut q = QueryString::parse("a=1&d=2");
	assert!(q.remove(&Brackets, "d"));
	assert_eq!(q.to_string(), "a=1");
}

#[test]
fn roots_are_distinct_in_first_appearance_order() {
	let q = QueryString::parse("b=1&d%5B0%5D%5Bn%5D=x&a=2&d%5B1%5D%5Bn%5D=y&b=3");
	assert_eq!(q.roots(&Brackets), vec!["b", "d", "a"]);
}

#[test]
fn roots_depend_on_codec() {
	let q = QueryString::parse("d%5Bn%5D=x");
	assert_eq!(q.roots(&Brackets), vec!["d"]);
	assert_eq!(q.roots(&Json), vec!["d[n]"]);
}

#[rstest]
#[case::plus_and_percent("x=a+b%20c", "x", "a b c")]
#[case::invalid_utf8("x=%FF", "x", "\u{FFFD}")]
#[case::bad_escape("x=%zz", "x", "%zz")]
#[case::no_value("flag", "flag", "")]
#[case::equals_in_value("x=a=b", "x", "a=b")]
#[case::encoded_key("d%5Bn%5D=a", "d[n]", "a")]
fn segments_decode_as_form_pairs(#[case] text: &str, #[case] key: &str, #[case] value: &str) {
	let q = QueryString::parse(text);
	assert_eq!(q.pairs(&Json, key), vec![(key.to_string(), value.to_string())]);
}
