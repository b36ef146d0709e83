//! Compact JSON carried in a single parameter.

use serde_json::Value;

use crate::{QueryCodec, QueryError, Result};

/// Type-preserving codec: `root=<compact JSON>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json;

impl QueryCodec for Json {
	fn name(&self) -> &'static str {
		"json"
	}

	fn encode(&self, root: &str, value: &Value) -> Vec<(String, String)> {
		vec![(root.to_string(), value.to_string())]
	}

	fn decode(&self, root: &str, pairs: &[(String, String)]) -> Result<Option<Value>> {
		match pairs {
			[] => Ok(None),
			[(_, text)] => serde_json::from_str(text).map(Some).map_err(|e| QueryError::Json {
				root: root.to_string(),
				message: e.to_string(),
			}),
			_ => Err(QueryError::Repeated {
				root: root.to_string(),
				count: pairs.len(),
			}),
		}
	}
}
