//! Subcommand implementations. Each returns the text printed on stdout.

use anyhow::{Context, Result};
use serde_json::Value;
use tether_config::OverlayConfig;
use tether_gate::{RunInputs, compute_run_permission};
use tether_overlay::{MemoryLocation, OverlayData, OverlayEntry, OverlaySync};
use url::{ParseError, Position, Url};

use crate::cli::GateArgs;

/// A URL loaded into an in-memory location. The origin of absolute input is
/// kept aside and restored on output; the fragment travels with the location.
struct Page {
	origin: Option<String>,
	location: MemoryLocation,
}

impl Page {
	fn parse(input: &str) -> Result<Self> {
		let (origin, url) = match Url::parse(input) {
			Ok(url) => (Some(url[..Position::BeforePath].to_string()), url),
			Err(ParseError::RelativeUrlWithoutBase) => {
				let base = Url::parse("http://localhost")?;
				(None, base.join(input).with_context(|| format!("invalid URL `{input}`"))?)
			}
			Err(e) => return Err(e).with_context(|| format!("invalid URL `{input}`")),
		};
		let href = &url[Position::BeforePath..];
		Ok(Self {
			origin,
			location: MemoryLocation::new(href),
		})
	}

	fn sync(&self, config: &OverlayConfig) -> OverlaySync<&MemoryLocation> {
		OverlaySync::from_config(&self.location, config)
	}

	fn href(&self) -> String {
		let href = self.location.href();
		match &self.origin {
			Some(origin) => format!("{origin}{href}"),
			None => href,
		}
	}
}

pub fn inspect(url: &str, config: &OverlayConfig) -> Result<String> {
	let page = Page::parse(url)?;
	let stack = page.sync(config).stack();
	serde_json::to_string_pretty(&stack).context("serializing overlay stack")
}

/// `data` fields are strings; `json` fields are parsed and keep their type.
pub fn open(
	url: &str,
	name: &str,
	data: Vec<(String, String)>,
	json: Vec<(String, String)>,
	config: &OverlayConfig,
) -> Result<String> {
	let page = Page::parse(url)?;
	let mut fields: OverlayData = data.into_iter().map(|(key, value)| (key, Value::String(value))).collect();
	for (key, raw) in json {
		let value: Value = serde_json::from_str(&raw).with_context(|| format!("--json {key}: invalid JSON `{raw}`"))?;
		fields.insert(key, value);
	}
	page.sync(config).open(OverlayEntry::with_data(name, fields));
	Ok(page.href())
}

pub fn close(url: &str, name: &str, config: &OverlayConfig) -> Result<String> {
	let page = Page::parse(url)?;
	page.sync(config).close(name);
	Ok(page.href())
}

pub fn gate(args: &GateArgs) -> String {
	let inputs = RunInputs {
		serial_loading: args.serial_loading,
		identity_loading: args.identity_loading,
		required_key: args.key.as_deref(),
		is_removed: args.removed,
	};
	let decision = inputs.readiness().decide();
	debug_assert_eq!(decision.enabled, compute_run_permission(&inputs));
	match decision.blocked_by {
		None => "enabled".to_string(),
		Some(reason) => format!("disabled ({reason})"),
	}
}
