use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Inspect and edit overlay stacks carried in URLs")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to the user config, if any)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the overlay stack encoded in a URL as JSON
	Inspect {
		/// Absolute URL or `/path?query`
		url: String,
	},
	/// Open an overlay and print the resulting URL
	Open {
		/// Absolute URL or `/path?query`
		url: String,
		/// Overlay name
		name: String,
		/// String data field to attach, repeatable
		#[arg(long = "data", short = 'd', value_name = "KEY=VALUE", value_parser = parse_key_val)]
		data: Vec<(String, String)>,
		/// Typed data field given as JSON (`id=42`, `tags=["a"]`), repeatable
		#[arg(long = "json", short = 'j', value_name = "KEY=JSON", value_parser = parse_key_val)]
		json: Vec<(String, String)>,
	},
	/// Close an overlay and print the resulting URL
	Close {
		/// Absolute URL or `/path?query`
		url: String,
		/// Overlay name
		name: String,
	},
	/// Evaluate whether a dependent fetch may run
	Gate(GateArgs),
}

/// Inputs of a run-permission evaluation.
#[derive(Args, Debug, Clone, Default)]
pub struct GateArgs {
	/// Upstream data is still loading
	#[arg(long)]
	pub serial_loading: bool,
	/// Identity/session is still loading
	#[arg(long)]
	pub identity_loading: bool,
	/// Required key of the fetch
	#[arg(long, value_name = "KEY")]
	pub key: Option<String>,
	/// The target entity was deleted
	#[arg(long)]
	pub removed: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
	match s.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got `{s}`")),
	}
}
