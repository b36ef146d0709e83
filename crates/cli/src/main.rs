//! `tether` binary: inspect and edit overlay stacks carried in URLs.

mod cli;
mod commands;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use tether_config::OverlayConfig;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = load_config(cli.config.as_deref())?;
	tracing::debug!(param = %config.param, codec = ?config.codec, "config.ready");

	let output = match cli.command {
		Command::Inspect { url } => commands::inspect(&url, &config)?,
		Command::Open { url, name, data, json } => commands::open(&url, &name, data, json, &config)?,
		Command::Close { url, name } => commands::close(&url, &name, &config)?,
		Command::Gate(args) => commands::gate(&args),
	};
	println!("{output}");
	Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<OverlayConfig> {
	match path {
		Some(path) => OverlayConfig::load(path).with_context(|| format!("loading {}", path.display())),
		None => OverlayConfig::load_default().context("loading user configuration"),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("tether_overlay=trace,tether_gate=trace,tether_config=debug,tether=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(true).init();
}
