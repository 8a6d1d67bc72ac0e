// SPDX-License-Identifier: GPL-3.0

mod style;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use regex::Regex;
use rig_network::{LaunchSpec, PeerRegistry, wipe_data};
use std::sync::LazyLock;

const AFTER_HELP: &str = "\
Examples:
  @0
      print peer 0 info
  a@0 [RELAY...]
      run: bin/polkadot --alice [PEER 0] chain/relay.json [RELAY...]
  a@0+k [RELAY...]
      run: bin/kagome --alice [PEER 0] chain/relay.json [RELAY...]
  a@0+2@1 [PARA...]
      run: bin/para-2 --alice [PEER 1] chain/para-2.json [PARA...] -- [PEER 0] chain/relay.json";

/// Launch and inspect the nodes of a local test network.
#[derive(Parser)]
#[command(name = "rig", author, version, about, styles = style::get_styles(), after_help = AFTER_HELP)]
struct Cli {
	/// Remove prior run state (the `data` directory) first. Requires a
	/// `.rig-testing` sentinel file in the working directory.
	#[arg(long)]
	wipe: bool,
	/// A launch specifier (`a@0`, `a@0+k`, `a@0+2@1`) followed by pass-through
	/// node arguments, or one or more `@<index>` tokens to print peer info.
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
	env_logger::init();
	let cli = Cli::parse();
	let registry = PeerRegistry::testnet()?;

	if cli.wipe {
		wipe_data(std::env::current_dir()?)?;
	}

	let Some((specifier, extra)) = cli.args.split_first() else {
		return help();
	};
	if specifier.starts_with('@') {
		return peer_info(&cli.args, &registry);
	}

	let mut launch = match LaunchSpec::parse(specifier, &registry) {
		Ok(launch) => launch,
		Err(error) => {
			// A specifier that does not parse is a usage error.
			help()?;
			return Err(error.into());
		},
	};
	launch.args(extra.to_vec())?;
	style::colorize(&mut launch);
	launch.run().await?;
	Ok(())
}

/// Prints the multiaddress, metrics endpoint and a web explorer link for each
/// `@<index>` token.
fn peer_info(tokens: &[String], registry: &PeerRegistry) -> Result<()> {
	static PEER_TOKEN: LazyLock<Regex> =
		LazyLock::new(|| Regex::new(r"^@(\d{1,2})$").expect("The regex is valid; qed;"));
	for token in tokens {
		let Some(captures) = PEER_TOKEN.captures(token) else {
			return help();
		};
		let peer = registry.get(captures[1].parse::<usize>()?)?;
		println!("{}", peer.multiaddr());
		println!("{}", peer.metrics());
		println!(
			"{}",
			style::format_url(&format!("https://polkadot.js.org/apps/?rpc={}", peer.ws()))
		);
	}
	Ok(())
}

fn help() -> Result<()> {
	Cli::command().print_help()?;
	Ok(())
}

#[test]
fn verify_cli() {
	// https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_4/index.html
	Cli::command().debug_assert()
}
