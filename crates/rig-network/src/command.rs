// SPDX-License-Identifier: GPL-3.0

//! Role-aware command-line construction.

use crate::spec::{LaunchSpec, Role};

/// The default relay chain client binary.
pub(crate) const DEFAULT_CLIENT: &str = "bin/polkadot";
/// The alternate relay chain client implementation.
pub(crate) const ALTERNATE_CLIENT: &str = "bin/kagome";
/// The relay chain specification, referenced by every node.
pub(crate) const RELAY_CHAIN_SPEC: &str = "chain/relay.json";
// Flags quietening local runs of the default client. The alternate client
// does not accept them.
const DISABLE_FLAGS: [&str; 2] = ["--no-hardware-benchmarks", "--no-mdns"];

pub(crate) fn para_binary(para_id: u8) -> String {
	format!("bin/para-{para_id}")
}

pub(crate) fn para_chain_spec(para_id: u8) -> String {
	format!("chain/para-{para_id}.json")
}

/// Builds the full argument vector for a launch specifier. Pure and
/// deterministic.
///
/// Solo validators run their own peer's network arguments against the relay
/// chain spec. Collators build two groups split by a literal `--`: the
/// collator side (parachain spec, the *relay* peer's network arguments)
/// followed by the embedded relay chain connection (relay spec, the *bound*
/// peer's network arguments). Pass-through arguments are appended last.
pub fn command(spec: &LaunchSpec) -> Vec<String> {
	let dev = spec.dev().flag();
	let base_path = ["--base-path".to_string(), format!("data/{}", spec.name())];
	let relay_chain = ["--chain".to_string(), RELAY_CHAIN_SPEC.to_string()];
	let disable = DISABLE_FLAGS.map(String::from);
	let mut command = match spec.role() {
		Role::Collator { para_id, relay } => {
			let mut command = vec![
				para_binary(*para_id),
				dev,
				"--collator".to_string(),
				"--force-authoring".to_string(),
			];
			command.extend(base_path);
			command.extend(["--chain".to_string(), para_chain_spec(*para_id)]);
			command.extend(relay.args());
			command.extend(disable.clone());
			command.push("--".to_string());
			command.extend(relay_chain);
			command.extend(spec.peer().args());
			command.extend(disable);
			command
		},
		role => {
			let binary =
				if *role == Role::AlternateClientValidator { ALTERNATE_CLIENT } else { DEFAULT_CLIENT };
			let mut command = vec![binary.to_string(), dev, "--validator".to_string()];
			command.extend(base_path);
			command.extend(relay_chain);
			command.extend(spec.peer().args());
			if *role == Role::Validator {
				command.extend(disable);
			}
			command
		},
	};
	command.extend(spec.extra_args().iter().cloned());
	command
}
