// SPDX-License-Identifier: GPL-3.0

//! Launch specifiers: the validated description of one node to run.

use crate::{
	command,
	errors::Error,
	registry::{Peer, PeerArg, PeerRegistry},
	run::supervise,
	sink::LogSink,
};
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};
use strum::VariantArray;
use strum_macros::{AsRefStr, EnumString, VariantArray};

/// The compact specifier grammar: `<alias>@<peer>`, optionally followed by
/// either `+k` (alternate client) or `+<para>@<relay>` (collator role).
static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(?P<who>[a-f])@(?P<peer>\d{1,2})(?:\+(?:(?P<alt>k)|(?P<para>\d)@(?P<relay>\d{1,2})))?$")
		.expect("The regex is valid; qed;")
});

/// A well-known development keypair alias.
#[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq, VariantArray)]
#[strum(serialize_all = "lowercase")]
pub enum DevIdentity {
	Alice,
	Bob,
	Charlie,
	Dave,
	Eve,
	Ferdie,
}

impl DevIdentity {
	/// Resolves a single-letter alias (`a` through `f`) to its dev identity.
	pub fn from_alias(alias: &str) -> Result<Self, Error> {
		Self::VARIANTS
			.iter()
			.find(|dev| !alias.is_empty() && dev.as_ref().starts_with(alias))
			.copied()
			.ok_or_else(|| Error::UnknownDevIdentity(alias.into()))
	}

	/// The CLI flag selecting this identity's well-known keys.
	pub fn flag(&self) -> String {
		format!("--{}", self.as_ref())
	}
}

/// The role a launched node performs within the network.
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
	/// A relay chain validator using the default client.
	Validator,
	/// A relay chain validator using the alternate client implementation.
	AlternateClientValidator,
	/// A parachain collator with an embedded relay chain connection.
	Collator {
		/// The parachain identifier.
		para_id: u8,
		/// The peer whose relay chain address this collator connects to.
		relay: Peer,
	},
}

/// Role settings for the structured construction path, mirroring the optional
/// parts of the compact grammar.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
	/// Run the alternate client implementation instead of the default one.
	/// Mutually exclusive with `collator`.
	pub alternate_client: bool,
	/// Collator sub-role: the parachain identifier and the relay peer.
	pub collator: Option<(u8, PeerArg)>,
}

/// A validated, immutable description of one node to run.
pub struct LaunchSpec {
	dev: DevIdentity,
	peer: Peer,
	role: Role,
	name: String,
	extra: Option<Vec<String>>,
	prefix: String,
	log: Option<LogSink>,
}

impl LaunchSpec {
	/// Creates a validated launch specifier. Both the compact grammar and the
	/// structured form route through here, so invariants are enforced exactly
	/// once.
	///
	/// # Arguments
	/// * `dev` - The development identity the node impersonates.
	/// * `peer` - The peer slot the node binds to.
	/// * `role` - The role the node performs.
	pub fn new(dev: DevIdentity, peer: Peer, role: Role) -> Result<Self, Error> {
		let mut name = dev.as_ref().to_string();
		if let Role::Collator { para_id, relay } = &role {
			if relay.index() == peer.index() {
				return Err(Error::SelfRelay(peer.index()));
			}
			name = format!("{name}-{para_id}");
		}
		Ok(Self { dev, peer, role, name, extra: None, prefix: String::new(), log: None })
	}

	/// Parses a compact specifier such as `a@0`, `a@0+k` or `a@0+2@1`.
	///
	/// # Arguments
	/// * `specifier` - The specifier string.
	/// * `registry` - The registry used to resolve peer indices.
	pub fn parse(specifier: &str, registry: &PeerRegistry) -> Result<Self, Error> {
		let captures = SPECIFIER
			.captures(specifier)
			.ok_or_else(|| Error::ParseSpecifier(specifier.into()))?;
		let dev = DevIdentity::from_alias(&captures["who"])?;
		let peer = registry.get(index(&captures["peer"]))?;
		let role = if captures.name("alt").is_some() {
			Role::AlternateClientValidator
		} else if let Some(para) = captures.name("para") {
			Role::Collator {
				para_id: index(para.as_str()) as u8,
				relay: registry.get(index(&captures["relay"]))?,
			}
		} else {
			Role::Validator
		};
		Self::new(dev, peer, role)
	}

	/// Creates a specifier from an explicit identity, peer and options,
	/// enforcing the same invariants as the compact grammar.
	///
	/// # Arguments
	/// * `dev` - The development identity the node impersonates.
	/// * `peer` - The peer slot (index or resolved peer) the node binds to.
	/// * `options` - The role settings.
	/// * `registry` - The registry used to resolve peer indices.
	pub fn with_options(
		dev: DevIdentity,
		peer: impl Into<PeerArg>,
		options: LaunchOptions,
		registry: &PeerRegistry,
	) -> Result<Self, Error> {
		if options.alternate_client && options.collator.is_some() {
			return Err(Error::RoleConflict);
		}
		let peer = registry.get(peer)?;
		let role = match options.collator {
			Some((para_id, relay)) => Role::Collator { para_id, relay: registry.get(relay)? },
			None if options.alternate_client => Role::AlternateClientValidator,
			None => Role::Validator,
		};
		Self::new(dev, peer, role)
	}

	/// Attaches pass-through arguments, appended verbatim after the generated
	/// command line. May be set at most once; an embedded `--` is unsupported.
	pub fn args(&mut self, args: Vec<String>) -> Result<&mut Self, Error> {
		if self.extra.is_some() {
			return Err(Error::ArgsAlreadySet);
		}
		if args.iter().any(|arg| arg == "--") {
			return Err(Error::UnsupportedSeparator);
		}
		self.extra = Some(args);
		Ok(self)
	}

	/// Sets the console prefix used when mirroring the node's output.
	/// Cosmetic only.
	pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
		self.prefix = prefix.into();
		self
	}

	/// The development identity the node impersonates.
	pub fn dev(&self) -> DevIdentity {
		self.dev
	}

	/// The peer slot the node binds to.
	pub fn peer(&self) -> &Peer {
		&self.peer
	}

	/// The role the node performs.
	pub fn role(&self) -> &Role {
		&self.role
	}

	/// The node name: the dev identity, suffixed with `-<paraId>` for
	/// collators. Names the base path and the log file.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The attached pass-through arguments, if any.
	pub fn extra_args(&self) -> &[String] {
		self.extra.as_deref().unwrap_or_default()
	}

	/// The console prefix.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// The full argument vector launching this node.
	pub fn command(&self) -> Vec<String> {
		command::command(self)
	}

	/// The log sink for this node, created on first access at
	/// `data/log/<name>.log`.
	pub async fn log(&mut self) -> Result<&LogSink, Error> {
		if self.log.is_none() {
			let path = PathBuf::from("data/log").join(format!("{}.log", self.name));
			self.log = Some(LogSink::create(path).await?);
		}
		Ok(self.log.as_ref().expect("sink initialized above; qed;"))
	}

	/// Spawns the node and supervises it until exit, mirroring its output to
	/// the console and persisting it to the node's log.
	pub async fn run(&mut self) -> Result<(), Error> {
		let command = self.command();
		let prefix = self.prefix.clone();
		let log = self.log().await?;
		let supervised = supervise(&command, log, &prefix).await;
		// The sink is torn down on both exit paths.
		let closed = log.close().await;
		supervised.and(closed)
	}
}

fn index(digits: &str) -> usize {
	digits.parse().expect("the grammar only matches decimal digits; qed;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	fn registry() -> PeerRegistry {
		PeerRegistry::testnet().expect("the reference registry is valid")
	}

	#[test]
	fn parse_solo_validator_works() -> Result<(), Error> {
		let registry = registry();
		let spec = LaunchSpec::parse("a@0", &registry)?;
		assert_eq!(spec.name(), "alice");
		assert_eq!(spec.dev(), DevIdentity::Alice);
		assert_eq!(spec.peer().index(), 0);
		assert_eq!(*spec.role(), Role::Validator);
		Ok(())
	}

	#[test]
	fn parse_alternate_client_works() -> Result<(), Error> {
		let spec = LaunchSpec::parse("b@3+k", &registry())?;
		assert_eq!(spec.name(), "bob");
		assert_eq!(*spec.role(), Role::AlternateClientValidator);
		Ok(())
	}

	#[test]
	fn parse_collator_works() -> Result<(), Error> {
		let registry = registry();
		let spec = LaunchSpec::parse("a@0+2@1", &registry)?;
		assert_eq!(spec.name(), "alice-2");
		assert_eq!(spec.peer().index(), 0);
		assert_eq!(
			*spec.role(),
			Role::Collator { para_id: 2, relay: registry.get(1)? }
		);
		Ok(())
	}

	#[test]
	fn parse_rejects_malformed_specifiers() {
		let registry = registry();
		for specifier in ["", "a", "a@", "z@0", "g@0", "a@0+", "a@0+k+1@2", "a@0+10@1", "a@100"] {
			let result = LaunchSpec::parse(specifier, &registry);
			assert!(
				matches!(result, Err(Error::ParseSpecifier(s)) if s == specifier),
				"{specifier} should not parse"
			);
		}
	}

	#[test]
	fn parse_rejects_unknown_peer() {
		let registry = registry();
		assert!(matches!(LaunchSpec::parse("a@99", &registry), Err(Error::UnknownPeer(99))));
		assert!(matches!(LaunchSpec::parse("a@0+2@99", &registry), Err(Error::UnknownPeer(99))));
	}

	#[test]
	fn self_referential_relay_fails() {
		let registry = registry();
		assert!(matches!(LaunchSpec::parse("a@1+2@1", &registry), Err(Error::SelfRelay(1))));
		// The structured form enforces the same invariant.
		let options =
			LaunchOptions { collator: Some((2, PeerArg::Index(1))), ..Default::default() };
		let result = LaunchSpec::with_options(DevIdentity::Alice, 1, options, &registry);
		assert!(matches!(result, Err(Error::SelfRelay(1))));
	}

	#[test]
	fn conflicting_roles_fail() {
		let options = LaunchOptions {
			alternate_client: true,
			collator: Some((2, PeerArg::Index(1))),
		};
		let result = LaunchSpec::with_options(DevIdentity::Alice, 0, options, &registry());
		assert!(matches!(result, Err(Error::RoleConflict)));
	}

	#[test]
	fn structured_form_matches_compact_grammar() -> Result<(), Error> {
		let registry = registry();
		let parsed = LaunchSpec::parse("a@0+2@1", &registry)?;
		let options =
			LaunchOptions { collator: Some((2, PeerArg::Index(1))), ..Default::default() };
		let structured = LaunchSpec::with_options(DevIdentity::Alice, 0, options, &registry)?;
		assert_eq!(parsed.name(), structured.name());
		assert_eq!(parsed.command(), structured.command());
		Ok(())
	}

	#[test]
	fn args_set_at_most_once() -> Result<(), Error> {
		let mut spec = LaunchSpec::parse("a@0", &registry())?;
		spec.args(vec!["-lruntime=debug".into()])?;
		assert!(matches!(spec.args(vec![]), Err(Error::ArgsAlreadySet)));
		assert_eq!(spec.extra_args(), ["-lruntime=debug"]);
		Ok(())
	}

	#[test]
	fn embedded_separator_is_unsupported() -> Result<(), Error> {
		let mut spec = LaunchSpec::parse("a@0+2@1", &registry())?;
		let args = vec!["--bootnodes".into(), "--".into(), "--chain".into()];
		assert!(matches!(spec.args(args), Err(Error::UnsupportedSeparator)));
		Ok(())
	}

	#[test]
	fn dev_identity_aliases_work() {
		assert_eq!(DevIdentity::from_alias("a").unwrap(), DevIdentity::Alice);
		assert_eq!(DevIdentity::from_alias("f").unwrap(), DevIdentity::Ferdie);
		assert_eq!(DevIdentity::Charlie.flag(), "--charlie");
		assert!(matches!(
			DevIdentity::from_alias("z"),
			Err(Error::UnknownDevIdentity(alias)) if alias == "z"
		));
		assert!(matches!(DevIdentity::from_alias(""), Err(Error::UnknownDevIdentity(_))));
		// Full names parse too.
		assert_eq!(DevIdentity::from_str("ferdie").unwrap(), DevIdentity::Ferdie);
	}

	#[test]
	fn console_prefix_is_cosmetic() -> Result<(), Error> {
		let registry = registry();
		let mut spec = LaunchSpec::parse("a@0", &registry)?;
		let command = spec.command();
		spec.set_prefix("alice: ");
		assert_eq!(spec.prefix(), "alice: ");
		assert_eq!(spec.command(), command);
		Ok(())
	}
}
