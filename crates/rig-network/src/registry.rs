// SPDX-License-Identifier: GPL-3.0

//! Deterministic peer addressing for the local test network.
//!
//! Every peer slot derives a non-overlapping block of ports from its index, so
//! any subset of the registry can run side by side on one machine without
//! coordination.

use crate::errors::Error;
use regex::Regex;
use std::sync::LazyLock;

/// Base of the port range assigned to peer slots.
pub const BASE_PORT: u16 = 10_000;
/// Ports reserved per peer slot. Four are used (p2p, rpc, ws, metrics), the
/// rest is headroom.
pub const PORT_STRIDE: u16 = 10;

const LOCALHOST: &str = "127.0.0.1";

static SEED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[0-9a-f]{64}$").expect("The regex is valid; qed;"));
static IDENTITY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^12D3KooW[1-9A-HJ-NP-Za-km-z]{44}$").expect("The regex is valid; qed;")
});

/// A simulated network participant with a fixed node key seed, public identity
/// and deterministic port block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Peer {
	index: usize,
	seed: String,
	identity: String,
	port: u16,
	multiaddr: String,
	http: String,
	ws: String,
	metrics: String,
}

impl Peer {
	fn new(index: usize, seed: &str, identity: &str) -> Result<Self, Error> {
		if !SEED.is_match(seed) {
			return Err(Error::InvalidSeed(seed.into()));
		}
		if !IDENTITY.is_match(identity) {
			return Err(Error::InvalidIdentity(identity.into()));
		}
		let port = BASE_PORT + (index as u16) * PORT_STRIDE;
		let (rpc, ws, metrics) = (port + 1, port + 2, port + 3);
		Ok(Self {
			index,
			seed: seed.into(),
			identity: identity.into(),
			port,
			multiaddr: format!("/ip4/{LOCALHOST}/tcp/{port}/p2p/{identity}"),
			http: format!("http://{LOCALHOST}:{rpc}"),
			ws: format!("ws://{LOCALHOST}:{ws}"),
			metrics: format!("http://{LOCALHOST}:{metrics}/metrics"),
		})
	}

	/// The 0-based registry slot of this peer.
	pub fn index(&self) -> usize {
		self.index
	}

	/// The node key seed, as 64 hexadecimal characters.
	pub fn seed(&self) -> &str {
		&self.seed
	}

	/// The public network identity derived from the node key.
	pub fn identity(&self) -> &str {
		&self.identity
	}

	/// The p2p listen port. RPC, WebSocket and metrics follow on the next
	/// three ports.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// The full p2p multiaddress including the peer identity.
	pub fn multiaddr(&self) -> &str {
		&self.multiaddr
	}

	/// The HTTP RPC endpoint.
	pub fn http(&self) -> &str {
		&self.http
	}

	/// The WebSocket RPC endpoint.
	pub fn ws(&self) -> &str {
		&self.ws
	}

	/// The metrics scrape endpoint.
	pub fn metrics(&self) -> &str {
		&self.metrics
	}

	/// The network arguments configuring a node to listen as this peer.
	pub fn args(&self) -> Vec<String> {
		vec![
			"--node-key".into(),
			self.seed.clone(),
			"--listen-addr".into(),
			format!("/ip4/{LOCALHOST}/tcp/{}", self.port),
			"--rpc-port".into(),
			(self.port + 1).to_string(),
			"--ws-port".into(),
			(self.port + 2).to_string(),
			"--prometheus-port".into(),
			(self.port + 3).to_string(),
		]
	}
}

/// Either an already-resolved [`Peer`] or a registry index still to be looked
/// up.
#[derive(Clone, Debug)]
pub enum PeerArg {
	/// A 0-based registry index.
	Index(usize),
	/// An already-resolved peer, returned as-is by lookups.
	Resolved(Peer),
}

impl From<usize> for PeerArg {
	fn from(index: usize) -> Self {
		PeerArg::Index(index)
	}
}

impl From<Peer> for PeerArg {
	fn from(peer: Peer) -> Self {
		PeerArg::Resolved(peer)
	}
}

/// An immutable, pre-validated table mapping peer indices to network
/// identities.
///
/// Constructed once at startup and passed to whatever needs lookups, so tests
/// can substitute a smaller fixture registry.
pub struct PeerRegistry {
	peers: Vec<Peer>,
}

impl PeerRegistry {
	/// Builds a registry from `(seed, identity)` pairs, assigning indices in
	/// order. Any malformed entry fails the whole construction.
	pub fn new(entries: &[(&str, &str)]) -> Result<Self, Error> {
		let peers = entries
			.iter()
			.enumerate()
			.map(|(index, (seed, identity))| Peer::new(index, seed, identity))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { peers })
	}

	/// The reference 20-slot testnet registry.
	pub fn testnet() -> Result<Self, Error> {
		Self::new(TESTNET_PEERS)
	}

	/// Resolves a peer from an index or returns an already-resolved peer
	/// unchanged.
	///
	/// # Arguments
	/// * `peer` - A registry index or a [`Peer`].
	pub fn get(&self, peer: impl Into<PeerArg>) -> Result<Peer, Error> {
		match peer.into() {
			PeerArg::Resolved(peer) => Ok(peer),
			PeerArg::Index(index) =>
				self.peers.get(index).cloned().ok_or(Error::UnknownPeer(index)),
		}
	}

	/// The number of peer slots.
	pub fn len(&self) -> usize {
		self.peers.len()
	}

	/// Whether the registry has no slots.
	pub fn is_empty(&self) -> bool {
		self.peers.is_empty()
	}

	/// Iterates over all peers in index order.
	pub fn iter(&self) -> impl Iterator<Item = &Peer> {
		self.peers.iter()
	}
}

// Well-known testing credentials, never to be used outside a local network.
#[rustfmt::skip]
const TESTNET_PEERS: &[(&str, &str)] = &[
	("f8dfdb0f1103d9fb2905204ac32529d5f148761c4321b2865b0a40e15be75f57", "12D3KooWT3CsfuervgduMG6RdjVq66z9JnN1GcsRBCWZPxPSBZSV"),
	("96c891b8726cb18c781aefc082dbafcb827e16c8f18f22d461e83eabd618e780", "12D3KooWNgqk3v24c2Qvi3ZrkJVLayPeUmGbqnNuyt4hHmtxMghk"),
	("619d5e68139f714ee8e7892ce5afd8fbe7a4172a675fea5c5a06fb94fe3d797d", "12D3KooWCUFF1beahMbdvX1EygEtsfuV2Q3xYcZq2CaEb9khrL3R"),
	("8d0c5f498a763eaa8c04861cac06289784140b4bbfa814fef898f1f4095de4a3", "12D3KooWBroL5fZojMcNb7XBzoDqB5wXU5SBhzXfvVRzq1s8p26M"),
	("dd806adee3d12fbfd211e6eecf83012ea9bf2268c9a9e5f84bc3151e2dbe6cba", "12D3KooWS3JSjUSMxh3mrz4mJpw3erTzzwVuTawMbeJtedoCN6p3"),
	("f39e3ae5ad6a0ee7b60f75323b685f0d12b3ff88d2ecd5ccb6a3b837a08eff95", "12D3KooWP97syC4W7z5RP8RFdGMMCL4VHTf8sFLdUiKzP7wYPWdm"),
	("1407c951a3b8aa437492fdc6e403daaa4099a5d258a89662e88845db745409dc", "12D3KooWCjDwwzREB6DXihBC2VmcANkVr6ZCohwboUTuoFpdo8e1"),
	("0ab49b9fc745e44b5269d6111648d011ee31e0ada91abe35e456d301a0868443", "12D3KooWSqgEGMLJ7v8YpyDrJJ7eVWVZ4LCHhuaV596UGzsAyHmW"),
	("08d9b78f0b392ae784b390ba42a0f6f5692f5930957b7b51248de1306ffd112d", "12D3KooWJZUSjk53WYVLkXWYQTXuJ32Z4V9msQ8DRGsUF9atpoYz"),
	("38c6daaf32efb4c121f4b39c80dee603558dff35ae2010add9620553811e1b54", "12D3KooWRWnHLFWrzA7wjKmTnHHVpSYAkp9Q15efGVcohbWrAWSr"),
	("15632910ec86fa26cf37787b54590fc20ac4e5a4964a775c41b9af4f543f650c", "12D3KooWDWevioVb379bW3ryzngXxwQeDZabKqShT9WJVseKgVDh"),
	("33fa75cbd434e8f496a248f547d353795c731c2ff7c4745d74f4cf7749971968", "12D3KooWRxsmBJ1VKL2vMfY9PAnyhDmamCP1owt6cRJ2ZyS7ARBd"),
	("ad533d45193603ae0c8cf54cffe4df43be1723a977d975653580f9825c870fbc", "12D3KooWMy5dgd1rdq7jP2sPSXReDrPjNUz1mMtFP2tHtGtcs9ce"),
	("cd0d90a263226a34cacad89fa4c141c2ad85e113a8ebb7feb2298407d2e267c9", "12D3KooWGRWyDPPPhXvGVAi19SCZoaYTVatb4zfRearmfrMxyshm"),
	("f2b3f3299facd6e8275b75bfd222375a2c956b9daa9468e836bb0e294c06f24d", "12D3KooWLKdY6H3CArcbzsArmxFhdVzpSBygAu2jKykatxoV2Lac"),
	("1878de06322c7361f5e43d4decaf4efb162bfc425264ece48beeea3bcdc81e84", "12D3KooWP5LGqV6JuM5VUQ5ZSRaN3y4iXgDr4wEZRAL1jmdUG1E4"),
	("8a55b109b1cc979f938b2e5382dd3618d07a75f276c7950baf1e6aed76c2fd37", "12D3KooWEWYrByRCEh269TEvH2bAewk2r5DJtSw4PNChC3YVk2TZ"),
	("f7f3815252e12ce2d65be1c70ad17dcd28f9561f4466fa87e0c22b3a369f35f6", "12D3KooWQvAnhysXEUE8rvqMu6nq6MGcyf6GZLU8PcgPRK7nVRg1"),
	("72cf61b8f1da4b826b5553291fdb385e30dd24461c4be101a32e8c7e29892d78", "12D3KooWHeA1owT5ZwqtrLzD8JJKcpHbZJ24HKHuanyXBN4i6uQn"),
	("452523963748952cae8b85159fc77d17a51f5675290f812a10780d370c18feac", "12D3KooWPX6YEj7f8bWYPWLDgK7YUk3H39ZydANgTwevY8kFakEJ"),
];
