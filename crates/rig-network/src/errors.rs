// SPDX-License-Identifier: GPL-3.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Pass-through arguments have already been attached")]
	ArgsAlreadySet,

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Invalid peer identity: {0}")]
	InvalidIdentity(String),

	#[error("Invalid node key seed: {0}")]
	InvalidSeed(String),

	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Create \"{sentinel}\" in {dir} before wiping test data")]
	MissingSentinel { sentinel: &'static str, dir: String },

	#[error("Unrecognized launch specifier: {0}")]
	ParseSpecifier(String),

	#[error("Process exited unsuccessfully: {0}")]
	ProcessFailure(String),

	#[error("A node cannot be both an alternate-client validator and a collator")]
	RoleConflict,

	#[error("A collator cannot use its own peer slot {0} as its relay peer")]
	SelfRelay(usize),

	#[error("Unknown dev identity alias: {0}")]
	UnknownDevIdentity(String),

	#[error("Unknown peer index: {0}")]
	UnknownPeer(usize),

	#[error("Additional `--` separators in pass-through arguments are unsupported")]
	UnsupportedSeparator,
}
