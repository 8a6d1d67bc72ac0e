// SPDX-License-Identifier: GPL-3.0

//! Process supervision with dual-stream log capture.

use crate::{errors::Error, registry::PeerRegistry, sink::LogSink, spec::LaunchSpec};
use std::process::Stdio;
use tokio::{
	io::{AsyncBufReadExt, AsyncRead, BufReader},
	process::Command,
	try_join,
};

/// Spawns `command` with both output streams captured, mirroring every line to
/// `log` and to the console, and awaits the child's exit.
///
/// The full argument vector is written as the first log and console line
/// before the child starts. Both streams are drained concurrently, so a
/// stream producing no output cannot block consumption of the other. The sink
/// is flushed once draining completes. A non-success exit status is reported
/// as [`Error::ProcessFailure`] carrying the raw status description; there is
/// no retry and no timeout.
///
/// # Arguments
/// * `command` - The executable followed by its arguments.
/// * `log` - The sink receiving every output line.
/// * `prefix` - Prepended to each mirrored console line. Cosmetic only.
pub async fn supervise(command: &[String], log: &LogSink, prefix: &str) -> Result<(), Error> {
	let (program, args) =
		command.split_first().ok_or_else(|| Error::Config("empty command".into()))?;
	let rendered = serde_json::to_string(command)?;
	log.write_line(&rendered).await?;
	println!("{prefix}{rendered}");

	log::debug!("spawning {program}");
	let mut child = Command::new(program)
		.args(args)
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()?;
	let stdout =
		child.stdout.take().ok_or_else(|| Error::Config("stdout not captured".into()))?;
	let stderr =
		child.stderr.take().ok_or_else(|| Error::Config("stderr not captured".into()))?;
	let drained = try_join!(drain(stdout, log, prefix), drain(stderr, log, prefix));
	// Flushed even when draining failed, so everything read so far persists.
	log.flush().await?;
	drained?;

	let status = child.wait().await?;
	if !status.success() {
		return Err(Error::ProcessFailure(status.to_string()));
	}
	Ok(())
}

async fn drain(stream: impl AsyncRead + Unpin, log: &LogSink, prefix: &str) -> Result<(), Error> {
	let mut lines = BufReader::new(stream).lines();
	while let Some(line) = lines.next_line().await? {
		log.write_line(&line).await?;
		println!("{prefix}{line}");
	}
	Ok(())
}

/// Parses `specifier` and supervises the resulting node until it exits.
///
/// # Arguments
/// * `specifier` - A compact launch specifier, e.g. `a@0` or `a@0+2@1`.
/// * `prefix` - The console prefix identifying this node's mirrored output.
/// * `registry` - The registry used to resolve peer indices.
pub async fn launch(
	specifier: &str,
	prefix: impl Into<String>,
	registry: &PeerRegistry,
) -> Result<(), Error> {
	let mut spec = LaunchSpec::parse(specifier, registry)?;
	spec.set_prefix(prefix);
	spec.run().await
}
