// SPDX-License-Identifier: GPL-3.0

//! Buffered, append-only per-node log files.

use crate::errors::Error;
use std::{
	fs::{File, OpenOptions, create_dir_all},
	io::{BufWriter, Write},
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// How often buffered content is persisted, independent of write volume.
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(3);

/// A buffered, append-only log writer with a background periodic flush.
///
/// The file is opened in append mode, so repeated runs for the same node name
/// accumulate in one file, each session preceded by a blank separator line.
/// Writes land in a buffer persisted every [`FLUSH_INTERVAL`], on
/// [`LogSink::flush`] and on [`LogSink::close`]. The flush task is cancelled
/// when the sink is closed or dropped.
pub struct LogSink {
	path: PathBuf,
	writer: Arc<Mutex<BufWriter<File>>>,
	cancel: CancellationToken,
}

impl LogSink {
	/// Opens the log file at `path`, creating parent directories as needed,
	/// and starts the periodic flush task.
	pub async fn create(path: impl Into<PathBuf>) -> Result<Self, Error> {
		Self::with_interval(path, FLUSH_INTERVAL).await
	}

	/// As [`LogSink::create`], with a custom flush interval.
	pub async fn with_interval(
		path: impl Into<PathBuf>,
		flush_every: Duration,
	) -> Result<Self, Error> {
		let path = path.into();
		if let Some(parent) = path.parent() {
			create_dir_all(parent)?;
		}
		let file = OpenOptions::new().create(true).append(true).open(&path)?;
		let mut writer = BufWriter::new(file);
		// Session separator.
		writer.write_all(b"\n")?;
		let writer = Arc::new(Mutex::new(writer));
		let cancel = CancellationToken::new();
		tokio::spawn(flush_periodically(writer.clone(), cancel.clone(), flush_every));
		Ok(Self { path, writer, cancel })
	}

	/// The path of the underlying log file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Appends a line to the buffer. Bytes reach disk on the next flush.
	pub async fn write_line(&self, line: &str) -> Result<(), Error> {
		let mut writer = self.writer.lock().await;
		writer.write_all(line.as_bytes())?;
		writer.write_all(b"\n")?;
		Ok(())
	}

	/// Persists all buffered content.
	pub async fn flush(&self) -> Result<(), Error> {
		self.writer.lock().await.flush()?;
		Ok(())
	}

	/// Cancels the periodic flush task and performs a final flush.
	pub async fn close(&self) -> Result<(), Error> {
		self.cancel.cancel();
		self.flush().await
	}
}

impl Drop for LogSink {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

async fn flush_periodically(
	writer: Arc<Mutex<BufWriter<File>>>,
	cancel: CancellationToken,
	every: Duration,
) {
	let mut interval = tokio::time::interval(every);
	loop {
		tokio::select! {
			biased;

			_ = cancel.cancelled() => return,

			_ = interval.tick() => {
				// Serializes against in-progress writes via the mutex.
				if let Err(error) = writer.lock().await.flush() {
					log::warn!("periodic log flush failed: {error}");
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs::read_to_string;
	use tokio::time::sleep;

	#[tokio::test]
	async fn write_and_flush_works() -> anyhow::Result<()> {
		let temp = tempfile::tempdir()?;
		// Parent directories are created as needed.
		let path = temp.path().join("log").join("alice.log");
		let sink = LogSink::create(&path).await?;
		sink.write_line("first").await?;
		sink.write_line("second").await?;
		sink.flush().await?;
		assert_eq!(read_to_string(&path)?, "\nfirst\nsecond\n");
		Ok(())
	}

	#[tokio::test]
	async fn append_preserves_previous_sessions() -> anyhow::Result<()> {
		let temp = tempfile::tempdir()?;
		let path = temp.path().join("alice.log");
		let first = LogSink::create(&path).await?;
		first.write_line("session one").await?;
		first.close().await?;
		let second = LogSink::create(&path).await?;
		second.write_line("session two").await?;
		second.close().await?;
		assert_eq!(read_to_string(&path)?, "\nsession one\n\nsession two\n");
		Ok(())
	}

	#[tokio::test]
	async fn periodic_flush_works() -> anyhow::Result<()> {
		let temp = tempfile::tempdir()?;
		let path = temp.path().join("alice.log");
		let sink = LogSink::with_interval(&path, Duration::from_millis(25)).await?;
		sink.write_line("unflushed").await?;
		// No explicit flush: the timer must persist the buffer by itself.
		sleep(Duration::from_millis(250)).await;
		assert!(read_to_string(&path)?.contains("unflushed"));
		drop(sink);
		Ok(())
	}
}
