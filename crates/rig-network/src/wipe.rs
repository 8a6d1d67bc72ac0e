// SPDX-License-Identifier: GPL-3.0

//! The one-time safety check guarding destructive data removal.

use crate::errors::Error;
use std::{fs::remove_dir_all, io::ErrorKind, path::Path};

/// The marker file whose presence declares a directory safe to wipe.
pub const SENTINEL: &str = ".rig-testing";

/// Removes all prior run state (the `data` directory) beneath `dir`.
///
/// Requires the [`SENTINEL`] file to exist in `dir`; its absence is a fatal
/// error rather than a silent no-op. A missing `data` directory is fine.
///
/// # Arguments
/// * `dir` - The working directory holding the sentinel and the run state.
pub fn wipe_data(dir: impl AsRef<Path>) -> Result<(), Error> {
	let dir = dir.as_ref();
	if dir.join(SENTINEL).symlink_metadata().is_err() {
		return Err(Error::MissingSentinel {
			sentinel: SENTINEL,
			dir: dir.display().to_string(),
		});
	}
	match remove_dir_all(dir.join("data")) {
		Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs::{File, create_dir_all};

	#[test]
	fn missing_sentinel_fails() -> anyhow::Result<()> {
		let temp = tempfile::tempdir()?;
		create_dir_all(temp.path().join("data"))?;
		let result = wipe_data(temp.path());
		assert!(matches!(result, Err(Error::MissingSentinel { sentinel: SENTINEL, .. })));
		// Nothing was removed.
		assert!(temp.path().join("data").exists());
		Ok(())
	}

	#[test]
	fn wipe_data_works() -> anyhow::Result<()> {
		let temp = tempfile::tempdir()?;
		File::create(temp.path().join(SENTINEL))?;
		create_dir_all(temp.path().join("data").join("log"))?;
		wipe_data(temp.path())?;
		assert!(!temp.path().join("data").exists());
		Ok(())
	}

	#[test]
	fn missing_data_directory_is_fine() -> anyhow::Result<()> {
		let temp = tempfile::tempdir()?;
		File::create(temp.path().join(SENTINEL))?;
		wipe_data(temp.path())?;
		Ok(())
	}
}
