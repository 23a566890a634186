// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::StoreError;
use crate::record::Snapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores the whole snapshot as one JSON document.
///
/// There's no locking; only one process may use a given file.
#[derive(Clone, Debug)]
pub struct FileBackend {
	path: PathBuf,
}

impl FileBackend {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads the snapshot, writing out the default snapshot first if the file doesn't exist yet.
	///
	/// Missing configuration fields are filled in with defaults in the returned snapshot only; the file keeps its
	/// contents until the next save.
	pub async fn load(&self) -> Result<Snapshot, StoreError> {
		match self.read_existing().await? {
			Some(snapshot) => Ok(snapshot),
			None => {
				tracing::info!(path = %self.path.display(), "Data file not found; creating it with defaults");
				let snapshot = Snapshot::default();
				self.save(&snapshot).await?;
				Ok(snapshot)
			}
		}
	}

	/// Reads the snapshot if the file exists, without creating it otherwise.
	pub async fn read_existing(&self) -> Result<Option<Snapshot>, StoreError> {
		let contents = match fs::read_to_string(&self.path).await {
			Ok(contents) => contents,
			Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
			Err(source) => {
				return Err(StoreError::FileIo {
					path: self.path.clone(),
					source,
				});
			}
		};
		let mut snapshot: Snapshot = serde_json::from_str(&contents).map_err(|source| StoreError::MalformedFile {
			path: self.path.clone(),
			source,
		})?;
		snapshot.reopen_active_tickets();
		Ok(Some(snapshot))
	}

	/// Replaces the file contents with the given snapshot. Tickets in the active set are written as open.
	pub async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
		let mut snapshot = snapshot.clone();
		snapshot.reopen_active_tickets();
		let json = serde_json::to_string_pretty(&snapshot).map_err(StoreError::Encode)?;
		let tmp_path = self.tmp_path();
		fs::write(&tmp_path, json).await.map_err(|source| StoreError::FileIo {
			path: tmp_path.clone(),
			source,
		})?;
		fs::rename(&tmp_path, &self.path)
			.await
			.map_err(|source| StoreError::FileIo {
				path: self.path.clone(),
				source,
			})
	}

	fn tmp_path(&self) -> PathBuf {
		let mut file_name = self.path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
		file_name.push(".tmp");
		self.path.with_file_name(file_name)
	}
}
