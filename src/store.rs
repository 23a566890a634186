// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::file::FileBackend;
use crate::migration::{MigrationOutcome, migrate_file_to_remote};
use crate::record::Snapshot;
use crate::remote::{RemoteBackend, RemoteConnector, TicketRecord};
use std::fmt;
use std::path::PathBuf;

/// Which storage a [SnapshotStore] ended up using
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackendKind {
	File,
	Remote,
}

impl fmt::Display for BackendKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::File => write!(f, "local data file"),
			Self::Remote => write!(f, "remote database"),
		}
	}
}

enum Backend {
	File(FileBackend),
	Remote(RemoteBackend),
}

/// Loads and saves snapshots against whichever storage was available at startup.
///
/// Build one with [Self::connect] and hand it to whatever drives loading and saving.
pub struct SnapshotStore {
	backend: Backend,
}

impl SnapshotStore {
	/// Picks the storage for this run.
	///
	/// With a connection string configured, this tries the remote database once. On success, the data file is imported
	/// into it if the remote database is still empty. Without a connection string, or if connecting fails, the data
	/// file is used. Neither connection nor import failures are returned; they're logged.
	pub async fn connect<C>(config: &StoreConfig, connector: &C) -> Self
	where
		C: RemoteConnector + ?Sized,
	{
		let file = FileBackend::new(config.data_file.clone());
		let Some(database_url) = config.database_url.as_deref() else {
			tracing::info!(path = %file.path().display(), "No remote database configured; using the local data file");
			return Self::from_file(file);
		};

		let store = match connector.open(database_url).await {
			Ok(store) => store,
			Err(error) => {
				tracing::error!(source = ?error, "Remote database connection failed; falling back to the local data file");
				return Self::from_file(file);
			}
		};
		tracing::info!("Using the remote database");

		match migrate_file_to_remote(&file, store.as_ref()).await {
			Ok(MigrationOutcome::Migrated { helpers, tickets, configs }) => {
				tracing::info!(helpers, tickets, configs, "Imported the local data file into the remote database");
			}
			Ok(outcome) => tracing::debug!(?outcome, "Skipped importing the local data file"),
			Err(error) => {
				tracing::error!(source = ?error, "Failed to import the local data file into the remote database");
			}
		}

		Self {
			backend: Backend::Remote(RemoteBackend::new(store)),
		}
	}

	/// Uses the given data file without looking for a remote database.
	pub fn file_backed(data_file: impl Into<PathBuf>) -> Self {
		Self::from_file(FileBackend::new(data_file))
	}

	fn from_file(file: FileBackend) -> Self {
		Self {
			backend: Backend::File(file),
		}
	}

	pub fn backend_kind(&self) -> BackendKind {
		match self.backend {
			Backend::File(_) => BackendKind::File,
			Backend::Remote(_) => BackendKind::Remote,
		}
	}

	/// Gets the current snapshot.
	///
	/// If the remote database can't be read, the default snapshot is returned instead. Data file errors are returned,
	/// since a data file that can't be read or parsed won't fix itself.
	pub async fn load_snapshot(&self) -> Result<Snapshot, StoreError> {
		match &self.backend {
			Backend::File(file) => file.load().await,
			Backend::Remote(remote) => match remote.load().await {
				Ok(snapshot) => Ok(snapshot),
				Err(error) => {
					tracing::error!(source = ?error, "Failed to load data from the remote database; using defaults");
					Ok(Snapshot::default())
				}
			},
		}
	}

	/// Stores the snapshot.
	///
	/// A failed remote save may have applied some of its writes; nothing is rolled back.
	pub async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
		match &self.backend {
			Backend::File(file) => file.save(snapshot).await,
			Backend::Remote(remote) => {
				let result = remote.save(snapshot).await;
				if let Err(error) = &result {
					tracing::error!(source = ?error, "Failed to save data to the remote database");
				}
				result
			}
		}
	}

	/// Gets tickets that have been closed. The data file keeps no closed tickets, so this is always empty for it.
	pub async fn closed_tickets(&self) -> Result<Vec<TicketRecord>, StoreError> {
		match &self.backend {
			Backend::File(_) => Ok(Vec::new()),
			Backend::Remote(remote) => remote.closed_tickets().await,
		}
	}
}
