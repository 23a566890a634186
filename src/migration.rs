// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::StoreError;
use crate::file::FileBackend;
use crate::remote::{ConfigRecord, DocumentStore, HelperRecord, TicketRecord};

/// What happened when importing the data file into a remote store
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MigrationOutcome {
	/// The remote store already had configuration, so nothing was imported.
	AlreadyPopulated,
	/// There was no data file to import.
	NoLocalData,
	Migrated { helpers: usize, tickets: usize, configs: usize },
}

/// Copies the contents of the data file into a remote store that has never been written to.
///
/// A store counts as written to once it holds any config entry. Config entries are written last, so an import that
/// fails partway leaves the store eligible for another attempt.
pub async fn migrate_file_to_remote(
	file: &FileBackend,
	store: &dyn DocumentStore,
) -> Result<MigrationOutcome, StoreError> {
	if store.count_configs().await? > 0 {
		return Ok(MigrationOutcome::AlreadyPopulated);
	}
	let Some(snapshot) = file.read_existing().await? else {
		return Ok(MigrationOutcome::NoLocalData);
	};

	tracing::info!(path = %file.path().display(), "Importing the data file into the remote database");
	for (user_id, points) in &snapshot.helper_points {
		let helper = HelperRecord {
			user_id: user_id.clone(),
			points: *points,
		};
		store.upsert_helper(&helper).await?;
	}
	for (channel_id, ticket) in &snapshot.active_tickets {
		store.upsert_ticket(&TicketRecord::active(channel_id, ticket)).await?;
	}
	let entries = snapshot.config_entries();
	for entry in &entries {
		store.upsert_config(&ConfigRecord::from_entry(entry)?).await?;
	}

	Ok(MigrationOutcome::Migrated {
		helpers: snapshot.helper_points.len(),
		tickets: snapshot.active_tickets.len(),
		configs: entries.len(),
	})
}
