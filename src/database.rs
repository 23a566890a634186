// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::StoreError;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::time::Duration;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// How long to wait for the first connection before falling back to the data file
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool. Building fails if no connection can be established.
pub fn connect_db(database_url: &str) -> Result<DbPool, StoreError> {
	let manager: ConnectionManager<PgConnection> = ConnectionManager::new(database_url);
	Pool::builder()
		.test_on_check_out(true)
		.connection_timeout(CONNECT_TIMEOUT)
		.build(manager)
		.map_err(|error| StoreError::Connection(error.to_string()))
}

/// Creates the store's tables if they don't exist yet.
pub fn run_embedded_migrations(db_connection_pool: &DbPool) -> Result<(), StoreError> {
	let mut db_connection = db_connection_pool
		.get()
		.map_err(|error| StoreError::Connection(error.to_string()))?;
	db_connection
		.run_pending_migrations(MIGRATIONS)
		.map_err(StoreError::TableSetup)?;
	Ok(())
}
