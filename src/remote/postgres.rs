// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ConfigRecord, DocumentStore, HelperRecord, RemoteConnector, TicketRecord};
use crate::database::{DbPool, connect_db, run_embedded_migrations};
use crate::error::StoreError;
use crate::model::{Config, DbTicketStatus, Helper, TicketRow};
use crate::record::TicketStatus;
use crate::schema::{configs, helpers, tickets};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

/// Opens [PgDocumentStore]s, creating the tables on first use.
#[derive(Clone, Copy, Debug, Default)]
pub struct PgConnector;

#[async_trait]
impl RemoteConnector for PgConnector {
	async fn open(&self, database_url: &str) -> Result<Box<dyn DocumentStore>, StoreError> {
		let db_connection_pool = connect_db(database_url)?;
		run_embedded_migrations(&db_connection_pool)?;
		Ok(Box::new(PgDocumentStore::new(db_connection_pool)))
	}
}

/// A document store with one table per collection.
#[derive(Clone, Debug)]
pub struct PgDocumentStore {
	db_connection_pool: DbPool,
}

impl PgDocumentStore {
	pub fn new(db_connection_pool: DbPool) -> Self {
		Self { db_connection_pool }
	}

	fn connection(
		&self,
		collection: &'static str,
		operation: &'static str,
	) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
		self.db_connection_pool
			.get()
			.map_err(|error| StoreError::remote(collection, operation, format!("couldn't get database connection: {}", error)))
	}
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
	async fn find_helpers(&self) -> Result<Vec<HelperRecord>, StoreError> {
		let mut db_connection = self.connection("helpers", "find")?;
		let helpers: Vec<Helper> = helpers::table
			.select(Helper::as_select())
			.load(&mut db_connection)
			.map_err(|error| StoreError::remote("helpers", "find", error))?;
		Ok(helpers.into_iter().map(HelperRecord::from).collect())
	}

	async fn upsert_helper(&self, helper: &HelperRecord) -> Result<(), StoreError> {
		let mut db_connection = self.connection("helpers", "upsert")?;
		diesel::insert_into(helpers::table)
			.values(Helper::from(helper))
			.on_conflict(helpers::user_id)
			.do_update()
			.set(helpers::points.eq(helper.points))
			.execute(&mut db_connection)
			.map_err(|error| StoreError::remote("helpers", "upsert", error))?;
		Ok(())
	}

	async fn delete_helpers(&self, user_ids: &[String]) -> Result<(), StoreError> {
		let mut db_connection = self.connection("helpers", "delete")?;
		diesel::delete(helpers::table)
			.filter(helpers::user_id.eq_any(user_ids))
			.execute(&mut db_connection)
			.map_err(|error| StoreError::remote("helpers", "delete", error))?;
		Ok(())
	}

	async fn find_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<TicketRecord>, StoreError> {
		let mut db_connection = self.connection("tickets", "find")?;
		let mut query = tickets::table.select(TicketRow::as_select()).into_boxed::<Pg>();
		if let Some(status) = status {
			query = query.filter(tickets::status.eq(DbTicketStatus::from(status)));
		}
		let rows: Vec<TicketRow> = query
			.order(tickets::ticket_number.asc())
			.load(&mut db_connection)
			.map_err(|error| StoreError::remote("tickets", "find", error))?;
		Ok(rows.into_iter().map(TicketRecord::from).collect())
	}

	async fn upsert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError> {
		let mut db_connection = self.connection("tickets", "upsert")?;
		let row = TicketRow::from(ticket);
		diesel::insert_into(tickets::table)
			.values(&row)
			.on_conflict(tickets::channel_id)
			.do_update()
			.set(&row)
			.execute(&mut db_connection)
			.map_err(|error| StoreError::remote("tickets", "upsert", error))?;
		Ok(())
	}

	async fn close_tickets(&self, channel_ids: &[String], closed_at: DateTime<Utc>) -> Result<(), StoreError> {
		let mut db_connection = self.connection("tickets", "close")?;
		diesel::update(tickets::table)
			.filter(tickets::channel_id.eq_any(channel_ids))
			.set((
				tickets::status.eq(DbTicketStatus::Closed),
				tickets::closed_at.eq(Some(closed_at)),
			))
			.execute(&mut db_connection)
			.map_err(|error| StoreError::remote("tickets", "close", error))?;
		Ok(())
	}

	async fn find_configs(&self) -> Result<Vec<ConfigRecord>, StoreError> {
		let mut db_connection = self.connection("configs", "find")?;
		let configs: Vec<Config> = configs::table
			.select(Config::as_select())
			.load(&mut db_connection)
			.map_err(|error| StoreError::remote("configs", "find", error))?;
		Ok(configs.into_iter().map(ConfigRecord::from).collect())
	}

	async fn upsert_config(&self, config: &ConfigRecord) -> Result<(), StoreError> {
		let mut db_connection = self.connection("configs", "upsert")?;
		diesel::insert_into(configs::table)
			.values(Config::from(config))
			.on_conflict(configs::key)
			.do_update()
			.set(configs::value.eq(config.value.clone()))
			.execute(&mut db_connection)
			.map_err(|error| StoreError::remote("configs", "upsert", error))?;
		Ok(())
	}

	async fn count_configs(&self) -> Result<u64, StoreError> {
		let mut db_connection = self.connection("configs", "count")?;
		let count: i64 = configs::table
			.count()
			.get_result(&mut db_connection)
			.map_err(|error| StoreError::remote("configs", "count", error))?;
		Ok(count.max(0) as u64)
	}
}
