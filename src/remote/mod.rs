// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::StoreError;
use crate::record::{ConfigEntry, ConfigKey, Snapshot, Ticket, TicketStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeSet;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// A helper's stored point balance
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HelperRecord {
	pub user_id: String,
	pub points: i64,
}

/// A stored ticket, open or archived
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TicketRecord {
	pub channel_id: String,
	pub ticket: Ticket,
	/// When the ticket was archived. Only set for closed tickets.
	pub closed_at: Option<DateTime<Utc>>,
}

impl TicketRecord {
	/// Builds the record for a ticket that's in the active set.
	pub fn active(channel_id: &str, ticket: &Ticket) -> Self {
		let mut ticket = ticket.clone();
		ticket.status = TicketStatus::Open;
		Self {
			channel_id: channel_id.to_owned(),
			ticket,
			closed_at: None,
		}
	}
}

/// A stored configuration value
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigRecord {
	pub key: String,
	pub value: Value,
}

impl ConfigRecord {
	pub fn from_entry(entry: &ConfigEntry) -> Result<Self, StoreError> {
		Ok(Self {
			key: entry.key().as_str().to_owned(),
			value: entry.to_value()?,
		})
	}
}

/// The per-record collections of a remote document store.
///
/// Every operation touches one collection. Nothing spans collections, so there's no atomicity across them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn find_helpers(&self) -> Result<Vec<HelperRecord>, StoreError>;

	/// Inserts the helper or overwrites the points of the existing one.
	async fn upsert_helper(&self, helper: &HelperRecord) -> Result<(), StoreError>;

	async fn delete_helpers(&self, user_ids: &[String]) -> Result<(), StoreError>;

	/// Gets stored tickets, optionally only those with the given status.
	async fn find_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<TicketRecord>, StoreError>;

	/// Inserts the ticket or replaces every field of the existing one with the same channel.
	async fn upsert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError>;

	/// Marks the tickets in the given channels closed as of `closed_at`.
	async fn close_tickets(&self, channel_ids: &[String], closed_at: DateTime<Utc>) -> Result<(), StoreError>;

	async fn find_configs(&self) -> Result<Vec<ConfigRecord>, StoreError>;

	async fn upsert_config(&self, config: &ConfigRecord) -> Result<(), StoreError>;

	async fn count_configs(&self) -> Result<u64, StoreError>;
}

/// Opens a document store from a connection string.
#[async_trait]
pub trait RemoteConnector: Send + Sync {
	async fn open(&self, database_url: &str) -> Result<Box<dyn DocumentStore>, StoreError>;
}

/// Snapshot load and save on top of a document store.
///
/// Saving reconciles the store against the snapshot: helpers missing from the snapshot are deleted and open tickets
/// missing from it are closed, keeping them for history.
pub struct RemoteBackend {
	store: Box<dyn DocumentStore>,
}

impl RemoteBackend {
	pub fn new(store: Box<dyn DocumentStore>) -> Self {
		Self { store }
	}

	pub async fn load(&self) -> Result<Snapshot, StoreError> {
		let helpers = self.store.find_helpers().await?;
		let tickets = self.store.find_tickets(Some(TicketStatus::Open)).await?;
		let configs = self.store.find_configs().await?;

		let mut snapshot = Snapshot::default();
		snapshot.helper_points = helpers
			.into_iter()
			.map(|helper| (helper.user_id, helper.points))
			.collect();
		snapshot.active_tickets = tickets
			.into_iter()
			.map(|record| (record.channel_id, record.ticket))
			.collect();
		for config in configs {
			let Some(key) = ConfigKey::from_name(&config.key) else {
				tracing::debug!(key = %config.key, "Ignoring unknown config entry");
				continue;
			};
			match ConfigEntry::from_value(key, config.value) {
				Ok(entry) => snapshot.apply_config(entry),
				Err(error) => {
					tracing::warn!(source = ?error, "Stored config value is unreadable; using the default");
				}
			}
		}
		Ok(snapshot)
	}

	/// Writes the snapshot. The first failing operation ends the save, leaving earlier writes in place.
	pub async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
		// Both reads finish before anything is deleted or closed.
		let stored_helpers: BTreeSet<String> = self
			.store
			.find_helpers()
			.await?
			.into_iter()
			.map(|helper| helper.user_id)
			.collect();
		let stored_active_tickets: BTreeSet<String> = self
			.store
			.find_tickets(Some(TicketStatus::Open))
			.await?
			.into_iter()
			.map(|record| record.channel_id)
			.collect();

		for (user_id, points) in &snapshot.helper_points {
			let helper = HelperRecord {
				user_id: user_id.clone(),
				points: *points,
			};
			self.store.upsert_helper(&helper).await?;
		}
		let removed_helpers: Vec<String> = stored_helpers
			.into_iter()
			.filter(|user_id| !snapshot.helper_points.contains_key(user_id))
			.collect();
		if !removed_helpers.is_empty() {
			self.store.delete_helpers(&removed_helpers).await?;
		}

		for (channel_id, ticket) in &snapshot.active_tickets {
			self.store.upsert_ticket(&TicketRecord::active(channel_id, ticket)).await?;
		}
		let closed_tickets: Vec<String> = stored_active_tickets
			.into_iter()
			.filter(|channel_id| !snapshot.active_tickets.contains_key(channel_id))
			.collect();
		if !closed_tickets.is_empty() {
			self.store.close_tickets(&closed_tickets, Utc::now()).await?;
		}

		for entry in snapshot.config_entries() {
			self.store.upsert_config(&ConfigRecord::from_entry(&entry)?).await?;
		}

		tracing::debug!(
			helpers = snapshot.helper_points.len(),
			removed_helpers = removed_helpers.len(),
			tickets = snapshot.active_tickets.len(),
			closed_tickets = closed_tickets.len(),
			"Saved snapshot to the remote database"
		);
		Ok(())
	}

	/// Gets archived tickets, oldest ticket number first.
	pub async fn closed_tickets(&self) -> Result<Vec<TicketRecord>, StoreError> {
		let mut tickets = self.store.find_tickets(Some(TicketStatus::Closed)).await?;
		tickets.sort_by_key(|record| record.ticket.ticket_number);
		Ok(tickets)
	}
}
