// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ConfigRecord, DocumentStore, HelperRecord, RemoteConnector, TicketRecord};
use crate::error::StoreError;
use crate::record::TicketStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Collections {
	helpers: BTreeMap<String, i64>,
	tickets: BTreeMap<String, TicketRecord>,
	configs: BTreeMap<String, Value>,
}

/// A document store held in process memory.
///
/// Clones share the same collections, so a clone handed out through [RemoteConnector::open] stays observable from
/// the original.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	collections: Arc<Mutex<Collections>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self, collection: &'static str, operation: &'static str) -> Result<MutexGuard<'_, Collections>, StoreError> {
		self.collections
			.lock()
			.map_err(|_| StoreError::remote(collection, operation, "store lock poisoned"))
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn find_helpers(&self) -> Result<Vec<HelperRecord>, StoreError> {
		let collections = self.lock("helpers", "find")?;
		Ok(collections
			.helpers
			.iter()
			.map(|(user_id, points)| HelperRecord {
				user_id: user_id.clone(),
				points: *points,
			})
			.collect())
	}

	async fn upsert_helper(&self, helper: &HelperRecord) -> Result<(), StoreError> {
		let mut collections = self.lock("helpers", "upsert")?;
		collections.helpers.insert(helper.user_id.clone(), helper.points);
		Ok(())
	}

	async fn delete_helpers(&self, user_ids: &[String]) -> Result<(), StoreError> {
		let mut collections = self.lock("helpers", "delete")?;
		for user_id in user_ids {
			collections.helpers.remove(user_id);
		}
		Ok(())
	}

	async fn find_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<TicketRecord>, StoreError> {
		let collections = self.lock("tickets", "find")?;
		Ok(collections
			.tickets
			.values()
			.filter(|record| status.is_none_or(|status| record.ticket.status == status))
			.cloned()
			.collect())
	}

	async fn upsert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError> {
		let mut collections = self.lock("tickets", "upsert")?;
		collections.tickets.insert(ticket.channel_id.clone(), ticket.clone());
		Ok(())
	}

	async fn close_tickets(&self, channel_ids: &[String], closed_at: DateTime<Utc>) -> Result<(), StoreError> {
		let mut collections = self.lock("tickets", "close")?;
		for channel_id in channel_ids {
			if let Some(record) = collections.tickets.get_mut(channel_id) {
				record.ticket.status = TicketStatus::Closed;
				record.closed_at = Some(closed_at);
			}
		}
		Ok(())
	}

	async fn find_configs(&self) -> Result<Vec<ConfigRecord>, StoreError> {
		let collections = self.lock("configs", "find")?;
		Ok(collections
			.configs
			.iter()
			.map(|(key, value)| ConfigRecord {
				key: key.clone(),
				value: value.clone(),
			})
			.collect())
	}

	async fn upsert_config(&self, config: &ConfigRecord) -> Result<(), StoreError> {
		let mut collections = self.lock("configs", "upsert")?;
		collections.configs.insert(config.key.clone(), config.value.clone());
		Ok(())
	}

	async fn count_configs(&self) -> Result<u64, StoreError> {
		let collections = self.lock("configs", "count")?;
		Ok(collections.configs.len() as u64)
	}
}

#[async_trait]
impl RemoteConnector for MemoryStore {
	async fn open(&self, _database_url: &str) -> Result<Box<dyn DocumentStore>, StoreError> {
		Ok(Box::new(self.clone()))
	}
}
