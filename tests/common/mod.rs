// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, json};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use ticket_store::remote::memory::MemoryStore;
use ticket_store::remote::{ConfigRecord, DocumentStore, HelperRecord, RemoteConnector, TicketRecord};
use ticket_store::{Snapshot, StoreError, Ticket, TicketStatus};

pub fn ticket(ticket_number: u64, user_id: &str) -> Ticket {
	Ticket {
		ticket_number,
		user_id: user_id.to_owned(),
		category: String::from("Others"),
		fields: Vec::new(),
		selected_helpers: BTreeSet::new(),
		completed_by: None,
		status: TicketStatus::Open,
	}
}

/// A snapshot with a helper, a ticket, and every config value changed from its default
pub fn populated_snapshot() -> Snapshot {
	let mut helper_ticket = ticket(7, "u1");
	helper_ticket.category = String::from("Temple Shrine");
	helper_ticket.fields = vec![json!({ "name": "UID", "value": "800123456" })];
	helper_ticket.selected_helpers = BTreeSet::from([String::from("h1"), String::from("h2")]);
	helper_ticket.completed_by = Some(String::from("h1"));

	Snapshot {
		helper_points: BTreeMap::from([(String::from("h1"), 12), (String::from("h2"), 3)]),
		active_tickets: BTreeMap::from([(String::from("c1"), helper_ticket), (String::from("c2"), ticket(8, "u2"))]),
		ticket_counter: 8,
		category_points: BTreeMap::from([(String::from("Temple Shrine"), 3), (String::from("Others"), 1)]),
		ticket_channels: BTreeMap::from([(String::from("support"), String::from("ch-support"))]),
		logs_channel: Some(String::from("ch-logs")),
		allowed_completion_roles: BTreeSet::from([String::from("r-helper")]),
		allowed_creation_roles: BTreeSet::from([String::from("r-member"), String::from("r-vip")]),
		extra: Map::new(),
	}
}

/// The snapshot from the documented example: one helper, one ticket, mostly default config
pub fn example_snapshot() -> Snapshot {
	let snapshot: Snapshot = serde_json::from_value(json!({
		"helperPoints": { "u1": 3 },
		"activeTickets": {
			"c1": {
				"ticketNumber": 7,
				"userId": "u1",
				"category": "Others",
				"fields": [],
				"selectedHelpers": [],
				"completedBy": null,
				"status": "open"
			}
		},
		"ticketCounter": 7,
		"categoryPoints": { "Others": 1 },
		"ticketChannels": {},
		"logsChannel": null,
		"allowedCompletionRoles": [],
		"allowedCreationRoles": []
	}))
	.expect("example snapshot");
	snapshot
}

/// Wraps a [MemoryStore], failing chosen operations.
#[derive(Clone)]
pub struct FaultyStore {
	pub inner: MemoryStore,
	pub fail_reads: Arc<AtomicBool>,
	pub fail_ticket_writes: Arc<AtomicBool>,
	/// Config upserts that succeed before the rest start failing. `usize::MAX` means never fail.
	pub config_writes_allowed: Arc<AtomicUsize>,
}

impl FaultyStore {
	pub fn new(inner: MemoryStore) -> Self {
		Self {
			inner,
			fail_reads: Arc::new(AtomicBool::new(false)),
			fail_ticket_writes: Arc::new(AtomicBool::new(false)),
			config_writes_allowed: Arc::new(AtomicUsize::new(usize::MAX)),
		}
	}

	fn check_read(&self, collection: &'static str) -> Result<(), StoreError> {
		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(StoreError::Remote {
				collection,
				operation: "find",
				message: String::from("injected read failure"),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl DocumentStore for FaultyStore {
	async fn find_helpers(&self) -> Result<Vec<HelperRecord>, StoreError> {
		self.check_read("helpers")?;
		self.inner.find_helpers().await
	}

	async fn upsert_helper(&self, helper: &HelperRecord) -> Result<(), StoreError> {
		self.inner.upsert_helper(helper).await
	}

	async fn delete_helpers(&self, user_ids: &[String]) -> Result<(), StoreError> {
		self.inner.delete_helpers(user_ids).await
	}

	async fn find_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<TicketRecord>, StoreError> {
		self.check_read("tickets")?;
		self.inner.find_tickets(status).await
	}

	async fn upsert_ticket(&self, ticket: &TicketRecord) -> Result<(), StoreError> {
		if self.fail_ticket_writes.load(Ordering::SeqCst) {
			return Err(StoreError::Remote {
				collection: "tickets",
				operation: "upsert",
				message: String::from("injected write failure"),
			});
		}
		self.inner.upsert_ticket(ticket).await
	}

	async fn close_tickets(&self, channel_ids: &[String], closed_at: DateTime<Utc>) -> Result<(), StoreError> {
		self.inner.close_tickets(channel_ids, closed_at).await
	}

	async fn find_configs(&self) -> Result<Vec<ConfigRecord>, StoreError> {
		self.check_read("configs")?;
		self.inner.find_configs().await
	}

	async fn upsert_config(&self, config: &ConfigRecord) -> Result<(), StoreError> {
		let allowed = self.config_writes_allowed.load(Ordering::SeqCst);
		if allowed == 0 {
			return Err(StoreError::Remote {
				collection: "configs",
				operation: "upsert",
				message: String::from("injected write failure"),
			});
		}
		if allowed != usize::MAX {
			self.config_writes_allowed.store(allowed - 1, Ordering::SeqCst);
		}
		self.inner.upsert_config(config).await
	}

	async fn count_configs(&self) -> Result<u64, StoreError> {
		self.inner.count_configs().await
	}
}

#[async_trait]
impl RemoteConnector for FaultyStore {
	async fn open(&self, _database_url: &str) -> Result<Box<dyn DocumentStore>, StoreError> {
		Ok(Box::new(self.clone()))
	}
}

/// A connector that can never reach its database and counts how often it was asked to
#[derive(Default)]
pub struct UnreachableConnector {
	pub attempts: AtomicUsize,
}

#[async_trait]
impl RemoteConnector for UnreachableConnector {
	async fn open(&self, _database_url: &str) -> Result<Box<dyn DocumentStore>, StoreError> {
		self.attempts.fetch_add(1, Ordering::SeqCst);
		Err(StoreError::Connection(String::from("connection refused")))
	}
}
