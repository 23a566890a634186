// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::record::{Ticket, TicketStatus};
use crate::remote::{ConfigRecord, HelperRecord, TicketRecord};
use crate::schema::{configs, helpers, tickets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde_json::Value;

#[derive(Clone, Copy, DbEnum, Debug, Eq, PartialEq)]
#[ExistingTypePath = "crate::schema::sql_types::TicketStatus"]
pub enum DbTicketStatus {
	Open,
	Closed,
}

impl From<TicketStatus> for DbTicketStatus {
	fn from(status: TicketStatus) -> Self {
		match status {
			TicketStatus::Open => Self::Open,
			TicketStatus::Closed => Self::Closed,
		}
	}
}

impl From<DbTicketStatus> for TicketStatus {
	fn from(status: DbTicketStatus) -> Self {
		match status {
			DbTicketStatus::Open => Self::Open,
			DbTicketStatus::Closed => Self::Closed,
		}
	}
}

/// The database representation of a helper's point balance
#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = helpers)]
pub struct Helper {
	/// The helper's Discord user ID
	pub user_id: String,
	pub points: i64,
}

impl From<Helper> for HelperRecord {
	fn from(helper: Helper) -> Self {
		Self {
			user_id: helper.user_id,
			points: helper.points,
		}
	}
}

impl From<&HelperRecord> for Helper {
	fn from(record: &HelperRecord) -> Self {
		Self {
			user_id: record.user_id.clone(),
			points: record.points,
		}
	}
}

/// The database representation of a ticket, whether open or archived
#[derive(AsChangeset, Insertable, Queryable, Selectable)]
#[diesel(table_name = tickets, primary_key(channel_id), treat_none_as_null = true)]
pub struct TicketRow {
	/// The ID of the channel the ticket lives in
	pub channel_id: String,
	/// The ticket's display number.
	///
	/// To get the bot-facing version of this more easily, use [Self::get_ticket_number].
	pub ticket_number: i64,
	/// The user who opened the ticket
	pub user_id: String,
	pub category: String,
	/// The form answers, stored as a JSON array
	pub fields: Value,
	pub selected_helpers: Vec<String>,
	pub completed_by: Option<String>,
	pub status: DbTicketStatus,
	/// When the ticket was closed. Cleared when a ticket is reopened.
	pub closed_at: Option<DateTime<Utc>>,
}

impl TicketRow {
	/// Gets the ticket's display number.
	///
	/// For the raw database representation, use [Self::ticket_number].
	pub fn get_ticket_number(&self) -> u64 {
		counter_from_database(self.ticket_number)
	}
}

impl From<TicketRow> for TicketRecord {
	fn from(row: TicketRow) -> Self {
		let ticket_number = row.get_ticket_number();
		let fields = match row.fields {
			Value::Array(fields) => fields,
			Value::Null => Vec::new(),
			other => vec![other],
		};
		Self {
			channel_id: row.channel_id,
			ticket: Ticket {
				ticket_number,
				user_id: row.user_id,
				category: row.category,
				fields,
				selected_helpers: row.selected_helpers.into_iter().collect(),
				completed_by: row.completed_by,
				status: row.status.into(),
			},
			closed_at: row.closed_at,
		}
	}
}

impl From<&TicketRecord> for TicketRow {
	fn from(record: &TicketRecord) -> Self {
		let ticket = &record.ticket;
		Self {
			channel_id: record.channel_id.clone(),
			ticket_number: database_counter_from(ticket.ticket_number),
			user_id: ticket.user_id.clone(),
			category: ticket.category.clone(),
			fields: Value::Array(ticket.fields.clone()),
			selected_helpers: ticket.selected_helpers.iter().cloned().collect(),
			completed_by: ticket.completed_by.clone(),
			status: ticket.status.into(),
			closed_at: record.closed_at,
		}
	}
}

/// The database representation of a configuration value
#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = configs)]
pub struct Config {
	pub key: String,
	pub value: Value,
}

impl From<Config> for ConfigRecord {
	fn from(config: Config) -> Self {
		Self {
			key: config.key,
			value: config.value,
		}
	}
}

impl From<&ConfigRecord> for Config {
	fn from(record: &ConfigRecord) -> Self {
		Self {
			key: record.key.clone(),
			value: record.value.clone(),
		}
	}
}

/// Converts a ticket number (unsigned) for Postgres use (signed)
pub fn database_counter_from(counter: u64) -> i64 {
	counter as i64
}

/// Converts a ticket number retrieved from the database (signed) back to its unsigned form
pub fn counter_from_database(database_counter: i64) -> u64 {
	database_counter as u64
}
