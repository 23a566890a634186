// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::StoreError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Categories every tracker starts with, each worth one point.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
	"Ultra Weeklies",
	"Ultra Speaker",
	"Temple Shrine",
	"Ultra Dailies",
	"Spamming",
	"Others",
];

/// Gets the built-in category point table.
pub fn default_category_points() -> BTreeMap<String, i64> {
	DEFAULT_CATEGORIES
		.iter()
		.map(|category| (String::from(*category), 1))
		.collect()
}

/// The full state exchanged between the bot and the store.
///
/// Any of the configuration fields may be missing from stored data; they resolve to the built-in defaults on load.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
	/// Point balance per helper user ID
	#[serde(default, deserialize_with = "null_as_default")]
	pub helper_points: BTreeMap<String, i64>,
	/// Open tickets keyed by the ID of the channel each ticket lives in
	#[serde(default, deserialize_with = "null_as_default")]
	pub active_tickets: BTreeMap<String, Ticket>,
	/// The number of the most recently opened ticket
	#[serde(default, deserialize_with = "null_as_default")]
	pub ticket_counter: u64,
	/// Points awarded per completed ticket in each category
	#[serde(default = "default_category_points", deserialize_with = "null_as_default_category_points")]
	pub category_points: BTreeMap<String, i64>,
	/// Channel ID per ticket channel type
	#[serde(default, deserialize_with = "null_as_default")]
	pub ticket_channels: BTreeMap<String, String>,
	#[serde(default)]
	pub logs_channel: Option<String>,
	/// Roles allowed to mark tickets completed
	#[serde(default, deserialize_with = "null_as_default")]
	pub allowed_completion_roles: BTreeSet<String>,
	/// Roles allowed to open tickets
	#[serde(default, deserialize_with = "null_as_default")]
	pub allowed_creation_roles: BTreeSet<String>,
	/// Top-level keys this crate doesn't know about. The data file keeps them; the remote database doesn't.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Default for Snapshot {
	fn default() -> Self {
		Self {
			helper_points: BTreeMap::new(),
			active_tickets: BTreeMap::new(),
			ticket_counter: 0,
			category_points: default_category_points(),
			ticket_channels: BTreeMap::new(),
			logs_channel: None,
			allowed_completion_roles: BTreeSet::new(),
			allowed_creation_roles: BTreeSet::new(),
			extra: Map::new(),
		}
	}
}

impl Snapshot {
	/// Splits the configuration half of the snapshot into its individual entries.
	pub fn config_entries(&self) -> Vec<ConfigEntry> {
		vec![
			ConfigEntry::TicketCounter(self.ticket_counter),
			ConfigEntry::CategoryPoints(self.category_points.clone()),
			ConfigEntry::TicketChannels(self.ticket_channels.clone()),
			ConfigEntry::LogsChannel(self.logs_channel.clone()),
			ConfigEntry::AllowedCompletionRoles(self.allowed_completion_roles.clone()),
			ConfigEntry::AllowedCreationRoles(self.allowed_creation_roles.clone()),
		]
	}

	/// Marks every ticket in the active set open, since only open tickets can be active.
	pub fn reopen_active_tickets(&mut self) {
		for ticket in self.active_tickets.values_mut() {
			ticket.status = TicketStatus::Open;
		}
	}

	/// Overwrites the configuration field the entry belongs to.
	pub fn apply_config(&mut self, entry: ConfigEntry) {
		match entry {
			ConfigEntry::TicketCounter(counter) => self.ticket_counter = counter,
			ConfigEntry::CategoryPoints(points) => self.category_points = points,
			ConfigEntry::TicketChannels(channels) => self.ticket_channels = channels,
			ConfigEntry::LogsChannel(channel) => self.logs_channel = channel,
			ConfigEntry::AllowedCompletionRoles(roles) => self.allowed_completion_roles = roles,
			ConfigEntry::AllowedCreationRoles(roles) => self.allowed_creation_roles = roles,
		}
	}
}

/// A support ticket as the bot tracks it. The channel ID it's keyed by lives outside the ticket.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
	/// Display number assigned by the bot when the ticket was opened
	pub ticket_number: u64,
	/// The user who opened the ticket
	pub user_id: String,
	pub category: String,
	/// Answers the user gave when opening the ticket, kept in order and otherwise uninterpreted
	#[serde(default, deserialize_with = "null_as_default")]
	pub fields: Vec<Value>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub selected_helpers: BTreeSet<String>,
	#[serde(default)]
	pub completed_by: Option<String>,
	#[serde(default)]
	pub status: TicketStatus,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
	#[default]
	#[serde(alias = "active")]
	Open,
	Closed,
}

/// Names of the stored configuration values.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ConfigKey {
	TicketCounter,
	CategoryPoints,
	TicketChannels,
	LogsChannel,
	AllowedCompletionRoles,
	AllowedCreationRoles,
}

impl ConfigKey {
	pub const ALL: [ConfigKey; 6] = [
		ConfigKey::TicketCounter,
		ConfigKey::CategoryPoints,
		ConfigKey::TicketChannels,
		ConfigKey::LogsChannel,
		ConfigKey::AllowedCompletionRoles,
		ConfigKey::AllowedCreationRoles,
	];

	/// The key under which the value is stored
	pub fn as_str(self) -> &'static str {
		match self {
			Self::TicketCounter => "ticketCounter",
			Self::CategoryPoints => "categoryPoints",
			Self::TicketChannels => "ticketChannels",
			Self::LogsChannel => "logsChannel",
			Self::AllowedCompletionRoles => "allowedCompletionRoles",
			Self::AllowedCreationRoles => "allowedCreationRoles",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|key| key.as_str() == name)
	}
}

/// A single typed configuration value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigEntry {
	TicketCounter(u64),
	CategoryPoints(BTreeMap<String, i64>),
	TicketChannels(BTreeMap<String, String>),
	LogsChannel(Option<String>),
	AllowedCompletionRoles(BTreeSet<String>),
	AllowedCreationRoles(BTreeSet<String>),
}

impl ConfigEntry {
	pub fn key(&self) -> ConfigKey {
		match self {
			Self::TicketCounter(_) => ConfigKey::TicketCounter,
			Self::CategoryPoints(_) => ConfigKey::CategoryPoints,
			Self::TicketChannels(_) => ConfigKey::TicketChannels,
			Self::LogsChannel(_) => ConfigKey::LogsChannel,
			Self::AllowedCompletionRoles(_) => ConfigKey::AllowedCompletionRoles,
			Self::AllowedCreationRoles(_) => ConfigKey::AllowedCreationRoles,
		}
	}

	/// Encodes the value for storage.
	pub fn to_value(&self) -> Result<Value, StoreError> {
		let encoded = match self {
			Self::TicketCounter(counter) => serde_json::to_value(counter),
			Self::CategoryPoints(points) => serde_json::to_value(points),
			Self::TicketChannels(channels) => serde_json::to_value(channels),
			Self::LogsChannel(channel) => serde_json::to_value(channel),
			Self::AllowedCompletionRoles(roles) | Self::AllowedCreationRoles(roles) => serde_json::to_value(roles),
		};
		encoded.map_err(|source| StoreError::InvalidConfigValue {
			key: self.key().as_str(),
			source,
		})
	}

	/// Decodes a stored value. A stored `null` resolves to the key's default.
	pub fn from_value(key: ConfigKey, value: Value) -> Result<Self, StoreError> {
		let decoded = match key {
			ConfigKey::TicketCounter => {
				serde_json::from_value::<Option<u64>>(value).map(|counter| Self::TicketCounter(counter.unwrap_or_default()))
			}
			ConfigKey::CategoryPoints => serde_json::from_value::<Option<BTreeMap<String, i64>>>(value)
				.map(|points| Self::CategoryPoints(points.unwrap_or_else(default_category_points))),
			ConfigKey::TicketChannels => serde_json::from_value::<Option<BTreeMap<String, String>>>(value)
				.map(|channels| Self::TicketChannels(channels.unwrap_or_default())),
			ConfigKey::LogsChannel => serde_json::from_value::<Option<String>>(value).map(Self::LogsChannel),
			ConfigKey::AllowedCompletionRoles => serde_json::from_value::<Option<BTreeSet<String>>>(value)
				.map(|roles| Self::AllowedCompletionRoles(roles.unwrap_or_default())),
			ConfigKey::AllowedCreationRoles => serde_json::from_value::<Option<BTreeSet<String>>>(value)
				.map(|roles| Self::AllowedCreationRoles(roles.unwrap_or_default())),
		};
		decoded.map_err(|source| StoreError::InvalidConfigValue {
			key: key.as_str(),
			source,
		})
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_category_points<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::deserialize(deserializer)?.unwrap_or_else(default_category_points))
}
