// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod config;
#[cfg(feature = "postgres")]
pub mod database;
pub mod error;
pub mod file;
pub mod migration;
#[cfg(feature = "postgres")]
pub mod model;
pub mod record;
pub mod remote;
#[cfg(feature = "postgres")]
pub mod schema;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use record::{ConfigEntry, ConfigKey, Snapshot, Ticket, TicketStatus};
pub use store::{BackendKind, SnapshotStore};
