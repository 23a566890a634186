// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ticket_store::config::{DEFAULT_DATA_FILE, parse_config};
use ticket_store::remote::postgres::PgConnector;
use ticket_store::{SnapshotStore, StoreConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let config = match std::env::args().nth(1) {
		Some(config_path) => parse_config(&config_path).await?,
		None => StoreConfig::from_env(DEFAULT_DATA_FILE),
	};

	let store = SnapshotStore::connect(&config, &PgConnector).await;
	let snapshot = store.load_snapshot().await?;
	let closed_tickets = store.closed_tickets().await?;

	println!("Storage: {}", store.backend_kind());
	println!("Helpers: {}", snapshot.helper_points.len());
	println!("Active tickets: {}", snapshot.active_tickets.len());
	println!("Closed tickets: {}", closed_tickets.len());
	println!("Ticket counter: {}", snapshot.ticket_counter);

	Ok(())
}
