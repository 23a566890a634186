// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{FaultyStore, UnreachableConnector, example_snapshot, populated_snapshot, ticket};
use std::fs;
use std::sync::atomic::Ordering;
use tempfile::tempdir;
use ticket_store::file::FileBackend;
use ticket_store::remote::DocumentStore;
use ticket_store::remote::memory::MemoryStore;
use ticket_store::{BackendKind, Snapshot, SnapshotStore, StoreConfig, StoreError, TicketStatus};

#[tokio::test]
async fn no_database_url_means_the_file_without_connecting() {
	let dir = tempdir().expect("tempdir");
	let config = StoreConfig::new(dir.path().join("data.json"));
	let connector = UnreachableConnector::default();

	let store = SnapshotStore::connect(&config, &connector).await;
	assert_eq!(store.backend_kind(), BackendKind::File);
	assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_database_falls_back_to_the_file() {
	let dir = tempdir().expect("tempdir");
	let config = StoreConfig::new(dir.path().join("data.json")).with_database_url("postgres://tracker@nowhere/tracker");
	let connector = UnreachableConnector::default();

	let store = SnapshotStore::connect(&config, &connector).await;
	assert_eq!(store.backend_kind(), BackendKind::File);
	assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);

	let snapshot = populated_snapshot();
	store.save_snapshot(&snapshot).await.expect("save");
	assert_eq!(store.load_snapshot().await.expect("load"), snapshot);
}

#[tokio::test]
async fn fresh_file_store_loads_defaults_and_creates_the_file() {
	let dir = tempdir().expect("tempdir");
	let path = dir.path().join("data.json");
	let store = SnapshotStore::file_backed(&path);

	assert_eq!(store.load_snapshot().await.expect("load"), Snapshot::default());
	let on_disk: Snapshot = serde_json::from_str(&fs::read_to_string(&path).expect("read file")).expect("parse file");
	assert_eq!(on_disk, Snapshot::default());
	assert!(store.closed_tickets().await.expect("closed tickets").is_empty());
}

#[tokio::test]
async fn fresh_remote_store_loads_defaults() {
	let dir = tempdir().expect("tempdir");
	let config = StoreConfig::new(dir.path().join("data.json")).with_database_url("memory://");
	let remote = MemoryStore::new();

	let store = SnapshotStore::connect(&config, &remote).await;
	assert_eq!(store.backend_kind(), BackendKind::Remote);
	assert_eq!(store.load_snapshot().await.expect("load"), Snapshot::default());
	assert!(!dir.path().join("data.json").exists());
}

#[tokio::test]
async fn snapshots_round_trip_on_both_backends() {
	let dir = tempdir().expect("tempdir");
	let file_store = SnapshotStore::file_backed(dir.path().join("data.json"));
	let config = StoreConfig::new(dir.path().join("unused.json")).with_database_url("memory://");
	let remote_store = SnapshotStore::connect(&config, &MemoryStore::new()).await;

	for store in [&file_store, &remote_store] {
		for snapshot in [populated_snapshot(), example_snapshot()] {
			store.save_snapshot(&snapshot).await.expect("save");
			assert_eq!(
				store.load_snapshot().await.expect("load"),
				snapshot,
				"round trip on {}",
				store.backend_kind()
			);
		}

		let mut closed_in_active_set = example_snapshot();
		if let Some(ticket) = closed_in_active_set.active_tickets.get_mut("c1") {
			ticket.status = TicketStatus::Closed;
		}
		store.save_snapshot(&closed_in_active_set).await.expect("save closed status");
		let loaded = store.load_snapshot().await.expect("load closed status");
		assert_eq!(loaded, example_snapshot(), "active ticket reopened on {}", store.backend_kind());
		assert_eq!(loaded.active_tickets["c1"].status, TicketStatus::Open);
	}
}

#[tokio::test]
async fn connecting_imports_the_existing_data_file() {
	let dir = tempdir().expect("tempdir");
	let path = dir.path().join("data.json");
	let snapshot = populated_snapshot();
	FileBackend::new(&path).save(&snapshot).await.expect("seed file");

	let remote = MemoryStore::new();
	let config = StoreConfig::new(&path).with_database_url("memory://");
	let store = SnapshotStore::connect(&config, &remote).await;
	assert_eq!(store.load_snapshot().await.expect("load"), snapshot);

	// Changes made after the import must survive reconnecting with the same file around.
	let mut updated = snapshot.clone();
	updated.helper_points.insert(String::from("h3"), 1);
	store.save_snapshot(&updated).await.expect("save");

	let reconnected = SnapshotStore::connect(&config, &remote).await;
	assert_eq!(reconnected.load_snapshot().await.expect("reload"), updated);
}

#[tokio::test]
async fn remote_read_failure_yields_defaults() {
	let dir = tempdir().expect("tempdir");
	let faulty = FaultyStore::new(MemoryStore::new());
	let config = StoreConfig::new(dir.path().join("data.json")).with_database_url("memory://");
	let store = SnapshotStore::connect(&config, &faulty).await;

	store.save_snapshot(&populated_snapshot()).await.expect("save");
	faulty.fail_reads.store(true, Ordering::SeqCst);

	assert_eq!(store.load_snapshot().await.expect("load"), Snapshot::default());
}

#[tokio::test]
async fn remote_write_failure_is_returned() {
	let dir = tempdir().expect("tempdir");
	let faulty = FaultyStore::new(MemoryStore::new());
	faulty.fail_ticket_writes.store(true, Ordering::SeqCst);
	let config = StoreConfig::new(dir.path().join("data.json")).with_database_url("memory://");
	let store = SnapshotStore::connect(&config, &faulty).await;

	let result = store.save_snapshot(&example_snapshot()).await;
	assert!(matches!(result, Err(StoreError::Remote { .. })));
}

#[tokio::test]
async fn failed_import_still_leaves_the_remote_store_in_use() {
	let dir = tempdir().expect("tempdir");
	let path = dir.path().join("data.json");
	FileBackend::new(&path).save(&populated_snapshot()).await.expect("seed file");

	let faulty = FaultyStore::new(MemoryStore::new());
	faulty.config_writes_allowed.store(0, Ordering::SeqCst);
	let config = StoreConfig::new(&path).with_database_url("memory://");
	let store = SnapshotStore::connect(&config, &faulty).await;
	assert_eq!(store.backend_kind(), BackendKind::Remote);
}

#[tokio::test]
async fn dropped_ticket_is_never_left_active() {
	let dir = tempdir().expect("tempdir");
	let remote = MemoryStore::new();
	let config = StoreConfig::new(dir.path().join("data.json")).with_database_url("memory://");
	let store = SnapshotStore::connect(&config, &remote).await;

	let mut snapshot = Snapshot::default();
	snapshot.active_tickets.insert(String::from("A"), ticket(1, "u1"));
	snapshot.active_tickets.insert(String::from("B"), ticket(2, "u1"));
	store.save_snapshot(&snapshot).await.expect("save both");
	snapshot.active_tickets.remove("B");
	store.save_snapshot(&snapshot).await.expect("save one");

	let stored = remote.find_tickets(None).await.expect("tickets");
	let b = stored.iter().find(|record| record.channel_id == "B").expect("B kept");
	assert_eq!(b.ticket.status, TicketStatus::Closed);

	let closed = store.closed_tickets().await.expect("closed tickets");
	assert_eq!(closed.len(), 1);
	assert_eq!(closed[0].channel_id, "B");
}
