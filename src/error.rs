// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the snapshot store and its backends.
#[derive(Debug, Diagnostic, Error)]
pub enum StoreError {
	/// The local data file couldn't be read or written.
	#[error("couldn't access the data file at {}", .path.display())]
	#[diagnostic(code(ticket_store::file_io))]
	FileIo {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The local data file exists but doesn't contain a valid snapshot.
	#[error("the data file at {} is not a valid snapshot", .path.display())]
	#[diagnostic(
		code(ticket_store::malformed_file),
		help("fix or remove the file; it is recreated with defaults when missing")
	)]
	MalformedFile {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("couldn't encode the snapshot")]
	#[diagnostic(code(ticket_store::encode))]
	Encode(#[source] serde_json::Error),

	/// The remote database couldn't be opened.
	#[error("couldn't connect to the remote database: {0}")]
	#[diagnostic(code(ticket_store::connection))]
	Connection(String),

	/// The remote database was reached, but its tables couldn't be created.
	#[error("couldn't set up the remote tables")]
	#[diagnostic(code(ticket_store::table_setup))]
	TableSetup(#[source] Box<dyn std::error::Error + Send + Sync>),

	/// A single operation against a remote collection failed.
	#[error("remote {operation} on `{collection}` failed: {message}")]
	#[diagnostic(code(ticket_store::remote))]
	Remote {
		collection: &'static str,
		operation: &'static str,
		message: String,
	},

	#[error("config entry `{key}` holds a value of the wrong shape")]
	#[diagnostic(code(ticket_store::config_value))]
	InvalidConfigValue {
		key: &'static str,
		#[source]
		source: serde_json::Error,
	},
}

impl StoreError {
	pub(crate) fn remote(collection: &'static str, operation: &'static str, message: impl ToString) -> Self {
		Self::Remote {
			collection,
			operation,
			message: message.to_string(),
		}
	}
}
