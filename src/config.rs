// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kdl::KdlDocument;
use miette::{IntoDiagnostic, Result, miette};
use std::env;
use std::path::PathBuf;
use tokio::fs::read_to_string;

/// The environment variable holding the remote database connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Where the snapshot store keeps its data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreConfig {
	/// Path of the local data file, used as the store when there's no remote database and as the import source when
	/// a remote database is first connected
	pub data_file: PathBuf,
	/// Connection string for the remote database. With none, the data file is the store.
	pub database_url: Option<String>,
}

impl StoreConfig {
	/// Builds a configuration that only uses the data file.
	pub fn new(data_file: impl Into<PathBuf>) -> Self {
		Self {
			data_file: data_file.into(),
			database_url: None,
		}
	}

	pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
		self.database_url = non_empty(Some(database_url.into()));
		self
	}

	/// Builds a configuration taking the connection string from [DATABASE_URL_VAR].
	pub fn from_env(data_file: impl Into<PathBuf>) -> Self {
		Self {
			data_file: data_file.into(),
			database_url: non_empty(env::var(DATABASE_URL_VAR).ok()),
		}
	}
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self::new(DEFAULT_DATA_FILE)
	}
}

/// Reads a KDL config file. A connection string in [DATABASE_URL_VAR] takes precedence over the file's.
pub async fn parse_config(config_path: &str) -> Result<StoreConfig> {
	let config_file_contents = read_to_string(config_path).await.into_diagnostic()?;
	let mut config = parse_config_document(&config_file_contents)?;
	if let Some(database_url) = non_empty(env::var(DATABASE_URL_VAR).ok()) {
		config.database_url = Some(database_url);
	}
	Ok(config)
}

/// Parses config file contents, e.g.
///
/// ```kdl
/// data_file "/var/lib/tracker/data.json"
/// database_url "postgres://tracker@localhost/tracker"
/// ```
///
/// Both nodes are optional.
pub fn parse_config_document(contents: &str) -> Result<StoreConfig> {
	let document: KdlDocument = contents.parse()?;
	let data_file = match string_argument(&document, "data_file")? {
		Some(path) => PathBuf::from(path),
		None => PathBuf::from(DEFAULT_DATA_FILE),
	};
	let database_url = non_empty(string_argument(&document, "database_url")?);
	Ok(StoreConfig { data_file, database_url })
}

fn string_argument(document: &KdlDocument, name: &str) -> Result<Option<String>> {
	let Some(value) = document.get_arg(name) else {
		return Ok(None);
	};
	match value.as_string() {
		Some(value) => Ok(Some(value.to_owned())),
		None => Err(miette!("`{}` must be a string", name)),
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}
