use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_CACHE_FILE;
use crate::HashstoreError;
use crate::HashstoreResult;
use crate::StoreOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"hashstore.toml",
	".hashstore.toml",
	".config/hashstore.toml",
];

/// A template and the output file generated from it.
///
/// ```toml
/// [[targets]]
/// template = "templates/readme.md"
/// output = "README.md"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Target {
	/// Path to the source template, relative to the project root.
	pub template: PathBuf,
	/// Path to the generated output, relative to the project root. This is
	/// also the cache key.
	pub output: PathBuf,
}

impl Target {
	pub fn new(template: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
		Self {
			template: template.into(),
			output: output.into(),
		}
	}
}

/// Configuration loaded from a `hashstore.toml` file.
///
/// ```toml
/// cache_file = ".hashstore.json"
///
/// [[targets]]
/// template = "templates/run.sh"
/// output = "bin/run.sh"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HashstoreConfig {
	/// Location of the cache snapshot, relative to the project root.
	#[serde(default = "default_cache_file")]
	pub cache_file: PathBuf,
	#[serde(default)]
	pub targets: Vec<Target>,
}

impl Default for HashstoreConfig {
	fn default() -> Self {
		Self {
			cache_file: default_cache_file(),
			targets: Vec::new(),
		}
	}
}

fn default_cache_file() -> PathBuf {
	PathBuf::from(DEFAULT_CACHE_FILE)
}

impl HashstoreConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> HashstoreResult<Option<HashstoreConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(
			path = %config_path.display(),
			targets = config.targets.len(),
			"loaded config"
		);

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> HashstoreResult<HashstoreConfig> {
		toml::from_str(content).map_err(|e| HashstoreError::ConfigParse(e.to_string()))
	}

	/// The store options for this config.
	pub fn store_options(&self, ignore_existing_snapshot: bool) -> StoreOptions {
		StoreOptions::new(self.cache_file.clone()).ignore_existing_snapshot(ignore_existing_snapshot)
	}
}
