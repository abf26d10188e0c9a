use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::FileSystem;
use crate::Fingerprint;
use crate::HashstoreError;
use crate::HashstoreResult;

/// Default location of the cache snapshot, relative to the project root.
pub const DEFAULT_CACHE_FILE: &str = ".hashstore.json";

/// Options controlling how a [`HashStore`] is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
	/// Where the snapshot is loaded from and persisted to.
	pub cache_file: PathBuf,
	/// Start from an empty record even when a snapshot exists. Every file is
	/// then considered changed on this run.
	pub ignore_existing_snapshot: bool,
}

impl Default for StoreOptions {
	fn default() -> Self {
		Self {
			cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
			ignore_existing_snapshot: false,
		}
	}
}

impl StoreOptions {
	pub fn new(cache_file: impl Into<PathBuf>) -> Self {
		Self {
			cache_file: cache_file.into(),
			ignore_existing_snapshot: false,
		}
	}

	#[must_use]
	pub fn ignore_existing_snapshot(mut self, ignore: bool) -> Self {
		self.ignore_existing_snapshot = ignore;
		self
	}
}

/// The cache key used for an output path.
pub fn path_key(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

/// Maps output files to the fingerprint last recorded for them.
///
/// A store is opened once per run, mutated while files are checked, and
/// written back wholesale with [`HashStore::persist`] or
/// [`HashStore::close`].
#[derive(Debug)]
pub struct HashStore<F: FileSystem> {
	fs: F,
	cache_file: PathBuf,
	hashes: BTreeMap<String, Fingerprint>,
}

impl<F: FileSystem> HashStore<F> {
	/// Open the store, loading the snapshot at `options.cache_file` unless it
	/// is missing or `options.ignore_existing_snapshot` is set.
	///
	/// A snapshot that exists but cannot be read or parsed is an error.
	pub fn open(fs: F, options: &StoreOptions) -> HashstoreResult<Self> {
		let hashes = if options.ignore_existing_snapshot {
			tracing::info!(
				cache_file = %options.cache_file.display(),
				"ignoring existing cache snapshot"
			);
			BTreeMap::new()
		} else {
			load_snapshot(&fs, &options.cache_file)?
		};

		Ok(Self {
			fs,
			cache_file: options.cache_file.clone(),
			hashes,
		})
	}

	/// An empty store that will persist to `cache_file`.
	pub fn empty(fs: F, cache_file: impl Into<PathBuf>) -> Self {
		Self {
			fs,
			cache_file: cache_file.into(),
			hashes: BTreeMap::new(),
		}
	}

	pub fn fs(&self) -> &F {
		&self.fs
	}

	pub fn cache_file(&self) -> &Path {
		&self.cache_file
	}

	pub fn get(&self, key: &str) -> Option<Fingerprint> {
		self.hashes.get(key).copied()
	}

	/// Insert or overwrite the fingerprint for `key`.
	pub fn set(&mut self, key: impl Into<String>, fingerprint: Fingerprint) {
		self.hashes.insert(key.into(), fingerprint);
	}

	pub fn remove(&mut self, key: &str) -> Option<Fingerprint> {
		self.hashes.remove(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.hashes.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.hashes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.hashes.is_empty()
	}

	/// Every recorded entry, ordered by key.
	pub fn entries(&self) -> impl Iterator<Item = (&str, Fingerprint)> {
		self.hashes.iter().map(|(key, value)| (key.as_str(), *value))
	}

	/// Write the whole record to the snapshot file.
	///
	/// The payload goes to a sibling temp file first and is renamed over the
	/// snapshot, so a failed write never leaves a truncated snapshot behind.
	pub fn persist(&self) -> HashstoreResult<()> {
		let write_failed = |reason: String| HashstoreError::SnapshotWriteFailed {
			path: self.cache_file.display().to_string(),
			reason,
		};

		let payload =
			serde_json::to_vec_pretty(&self.hashes).map_err(|e| write_failed(e.to_string()))?;

		if let Some(parent) = self
			.cache_file
			.parent()
			.filter(|parent| !parent.as_os_str().is_empty())
		{
			self.fs
				.create_dir_all(parent)
				.map_err(|e| write_failed(e.to_string()))?;
		}

		let temp_path = temp_snapshot_path(&self.cache_file);
		if let Err(error) = self.fs.write_bytes(&temp_path, &payload) {
			let _ = self.fs.remove_file(&temp_path);
			return Err(write_failed(error.to_string()));
		}

		if let Err(error) = self.fs.rename(&temp_path, &self.cache_file) {
			let _ = self.fs.remove_file(&temp_path);
			return Err(write_failed(error.to_string()));
		}

		tracing::info!(
			cache_file = %self.cache_file.display(),
			entries = self.hashes.len(),
			"persisted cache snapshot"
		);

		Ok(())
	}

	/// Persist the record and release the store.
	pub fn close(self) -> HashstoreResult<F> {
		self.persist()?;
		Ok(self.fs)
	}
}

fn load_snapshot<F: FileSystem>(
	fs: &F,
	cache_file: &Path,
) -> HashstoreResult<BTreeMap<String, Fingerprint>> {
	if !fs.exists(cache_file) {
		tracing::debug!(cache_file = %cache_file.display(), "no cache snapshot found");
		return Ok(BTreeMap::new());
	}

	let corrupt = |reason: String| HashstoreError::SnapshotCorrupt {
		path: cache_file.display().to_string(),
		reason,
	};

	let bytes = fs.read_bytes(cache_file).map_err(|e| corrupt(e.to_string()))?;
	let hashes: BTreeMap<String, Fingerprint> =
		serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

	tracing::info!(
		cache_file = %cache_file.display(),
		entries = hashes.len(),
		"loaded cache snapshot"
	);

	Ok(hashes)
}

fn temp_snapshot_path(cache_file: &Path) -> PathBuf {
	let file_name = cache_file
		.file_name()
		.map_or_else(|| "snapshot".into(), |name| name.to_string_lossy());

	cache_file.with_file_name(format!(
		"{file_name}.tmp-{}-{}",
		std::process::id(),
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	))
}
