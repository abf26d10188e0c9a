use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum HashstoreError {
	#[error(transparent)]
	#[diagnostic(code(hashstore::io_error))]
	Io(#[from] std::io::Error),

	#[error("file not found: `{path}`")]
	#[diagnostic(
		code(hashstore::not_found),
		help("the file disappeared between listing and fingerprinting; check the target list")
	)]
	NotFound { path: String },

	#[error("cache snapshot `{path}` is corrupt: {reason}")]
	#[diagnostic(
		code(hashstore::snapshot_corrupt),
		help("inspect or delete the snapshot, or rerun with `--force` to ignore it")
	)]
	SnapshotCorrupt { path: String, reason: String },

	#[error("failed to write cache snapshot `{path}`: {reason}")]
	#[diagnostic(
		code(hashstore::snapshot_write_failed),
		help("the previous snapshot was left untouched")
	)]
	SnapshotWriteFailed { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(hashstore::config_parse),
		help("check that hashstore.toml is valid TOML with a `cache_file` key and `[[targets]]` tables")
	)]
	ConfigParse(String),

	#[error("invalid fingerprint `{value}`: {reason}")]
	#[diagnostic(code(hashstore::invalid_fingerprint))]
	InvalidFingerprint { value: String, reason: String },
}

impl HashstoreError {
	pub(crate) fn not_found(path: &std::path::Path) -> Self {
		Self::NotFound {
			path: path.display().to_string(),
		}
	}

	/// Returns true when the error means a probed file does not exist.
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::NotFound { .. } => true,
			Self::Io(error) => error.kind() == std::io::ErrorKind::NotFound,
			_ => false,
		}
	}
}

pub type HashstoreResult<T> = Result<T, HashstoreError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
