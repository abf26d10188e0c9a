use std::fmt;
use std::path::Path;

use crate::FileSystem;
use crate::HashStore;
use crate::HashstoreResult;
use crate::fingerprint;
use crate::fingerprint_of_file;
use crate::path_key;

/// Why an output file does or does not need regenerating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChangeReason {
	/// The output file does not exist yet.
	OutputMissing,
	/// The output exists but nothing was recorded for it.
	NotCached,
	/// The rendered content or the source permissions differ from the
	/// recorded fingerprint.
	SourceChanged,
	/// The source matches, but the output on disk was modified since it was
	/// recorded.
	TargetDrifted,
	Unchanged,
}

impl ChangeReason {
	pub fn is_changed(self) -> bool {
		self != Self::Unchanged
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::OutputMissing => "output missing",
			Self::NotCached => "not cached",
			Self::SourceChanged => "source changed",
			Self::TargetDrifted => "output modified",
			Self::Unchanged => "unchanged",
		}
	}
}

impl fmt::Display for ChangeReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl<F: FileSystem> HashStore<F> {
	/// Returns true if `output` must be regenerated from `rendered`.
	///
	/// See [`HashStore::check_file`].
	pub fn is_file_changed(
		&mut self,
		output: &Path,
		rendered: &[u8],
		source: &Path,
	) -> HashstoreResult<bool> {
		Ok(self.check_file(output, rendered, source)?.is_changed())
	}

	/// Decide whether `output` must be regenerated, recording the new
	/// fingerprint when the source side changed.
	///
	/// The source side is checked first: `rendered` mixed with the permission
	/// bits of `source` is compared against the recorded value. Only when that
	/// matches is the output file itself fingerprinted, to catch edits made
	/// outside of the tool.
	pub fn check_file(
		&mut self,
		output: &Path,
		rendered: &[u8],
		source: &Path,
	) -> HashstoreResult<ChangeReason> {
		let key = path_key(output);
		let reason = self.check_source(&key, output, rendered, source)?;
		if reason.is_changed() {
			tracing::debug!(output = %key, %reason, "output needs regenerating");
			return Ok(reason);
		}

		let reason = self.check_target(&key, output)?;
		if reason.is_changed() {
			tracing::warn!(output = %key, "output was modified outside of hashstore");
		} else {
			tracing::debug!(output = %key, "output is up to date");
		}

		Ok(reason)
	}

	fn check_source(
		&mut self,
		key: &str,
		output: &Path,
		rendered: &[u8],
		source: &Path,
	) -> HashstoreResult<ChangeReason> {
		let candidate = fingerprint(rendered, self.fs().permission_bits(source)?);

		let reason = if !self.fs().exists(output) {
			ChangeReason::OutputMissing
		} else {
			match self.get(key) {
				None => ChangeReason::NotCached,
				Some(stored) if stored == candidate => ChangeReason::Unchanged,
				Some(_) => ChangeReason::SourceChanged,
			}
		};

		if reason.is_changed() {
			self.set(key, candidate);
		}

		Ok(reason)
	}

	/// Only reached after [`Self::check_source`] returned
	/// [`ChangeReason::Unchanged`], which requires an entry for `key`.
	fn check_target(&self, key: &str, output: &Path) -> HashstoreResult<ChangeReason> {
		let Some(stored) = self.get(key) else {
			return Ok(ChangeReason::NotCached);
		};

		if fingerprint_of_file(self.fs(), output)? == stored {
			Ok(ChangeReason::Unchanged)
		} else {
			Ok(ChangeReason::TargetDrifted)
		}
	}
}
