use std::path::PathBuf;

use crate::ChangeReason;
use crate::FileSystem;
use crate::HashStore;
use crate::HashstoreResult;
use crate::Target;
use crate::copy_permissions;
use crate::write_file_out;

/// Options for [`sync_targets`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
	/// Decide what would change without writing any output.
	pub dry_run: bool,
}

/// The decision made for a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntry {
	pub template: PathBuf,
	pub output: PathBuf,
	pub reason: ChangeReason,
}

/// Result of syncing a list of targets.
#[derive(Debug, Default)]
pub struct SyncResult {
	/// Targets whose output was (or, on a dry run, would be) rewritten.
	pub updated: Vec<SyncEntry>,
	/// Targets whose output was already up to date.
	pub unchanged: Vec<SyncEntry>,
}

impl SyncResult {
	pub fn updated_count(&self) -> usize {
		self.updated.len()
	}

	/// Returns true if nothing needed rewriting.
	pub fn is_up_to_date(&self) -> bool {
		self.updated.is_empty()
	}
}

/// Copy each target's template to its output when the cache says the output
/// is stale.
///
/// The template bytes are used as the rendered content and the template's
/// permission bits are carried over to the output. The store is not
/// persisted; the caller does that once every target was handled.
pub fn sync_targets<F: FileSystem>(
	store: &mut HashStore<F>,
	targets: &[Target],
	options: SyncOptions,
) -> HashstoreResult<SyncResult> {
	let mut result = SyncResult::default();

	for target in targets {
		let rendered = store.fs().read_bytes(&target.template)?;
		let reason = store.check_file(&target.output, &rendered, &target.template)?;
		let entry = SyncEntry {
			template: target.template.clone(),
			output: target.output.clone(),
			reason,
		};

		if !reason.is_changed() {
			result.unchanged.push(entry);
			continue;
		}

		if !options.dry_run {
			write_file_out(store.fs(), &target.output, &rendered)?;
			copy_permissions(store.fs(), &target.template, &target.output)?;
			tracing::debug!(output = %target.output.display(), %reason, "wrote output");
		}

		result.updated.push(entry);
	}

	Ok(result)
}
