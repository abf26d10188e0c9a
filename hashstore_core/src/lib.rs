//! `hashstore_core` is the change-detection cache behind the
//! [hashstore](https://github.com/ifiokjr/hashstore) tool. It decides, for each
//! generated output file, whether it must be regenerated from its source
//! template, and remembers the answer between runs in a small JSON snapshot.
//!
//! ## Decision Pipeline
//!
//! ```text
//! rendered content + source permissions
//!   → fingerprint (MD5 over content and octal permission text)
//!   → source-side check (output missing? not cached? fingerprint differs?)
//!   → target-side check (has the output on disk drifted from its record?)
//!   → update the in-memory record, persist it once at the end of the run
//! ```
//!
//! ## Modules
//!
//! - [`file_system`] — The [`FileSystem`] seam with local-disk and in-memory backends.
//! - [`config`] — Configuration loading from `hashstore.toml`.
//!
//! ## Key Types
//!
//! - [`Fingerprint`] — A 128-bit digest of file content mixed with permission bits.
//! - [`HashStore`] — The cache record with its snapshot lifecycle.
//! - [`ChangeReason`] — Why an output is, or is not, considered changed.
//! - [`HashstoreConfig`] — Configuration loaded from `hashstore.toml`.
//! - [`SyncResult`] — Result of copying templates to their outputs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hashstore_core::HashStore;
//! use hashstore_core::LocalFileSystem;
//! use hashstore_core::StoreOptions;
//! use std::path::Path;
//!
//! let mut store = HashStore::open(LocalFileSystem::default(), &StoreOptions::default()).unwrap();
//!
//! let rendered = b"hello\n";
//! if store
//! 	.is_file_changed(Path::new("out.txt"), rendered, Path::new("template.txt"))
//! 	.unwrap()
//! {
//! 	std::fs::write("out.txt", rendered).unwrap();
//! }
//!
//! store.close().unwrap();
//! ```

pub use config::*;
pub use detector::*;
pub use digest::*;
pub use error::*;
pub use file_system::*;
pub use store::*;
pub use sync::*;

pub mod config;
mod detector;
mod digest;
#[allow(unused_assignments)]
mod error;
pub mod file_system;
mod store;
mod sync;

#[cfg(test)]
mod __fixtures;
