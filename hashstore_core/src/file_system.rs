//! Filesystem backends consumed by the cache.
//!
//! The cache never touches `std::fs` directly. Everything it needs (existence
//! checks, raw bytes, permission bits and snapshot writes) goes through the
//! [`FileSystem`] trait so that the same change detection runs against the
//! local disk or any virtual filesystem a caller provides.

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::HashstoreError;
use crate::HashstoreResult;

/// Permission bits reported by backends without a permission model.
pub const NO_PERMISSIONS: u32 = 0;

/// Permission bits given to files created in a [`MemoryFileSystem`].
pub const DEFAULT_MEMORY_PERMISSIONS: u32 = 0o644;

/// The byte and metadata provider behind a [`HashStore`](crate::HashStore).
pub trait FileSystem {
	/// Returns true if a file exists at `path`.
	fn exists(&self, path: &Path) -> bool;

	/// Reads the raw bytes of the file at `path`.
	fn read_bytes(&self, path: &Path) -> HashstoreResult<Vec<u8>>;

	/// Returns the permission bits of the file at `path`. Backends without a
	/// permission model return [`NO_PERMISSIONS`].
	fn permission_bits(&self, path: &Path) -> HashstoreResult<u32>;

	/// Writes `bytes` to `path`, replacing any existing content.
	fn write_bytes(&self, path: &Path, bytes: &[u8]) -> HashstoreResult<()>;

	/// Sets the permission bits of the file at `path`.
	fn set_permission_bits(&self, path: &Path, bits: u32) -> HashstoreResult<()>;

	/// Creates `path` and all of its missing parents as directories.
	fn create_dir_all(&self, path: &Path) -> HashstoreResult<()>;

	/// Moves the file at `from` to `to`, replacing `to` if it exists.
	fn rename(&self, from: &Path, to: &Path) -> HashstoreResult<()>;

	/// Removes the file at `path`.
	fn remove_file(&self, path: &Path) -> HashstoreResult<()>;
}

/// Write `content` to `path`, creating the parent directories first.
pub fn write_file_out<F: FileSystem + ?Sized>(
	fs: &F,
	path: &Path,
	content: &[u8],
) -> HashstoreResult<()> {
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs.create_dir_all(parent)?;
	}

	fs.write_bytes(path, content)
}

/// Give `dest` the permission bits of `source` when they differ.
///
/// Returns true when the destination permissions were changed.
pub fn copy_permissions<F: FileSystem + ?Sized>(
	fs: &F,
	source: &Path,
	dest: &Path,
) -> HashstoreResult<bool> {
	let source_bits = fs.permission_bits(source)?;
	let dest_bits = fs.permission_bits(dest)?;

	if source_bits == dest_bits {
		return Ok(false);
	}

	fs.set_permission_bits(dest, source_bits)?;
	Ok(true)
}

fn map_io_error(path: &Path, error: io::Error) -> HashstoreError {
	if error.kind() == io::ErrorKind::NotFound {
		HashstoreError::not_found(path)
	} else {
		HashstoreError::Io(error)
	}
}

/// The local disk, with relative paths resolved against a root directory.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
	root: PathBuf,
}

impl Default for LocalFileSystem {
	fn default() -> Self {
		Self::new(".")
	}
}

impl LocalFileSystem {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// The directory relative paths are resolved against.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolve `path` against the root. Absolute paths are returned as is.
	pub fn resolve(&self, path: &Path) -> PathBuf {
		self.root.join(path)
	}
}

impl FileSystem for LocalFileSystem {
	fn exists(&self, path: &Path) -> bool {
		self.resolve(path).exists()
	}

	fn read_bytes(&self, path: &Path) -> HashstoreResult<Vec<u8>> {
		std::fs::read(self.resolve(path)).map_err(|e| map_io_error(path, e))
	}

	#[cfg(unix)]
	fn permission_bits(&self, path: &Path) -> HashstoreResult<u32> {
		use std::os::unix::fs::PermissionsExt;

		let metadata = std::fs::metadata(self.resolve(path)).map_err(|e| map_io_error(path, e))?;
		Ok(metadata.permissions().mode() & 0o7777)
	}

	#[cfg(not(unix))]
	fn permission_bits(&self, path: &Path) -> HashstoreResult<u32> {
		if !self.exists(path) {
			return Err(HashstoreError::not_found(path));
		}

		Ok(NO_PERMISSIONS)
	}

	fn write_bytes(&self, path: &Path, bytes: &[u8]) -> HashstoreResult<()> {
		std::fs::write(self.resolve(path), bytes)?;
		Ok(())
	}

	#[cfg(unix)]
	fn set_permission_bits(&self, path: &Path, bits: u32) -> HashstoreResult<()> {
		use std::os::unix::fs::PermissionsExt;

		std::fs::set_permissions(self.resolve(path), std::fs::Permissions::from_mode(bits))
			.map_err(|e| map_io_error(path, e))
	}

	#[cfg(not(unix))]
	fn set_permission_bits(&self, path: &Path, _bits: u32) -> HashstoreResult<()> {
		if !self.exists(path) {
			return Err(HashstoreError::not_found(path));
		}

		Ok(())
	}

	fn create_dir_all(&self, path: &Path) -> HashstoreResult<()> {
		std::fs::create_dir_all(self.resolve(path))?;
		Ok(())
	}

	fn rename(&self, from: &Path, to: &Path) -> HashstoreResult<()> {
		std::fs::rename(self.resolve(from), self.resolve(to)).map_err(|e| map_io_error(from, e))
	}

	fn remove_file(&self, path: &Path) -> HashstoreResult<()> {
		std::fs::remove_file(self.resolve(path)).map_err(|e| map_io_error(path, e))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryFile {
	bytes: Vec<u8>,
	bits: u32,
}

/// An in-memory filesystem.
///
/// Directories are implicit. A read-only instance rejects every mutation with
/// [`io::ErrorKind::PermissionDenied`], which mirrors archive backends that
/// can be read but not written.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
	files: RefCell<BTreeMap<PathBuf, MemoryFile>>,
	read_only: Cell<bool>,
}

impl MemoryFileSystem {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a file with explicit permission bits, bypassing the read-only
	/// flag.
	pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>, bits: u32) {
		self.files.borrow_mut().insert(
			path.into(),
			MemoryFile {
				bytes: bytes.into(),
				bits,
			},
		);
	}

	pub fn set_read_only(&self, read_only: bool) {
		self.read_only.set(read_only);
	}

	/// All file paths currently stored, in order.
	pub fn paths(&self) -> Vec<PathBuf> {
		self.files.borrow().keys().cloned().collect()
	}

	fn ensure_writable(&self) -> HashstoreResult<()> {
		if self.read_only.get() {
			return Err(HashstoreError::Io(io::Error::new(
				io::ErrorKind::PermissionDenied,
				"filesystem is read-only",
			)));
		}

		Ok(())
	}
}

impl FileSystem for MemoryFileSystem {
	fn exists(&self, path: &Path) -> bool {
		self.files.borrow().contains_key(path)
	}

	fn read_bytes(&self, path: &Path) -> HashstoreResult<Vec<u8>> {
		self.files
			.borrow()
			.get(path)
			.map(|file| file.bytes.clone())
			.ok_or_else(|| HashstoreError::not_found(path))
	}

	fn permission_bits(&self, path: &Path) -> HashstoreResult<u32> {
		self.files
			.borrow()
			.get(path)
			.map(|file| file.bits)
			.ok_or_else(|| HashstoreError::not_found(path))
	}

	fn write_bytes(&self, path: &Path, bytes: &[u8]) -> HashstoreResult<()> {
		self.ensure_writable()?;
		let mut files = self.files.borrow_mut();
		match files.get_mut(path) {
			Some(file) => bytes.clone_into(&mut file.bytes),
			None => {
				files.insert(
					path.to_path_buf(),
					MemoryFile {
						bytes: bytes.to_vec(),
						bits: DEFAULT_MEMORY_PERMISSIONS,
					},
				);
			}
		}

		Ok(())
	}

	fn set_permission_bits(&self, path: &Path, bits: u32) -> HashstoreResult<()> {
		self.ensure_writable()?;
		let mut files = self.files.borrow_mut();
		let file = files
			.get_mut(path)
			.ok_or_else(|| HashstoreError::not_found(path))?;
		file.bits = bits;

		Ok(())
	}

	fn create_dir_all(&self, _path: &Path) -> HashstoreResult<()> {
		self.ensure_writable()
	}

	fn rename(&self, from: &Path, to: &Path) -> HashstoreResult<()> {
		self.ensure_writable()?;
		let mut files = self.files.borrow_mut();
		let file = files
			.remove(from)
			.ok_or_else(|| HashstoreError::not_found(from))?;
		files.insert(to.to_path_buf(), file);

		Ok(())
	}

	fn remove_file(&self, path: &Path) -> HashstoreResult<()> {
		self.ensure_writable()?;
		self.files
			.borrow_mut()
			.remove(path)
			.map(|_| ())
			.ok_or_else(|| HashstoreError::not_found(path))
	}
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
	fn exists(&self, path: &Path) -> bool {
		(**self).exists(path)
	}

	fn read_bytes(&self, path: &Path) -> HashstoreResult<Vec<u8>> {
		(**self).read_bytes(path)
	}

	fn permission_bits(&self, path: &Path) -> HashstoreResult<u32> {
		(**self).permission_bits(path)
	}

	fn write_bytes(&self, path: &Path, bytes: &[u8]) -> HashstoreResult<()> {
		(**self).write_bytes(path, bytes)
	}

	fn set_permission_bits(&self, path: &Path, bits: u32) -> HashstoreResult<()> {
		(**self).set_permission_bits(path, bits)
	}

	fn create_dir_all(&self, path: &Path) -> HashstoreResult<()> {
		(**self).create_dir_all(path)
	}

	fn rename(&self, from: &Path, to: &Path) -> HashstoreResult<()> {
		(**self).rename(from, to)
	}

	fn remove_file(&self, path: &Path) -> HashstoreResult<()> {
		(**self).remove_file(path)
	}
}
