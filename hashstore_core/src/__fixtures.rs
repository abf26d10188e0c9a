use std::path::Path;
use std::path::PathBuf;

use crate::MemoryFileSystem;
use crate::StoreOptions;

pub const TEMPLATE: &str = "template.txt";
pub const OUTPUT: &str = "out.txt";
pub const CACHE_FILE: &str = ".hashstore.json";

pub fn template_path() -> PathBuf {
	PathBuf::from(TEMPLATE)
}

pub fn output_path() -> PathBuf {
	PathBuf::from(OUTPUT)
}

pub fn options() -> StoreOptions {
	StoreOptions::new(CACHE_FILE)
}

/// A memory filesystem holding a single `0644` template with `content`.
pub fn memory_fs_with_template(content: &str) -> MemoryFileSystem {
	let fs = MemoryFileSystem::new();
	fs.insert(TEMPLATE, content, 0o644);
	fs
}

#[cfg(unix)]
pub fn write_with_mode(path: &Path, content: &str, mode: u32) {
	use std::os::unix::fs::PermissionsExt;

	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
	std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
		.unwrap_or_else(|e| panic!("chmod: {e}"));
}

#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
	use std::os::unix::fs::PermissionsExt;

	std::fs::metadata(path)
		.unwrap_or_else(|e| panic!("metadata: {e}"))
		.permissions()
		.mode()
		& 0o7777
}
