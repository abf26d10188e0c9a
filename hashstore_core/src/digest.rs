use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::FileSystem;
use crate::HashstoreError;
use crate::HashstoreResult;

/// Length in bytes of a [`Fingerprint`].
pub const FINGERPRINT_LEN: usize = 16;

/// A 128-bit MD5 digest over file content mixed with its permission bits.
///
/// Only used for equality. Persisted as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
	pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
		Self(bytes)
	}

	pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
		&self.0
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}
}

impl fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Debug for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Fingerprint({self})")
	}
}

impl FromStr for Fingerprint {
	type Err = HashstoreError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let mut bytes = [0u8; FINGERPRINT_LEN];
		hex::decode_to_slice(value, &mut bytes).map_err(|e| {
			HashstoreError::InvalidFingerprint {
				value: value.to_string(),
				reason: e.to_string(),
			}
		})?;

		Ok(Self(bytes))
	}
}

impl Serialize for Fingerprint {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for Fingerprint {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		value.parse().map_err(serde::de::Error::custom)
	}
}

/// The octal text mixed into every fingerprint, e.g. `0o644` becomes `"0644"`.
pub fn permission_text(permission_bits: u32) -> String {
	format!("0{permission_bits:o}")
}

/// Fingerprint `content` together with `permission_bits`.
///
/// The octal permission text is appended to the content before hashing so
/// that a permission change alone produces a different fingerprint.
pub fn fingerprint(content: &[u8], permission_bits: u32) -> Fingerprint {
	let mut context = md5::Context::new();
	context.consume(content);
	context.consume(permission_text(permission_bits).as_bytes());

	Fingerprint(context.compute().0)
}

/// Fingerprint the file at `path` using its own bytes and permission bits.
pub fn fingerprint_of_file<F: FileSystem + ?Sized>(
	fs: &F,
	path: &Path,
) -> HashstoreResult<Fingerprint> {
	let content = fs.read_bytes(path)?;
	let permission_bits = fs.permission_bits(path)?;

	Ok(fingerprint(&content, permission_bits))
}
