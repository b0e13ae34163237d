//! Cache keys for documentation lookups

use md5::{Digest, Md5};

/// Key of the process-wide resource index
pub const RESOURCE_INDEX_KEY: &str = "api-resources";

/// Prefix of per-source documentation keys
pub const DOCUMENTATION_KEY_PREFIX: &str = "api-resource-";

/// Number of hex characters kept from the digest
pub const FINGERPRINT_LEN: usize = 16;

/// Short stable fingerprint of a source path
///
/// The first 16 hex characters of the MD5 digest of the path's UTF-8 bytes.
///
/// # Examples
///
/// ```
/// use contour_apidoc::fingerprint;
///
/// assert_eq!(fingerprint(""), "d41d8cd98f00b204");
/// assert_eq!(fingerprint("/entries").len(), 16);
/// ```
pub fn fingerprint(source_path: &str) -> String {
	let mut hex = hex::encode(Md5::digest(source_path.as_bytes()));
	hex.truncate(FINGERPRINT_LEN);
	hex
}

/// Cache key for the documentation of a source path
pub fn documentation_key(source_path: &str) -> String {
	format!("{}{}", DOCUMENTATION_KEY_PREFIX, fingerprint(source_path))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "api-resource-d41d8cd98f00b204")]
	#[case("abc", "api-resource-900150983cd24fb0")]
	fn test_documentation_key(#[case] source_path: &str, #[case] expected: &str) {
		assert_eq!(documentation_key(source_path), expected);
	}

	#[rstest]
	fn test_distinct_paths() {
		assert_ne!(fingerprint("/entries"), fingerprint("/entries/"));
		assert_eq!(fingerprint("/entries"), fingerprint("/entries"));
	}
}
