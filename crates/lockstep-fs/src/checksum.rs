//! CRC32 change fingerprints
//!
//! Fingerprints are a change signal, not a content address: collisions are
//! accepted. Every fingerprint is rendered as 8 lowercase hex digits.

use std::path::Path;

/// Compute the CRC32 fingerprint of raw content.
///
/// Returns a fixed-width string such as `"0d4a1185"`.
pub fn compute_content_checksum(content: &[u8]) -> String {
    format!("{:08x}", crc32fast::hash(content))
}

/// Compute the CRC32 fingerprint of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(compute_content_checksum(&content))
}
