//! Content-addressed output naming for externalized assets.

use std::path::Path;

/// Hex characters kept from the content digest. Truncation is
/// collision-accepting; 64 bits is plenty for one build's asset set.
const DIGEST_HEX_LEN: usize = 16;

/// Derive the output filename for an asset from its byte content.
///
/// The name is the first 16 hex characters of the BLAKE3 digest of the
/// content plus the source file's extension. Naming is per-content, not
/// per-path: identical bytes referenced from different source paths collapse
/// into one output file, and any content change produces a new name, so
/// cache busting is automatic.
pub fn hashed_file_name(source: &Path, content: &[u8]) -> String {
    let digest = blake3::hash(content);
    let prefix = hex::encode(&digest.as_bytes()[..DIGEST_HEX_LEN / 2]);
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{prefix}.{ext}"),
        None => prefix,
    }
}
