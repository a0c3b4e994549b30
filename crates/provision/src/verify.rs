use crate::error::{ErrorKind, Result};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against the pinned digest (case-insensitive hex).
pub(crate) fn verify(url: &str, data: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_hex(data);
    if !actual.eq_ignore_ascii_case(expected) {
        exn::bail!(ErrorKind::DigestMismatch {
            url: url.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    tracing::debug!(digest = %actual, "Archive digest verified");
    Ok(())
}
