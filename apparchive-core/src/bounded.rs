use std::io::Read;

use tracing::warn;

use crate::errors::{ImportError, ImportResult};

/// Read a whole upload into memory, refusing anything larger than
/// `limit_bytes`.
///
/// At most `limit_bytes + 1` bytes are pulled from the stream: as soon as the
/// ceiling is crossed the read stops and the partial buffer is dropped.
pub fn read_bounded<R: Read>(reader: R, limit_bytes: u64) -> ImportResult<Vec<u8>> {
    let mut content = Vec::new();
    let read = reader
        .take(limit_bytes.saturating_add(1))
        .read_to_end(&mut content)?;

    if read as u64 > limit_bytes {
        warn!(limit_bytes, "Rejecting upload larger than the size limit");
        return Err(ImportError::SizeLimitExceeded { limit: limit_bytes });
    }
    Ok(content)
}
