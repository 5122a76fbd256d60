//! Messages output file writing.
//!
//! One pretty-printed JSON array per group, whole-file overwrite. No
//! atomicity beyond the underlying write; a crash mid-write can leave a
//! truncated file.

use std::path::Path;

use chatharvest_types::error::ExtractError;
use chatharvest_types::message::MessageRecord;

/// Serialize records as 2-space-indented JSON and overwrite `path`.
///
/// Parent directories are created as needed.
pub async fn write_records(path: &Path, records: &[MessageRecord]) -> Result<(), ExtractError> {
    let json =
        serde_json::to_vec_pretty(records).map_err(|e| ExtractError::Output(e.to_string()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExtractError::Output(e.to_string()))?;
    }

    tokio::fs::write(path, &json)
        .await
        .map_err(|e| ExtractError::Output(e.to_string()))
}
