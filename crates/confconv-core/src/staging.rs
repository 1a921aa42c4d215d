//! Target directory staging
//!
//! Staging is destructive: whatever lives at the target path is removed
//! before a fresh, empty directory is created in its place.

use crate::error::{ConvertError, ConvertResult};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Permission bits for the staged directory (Unix only)
pub const TARGET_DIR_MODE: u32 = 0o755;

/// Make `path` an existing, empty directory
///
/// # Errors
/// - `ConvertError::DirectoryAccess` if the path cannot be inspected
/// - `ConvertError::DirectoryRemoval` if a previous target cannot be deleted
/// - `ConvertError::DirectoryCreation` if the directory cannot be created
pub async fn stage_target_dir(path: &Path) -> ConvertResult<()> {
    match fs::symlink_metadata(path).await {
        Ok(meta) => {
            info!(path = %path.display(), "Cleaning target directory ...");
            let removed = if meta.is_dir() {
                fs::remove_dir_all(path).await
            } else {
                fs::remove_file(path).await
            };
            removed.map_err(|e| ConvertError::directory_removal(path, e))?;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(ConvertError::directory_access(path, e)),
    }

    info!(path = %path.display(), "Creating target directory ...");
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(TARGET_DIR_MODE);
    builder
        .create(path)
        .await
        .map_err(|e| ConvertError::directory_creation(path, e))
}
