use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{MfdError, Result};

/// Remove the cache directory and everything in it
/// A cache that does not exist yet counts as cleared
pub fn clear(cache_dir: &Path) -> Result<String> {
    if cache_dir.exists() {
        fs::remove_dir_all(cache_dir).map_err(|e| MfdError::io(cache_dir, e))?;
        info!(path = %cache_dir.display(), "Removed cache directory");
    } else {
        info!(path = %cache_dir.display(), "Cache directory does not exist, nothing to remove");
    }
    Ok(format!("The cache has been cleared at {}", cache_dir.display()))
}
