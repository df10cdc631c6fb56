//! Theme file persistence
//!
//! Loads serialized themes from the project (accepting legacy payload
//! shapes) and saves them back as pretty-printed JSON. Saves go through a
//! temp file plus rename so a crash never leaves a half-written theme.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use studio_theme::{parse_main_theme, MainTheme};

use crate::engine::{PatchError, Result};

/// Load and migrate a theme from `theme_file_path`, resolved against the
/// project root.
///
/// Fails with [`PatchError::InvalidTheme`] when the file holds JSON that
/// matches none of the accepted payload shapes.
pub async fn load_theme_from_file(
    project_root: &Path,
    theme_file_path: &str,
) -> Result<MainTheme> {
    let absolute_path = project_root.join(theme_file_path);
    let raw = fs::read_to_string(&absolute_path).await?;

    parse_main_theme(&raw).ok_or_else(|| PatchError::InvalidTheme {
        path: absolute_path.display().to_string(),
    })
}

/// Save a theme as pretty-printed JSON, creating parent directories as
/// needed
pub async fn save_theme_to_file(
    project_root: &Path,
    theme_file_path: &str,
    theme: &MainTheme,
) -> Result<()> {
    let absolute_path = project_root.join(theme_file_path);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(theme)?;

    // Temp file + rename keeps the save atomic
    let temp_path = absolute_path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(json.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&temp_path, &absolute_path).await?;

    tracing::debug!(path = %absolute_path.display(), "theme saved");
    Ok(())
}
