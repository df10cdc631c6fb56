//! Patch building and application
//!
//! A patch set captures, per target file, the on-disk content at build time
//! (`before`), the freshly generated content (`after`), and a preview diff.
//! Applying compares the file's current content against `before`; a
//! mismatch means something else wrote the file in between, and the
//! configured [`ConflictStrategy`] decides what happens. Each patch carries
//! its own outcome, so one failing file never aborts the rest of the set.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use studio_theme::{
    get_main_theme_component_tsx, get_main_theme_css, CssExportColorFormat, MainTheme,
};

use crate::config::{ConflictStrategy, StudioConfig};
use crate::diff::format_file_diff;

// =============================================================================
// Errors
// =============================================================================

/// Patch and theme-store error types
#[derive(Debug, Error)]
pub enum PatchError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The theme file's contents matched none of the accepted shapes
    #[error("Invalid theme JSON at {path}. Provide a serialized MainTheme payload.")]
    InvalidTheme {
        /// Absolute path of the rejected file
        path: String,
    },
}

/// Result type for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

// =============================================================================
// Patch Types
// =============================================================================

/// A pending change to one project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioPatch {
    /// Target file, relative to the project root
    pub target_path: String,
    /// On-disk content when the patch was built; empty for a missing file
    pub before: String,
    /// Generated content to write
    pub after: String,
    /// Preview diff between `before` and `after`
    pub diff: String,
    /// Whether `before` and `after` differ
    pub has_changes: bool,
}

/// Per-file outcome of applying a patch set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyStatus {
    /// Content was written
    Applied,
    /// A conflict left the file untouched
    Skipped,
    /// The patch had no changes to begin with
    Noop,
    /// The write failed
    Error,
}

/// One entry of the apply report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioApplyResult {
    /// Target file, relative to the project root
    pub target_path: String,
    /// What happened to the file
    pub status: ApplyStatus,
    /// Human-readable explanation for non-applied outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A resolver's verdict for one conflicting patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Write the patch anyway
    Overwrite,
    /// Leave the file as it is on disk
    Skip,
}

/// Decides conflicting patches under [`ConflictStrategy::Ask`], typically
/// by prompting the user
#[async_trait]
pub trait ConflictResolver: Send + Sync {
    /// Decide what to do with one conflicting patch
    async fn resolve(&self, patch: &StudioPatch) -> ConflictDecision;
}

// =============================================================================
// Building
// =============================================================================

/// Inputs for [`build_theme_patch_set`]
#[derive(Debug, Clone, Copy)]
pub struct BuildThemePatchSetOptions<'a> {
    /// Root directory the config paths are relative to
    pub project_root: &'a Path,
    /// Studio settings naming the target files
    pub config: &'a StudioConfig,
    /// Theme to render
    pub theme: &'a MainTheme,
    /// Color notation for the stylesheet
    pub color_format: CssExportColorFormat,
}

/// Missing files read as empty, so a first run diffs against nothing
async fn safe_read_file(path: &Path) -> String {
    fs::read_to_string(path).await.unwrap_or_default()
}

fn theme_output_targets(
    theme: &MainTheme,
    config: &StudioConfig,
    color_format: CssExportColorFormat,
) -> Vec<(String, String)> {
    let button_path = Path::new(&config.ui_path)
        .join("button.tsx")
        .to_string_lossy()
        .into_owned();

    let mut targets = vec![
        (config.styles_path.clone(), get_main_theme_css(theme, color_format)),
        (button_path, get_main_theme_component_tsx(theme)),
    ];
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    targets
}

/// Render the theme and diff each output against the project's current
/// files. Produces one patch per target, in path order.
pub async fn build_theme_patch_set(options: BuildThemePatchSetOptions<'_>) -> Vec<StudioPatch> {
    let targets = theme_output_targets(options.theme, options.config, options.color_format);
    let mut patches = Vec::with_capacity(targets.len());

    for (target_path, after) in targets {
        let absolute_path = options.project_root.join(&target_path);
        let before = safe_read_file(&absolute_path).await;
        let has_changes = before != after;
        tracing::debug!(path = %target_path, has_changes, "built patch");
        patches.push(StudioPatch {
            diff: format_file_diff(&target_path, &before, &after),
            target_path,
            before,
            after,
            has_changes,
        });
    }

    patches
}

// =============================================================================
// Applying
// =============================================================================

/// Inputs for [`apply_theme_patch_set`]
pub struct ApplyThemePatchSetOptions<'a> {
    /// Root directory the patch paths are relative to
    pub project_root: &'a Path,
    /// Patches to apply, as built by [`build_theme_patch_set`]
    pub patches: &'a [StudioPatch],
    /// Conflict policy
    pub conflict_strategy: ConflictStrategy,
    /// Resolver consulted under [`ConflictStrategy::Ask`]; absent, every
    /// conflict is skipped
    pub resolver: Option<&'a dyn ConflictResolver>,
}

/// Apply a patch set sequentially, one report entry per patch.
///
/// Write failures are captured in the entry's `reason` rather than
/// propagated, so subsequent patches still run.
pub async fn apply_theme_patch_set(
    options: ApplyThemePatchSetOptions<'_>,
) -> Vec<StudioApplyResult> {
    let mut results = Vec::with_capacity(options.patches.len());

    for patch in options.patches {
        if !patch.has_changes {
            results.push(StudioApplyResult {
                target_path: patch.target_path.clone(),
                status: ApplyStatus::Noop,
                reason: Some("No content changes detected.".to_string()),
            });
            continue;
        }

        let absolute_path = options.project_root.join(&patch.target_path);
        let current = safe_read_file(&absolute_path).await;
        let has_conflict = current != patch.before;

        let mut should_write = true;
        if has_conflict {
            should_write = match options.conflict_strategy {
                ConflictStrategy::Skip => false,
                ConflictStrategy::Overwrite => true,
                ConflictStrategy::Ask => match options.resolver {
                    Some(resolver) => {
                        resolver.resolve(patch).await == ConflictDecision::Overwrite
                    }
                    None => false,
                },
            };
        }

        if !should_write {
            tracing::warn!(path = %patch.target_path, "conflicting file skipped");
            results.push(StudioApplyResult {
                target_path: patch.target_path.clone(),
                status: ApplyStatus::Skipped,
                reason: Some("Conflict detected; file was skipped.".to_string()),
            });
            continue;
        }

        results.push(match write_patch(&absolute_path, patch).await {
            Ok(()) => StudioApplyResult {
                target_path: patch.target_path.clone(),
                status: ApplyStatus::Applied,
                reason: None,
            },
            Err(error) => StudioApplyResult {
                target_path: patch.target_path.clone(),
                status: ApplyStatus::Error,
                reason: Some(error.to_string()),
            },
        });
    }

    results
}

async fn write_patch(absolute_path: &Path, patch: &StudioPatch) -> Result<()> {
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(absolute_path, &patch.after).await?;
    tracing::debug!(path = %patch.target_path, "patch applied");
    Ok(())
}
