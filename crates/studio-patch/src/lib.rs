//! File-patch engine for the studio
//!
//! Renders a theme into project files through an explicit patch step:
//! build a patch set describing every pending change, preview it, then
//! apply it under a configurable conflict policy. Also hosts the studio
//! config type and theme file persistence.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod diff;
pub mod engine;
pub mod store;

pub use config::{ConflictStrategy, StudioConfig};
pub use diff::format_file_diff;
pub use engine::{
    apply_theme_patch_set, build_theme_patch_set, ApplyStatus, ApplyThemePatchSetOptions,
    BuildThemePatchSetOptions, ConflictDecision, ConflictResolver, PatchError, Result,
    StudioApplyResult, StudioPatch,
};
pub use store::{load_theme_from_file, save_theme_to_file};
