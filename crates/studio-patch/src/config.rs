//! Studio configuration
//!
//! Project-relative paths and apply-time policy. Deserializes from the
//! project's config file; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

// =============================================================================
// Conflict Strategy
// =============================================================================

/// What to do when a target file changed on disk since its patch was built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Defer to a [`ConflictResolver`](crate::engine::ConflictResolver);
    /// without one, conflicting files are skipped
    #[default]
    Ask,
    /// Leave conflicting files untouched
    Skip,
    /// Write over conflicting files
    Overwrite,
}

impl std::fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictStrategy::Ask => write!(f, "ask"),
            ConflictStrategy::Skip => write!(f, "skip"),
            ConflictStrategy::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl std::str::FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ask" => Ok(ConflictStrategy::Ask),
            "skip" => Ok(ConflictStrategy::Skip),
            "overwrite" => Ok(ConflictStrategy::Overwrite),
            _ => Err(format!("Unknown conflict strategy: {}", s)),
        }
    }
}

// =============================================================================
// Studio Config
// =============================================================================

/// Studio settings for one host project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    /// Package script that launches the studio
    pub script_name: String,
    /// Directory holding the generated UI components, relative to the
    /// project root
    pub ui_path: String,
    /// Path to the project's components manifest
    pub components_path: String,
    /// Path to the studio config file itself
    pub config_path: String,
    /// Path to the stylesheet the studio rewrites
    pub styles_path: String,
    /// Dev-server port
    pub port: u16,
    /// Default conflict policy when applying patches
    pub conflict_strategy: ConflictStrategy,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            script_name: "studio-dev".to_string(),
            ui_path: "src/components/ui".to_string(),
            components_path: "components.json".to_string(),
            config_path: "shadcn-studio.config.ts".to_string(),
            styles_path: "src/styles.css".to_string(),
            port: 3011,
            conflict_strategy: ConflictStrategy::Ask,
        }
    }
}
