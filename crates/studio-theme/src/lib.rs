//! Theme data model for the studio
//!
//! Pure, IO-free building blocks: color parsing and conversion between hex
//! and OKLCH, the versioned theme schema with legacy-shape migration, the
//! immutable mutation API, and the CSS/component export generators.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builtin;
pub mod color;
pub mod export;
pub mod theme;

pub use export::{get_main_theme_component_tsx, get_main_theme_css, CssExportColorFormat};
pub use theme::{
    add_custom_theme_color_pair, create_default_main_theme, get_built_in_theme_color_pairs,
    get_custom_theme_color_pairs, get_theme_color_pair, get_theme_color_pairs, is_main_theme,
    normalize_theme_pair_name, parse_main_theme, update_theme_color_pair,
    AddThemeColorPairError, AddThemeColorPairInput, AddThemeColorPairResult, MainTheme,
    ThemeColor, ThemeColorPair, ThemeColorPairUpdate, ThemeMode, ThemePalette,
};
