//! Theme schema, validation, migration, and the mutation API
//!
//! A [`MainTheme`] holds one palette of named color pairs per mode. Four
//! invariants hold for every theme produced by this module:
//!
//! 1. The light and dark palettes contain the same pair names in the same
//!    order.
//! 2. Every built-in pair is present in both palettes, in canonical order,
//!    before any custom pairs.
//! 3. Custom pair metadata (`label`, `includeInButtonVariant`, `isCustom`)
//!    is identical across modes; only `color`/`foreground` differ per mode.
//! 4. No pair name collides with a reserved button-variant name.
//!
//! All parsing from storage flows through [`parse_main_theme`], which
//! accepts the current payload shape plus two legacy shapes and always
//! re-establishes the invariants. Mutation functions take the theme by
//! value and hand back a new value graph; on a no-op they return the input
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::builtin::{
    self, built_in_definition, is_built_in_pair_name, is_reserved_button_variant_name,
    BuiltInPairDefinition, FALLBACK_COLOR, FALLBACK_FOREGROUND,
};
use crate::color::normalize_theme_color;

// =============================================================================
// Core Types
// =============================================================================

/// A color in canonical hex or OKLCH string form
pub type ThemeColor = String;

/// Palette mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light palette
    #[default]
    Light,
    /// Dark palette
    Dark,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("Unknown theme mode: {}", s)),
        }
    }
}

/// A semantic (background, foreground) pair of colors under one name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColorPair {
    /// Normalized identifier, unique within a palette
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Background color
    pub color: ThemeColor,
    /// Foreground color
    pub foreground: ThemeColor,
    /// Whether the exported button component gains a variant for this pair
    /// (only meaningful for custom pairs)
    pub include_in_button_variant: bool,
    /// Whether this pair is user-defined rather than built-in
    pub is_custom: bool,
}

/// The full set of color pairs for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePalette {
    /// Built-in pairs in canonical order, followed by custom pairs
    pub color_pairs: Vec<ThemeColorPair>,
}

/// A complete theme: one palette per mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainTheme {
    /// Light-mode palette
    pub light: ThemePalette,
    /// Dark-mode palette
    pub dark: ThemePalette,
}

impl Default for MainTheme {
    fn default() -> Self {
        create_default_main_theme()
    }
}

/// Input to [`add_custom_theme_color_pair`]
#[derive(Debug, Clone, Default)]
pub struct AddThemeColorPairInput {
    /// Requested pair name (normalized before use)
    pub name: String,
    /// Optional label; defaults to the title-cased name
    pub label: Option<String>,
    /// Optional background color; defaults to the theme's primary color
    pub color: Option<String>,
    /// Optional foreground color; defaults to the primary foreground
    pub foreground: Option<String>,
    /// Whether to opt the pair into the button-variant export
    pub include_in_button_variant: bool,
}

/// Why a custom pair could not be added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddThemeColorPairError {
    /// The name did not survive normalization
    #[error("Name must start with a letter and use only a-z, 0-9, or -.")]
    InvalidName,
    /// The name belongs to a built-in pair
    #[error("This semantic pair already exists.")]
    BuiltInName,
    /// The name collides with a button variant
    #[error("This name conflicts with an existing button variant.")]
    ReservedVariantName,
    /// A pair with this name is already in the palette
    #[error("A pair with this name already exists.")]
    DuplicateName,
}

/// Outcome of [`add_custom_theme_color_pair`]: the (possibly unchanged)
/// theme plus an error when the pair was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct AddThemeColorPairResult {
    /// The new theme on success, the input theme unchanged on failure
    pub theme: MainTheme,
    /// `None` on success
    pub error: Option<AddThemeColorPairError>,
}

/// Field updates for [`update_theme_color_pair`]; `None` leaves a field
/// untouched
#[derive(Debug, Clone, Default)]
pub struct ThemeColorPairUpdate {
    /// New label (custom pairs only)
    pub label: Option<String>,
    /// New background color for the targeted mode
    pub color: Option<String>,
    /// New foreground color for the targeted mode
    pub foreground: Option<String>,
    /// New button-variant opt-in (custom pairs only)
    pub include_in_button_variant: Option<bool>,
}

// =============================================================================
// Name and Color Normalization
// =============================================================================

/// Title-case a hyphenated name ("sidebar-primary" -> "Sidebar Primary")
fn start_case(value: &str) -> String {
    value
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a pair name: lowercase, underscores and whitespace become
/// hyphens, other characters are dropped, hyphen runs collapse, and edge
/// hyphens are stripped. Returns `None` unless the result starts with a
/// letter.
pub fn normalize_theme_pair_name(value: &str) -> Option<String> {
    let lowered = value.trim().to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let mapped = if ch == '_' || ch.is_whitespace() {
            '-'
        } else if matches!(ch, 'a'..='z' | '0'..='9' | '-') {
            ch
        } else {
            continue;
        };
        if mapped == '-' && cleaned.ends_with('-') {
            continue;
        }
        cleaned.push(mapped);
    }

    let trimmed = cleaned.trim_matches('-');
    if !trimmed.starts_with(|ch: char| ch.is_ascii_lowercase()) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Normalize a color, falling back when the input is missing or malformed
fn ensure_theme_color(value: Option<&str>, fallback: &str) -> ThemeColor {
    value
        .and_then(normalize_theme_color)
        .unwrap_or_else(|| fallback.to_string())
}

/// Like [`ensure_theme_color`] but reading from an untyped JSON value
fn ensure_theme_color_value(value: Option<&Value>, fallback: &str) -> ThemeColor {
    ensure_theme_color(value.and_then(Value::as_str), fallback)
}

// =============================================================================
// Defaults
// =============================================================================

fn built_in_pair_defaults(
    definition: &BuiltInPairDefinition,
    mode: ThemeMode,
) -> (ThemeColor, ThemeColor) {
    (
        builtin::theme_variable(mode, definition.color_token)
            .unwrap_or(FALLBACK_COLOR)
            .to_string(),
        builtin::theme_variable(mode, definition.foreground_token)
            .unwrap_or(FALLBACK_FOREGROUND)
            .to_string(),
    )
}

fn create_default_color_pairs(mode: ThemeMode) -> Vec<ThemeColorPair> {
    builtin::BUILT_IN_PAIR_DEFINITIONS
        .iter()
        .map(|definition| {
            let (color, foreground) = built_in_pair_defaults(definition, mode);
            ThemeColorPair {
                name: definition.name.to_string(),
                label: definition.label.to_string(),
                color,
                foreground,
                include_in_button_variant: false,
                is_custom: false,
            }
        })
        .collect()
}

/// Build the default theme from the built-in token tables
pub fn create_default_main_theme() -> MainTheme {
    MainTheme {
        light: ThemePalette {
            color_pairs: create_default_color_pairs(ThemeMode::Light),
        },
        dark: ThemePalette {
            color_pairs: create_default_color_pairs(ThemeMode::Dark),
        },
    }
}

fn default_theme_pair(mode: ThemeMode, pair_name: &str) -> Option<ThemeColorPair> {
    let definition = built_in_definition(pair_name)?;
    let (color, foreground) = built_in_pair_defaults(definition, mode);
    Some(ThemeColorPair {
        name: definition.name.to_string(),
        label: definition.label.to_string(),
        color,
        foreground,
        include_in_button_variant: false,
        is_custom: false,
    })
}

fn theme_palette(theme: &MainTheme, mode: ThemeMode) -> &ThemePalette {
    match mode {
        ThemeMode::Light => &theme.light,
        ThemeMode::Dark => &theme.dark,
    }
}

// =============================================================================
// Palette Normalization
// =============================================================================

/// Re-establish built-in order and custom-pair hygiene for one mode's pairs
fn merge_color_pairs_with_defaults(
    pairs: Vec<ThemeColorPair>,
    mode: ThemeMode,
) -> Vec<ThemeColorPair> {
    let mut built_in_overrides: Vec<ThemeColorPair> = Vec::new();
    let mut custom_pairs: Vec<ThemeColorPair> = Vec::new();

    for mut pair in pairs {
        if is_built_in_pair_name(&pair.name) {
            pair.include_in_button_variant = false;
            pair.is_custom = false;
            if let Some(existing) = built_in_overrides
                .iter_mut()
                .find(|candidate| candidate.name == pair.name)
            {
                *existing = pair;
            } else {
                built_in_overrides.push(pair);
            }
            continue;
        }

        if custom_pairs.iter().any(|candidate| candidate.name == pair.name) {
            continue;
        }

        if pair.label.trim().is_empty() {
            pair.label = start_case(&pair.name);
        }
        pair.is_custom = true;
        custom_pairs.push(pair);
    }

    let mut merged: Vec<ThemeColorPair> =
        Vec::with_capacity(builtin::BUILT_IN_PAIR_DEFINITIONS.len() + custom_pairs.len());
    for definition in builtin::BUILT_IN_PAIR_DEFINITIONS {
        let pair = match built_in_overrides
            .iter()
            .find(|candidate| candidate.name == definition.name)
        {
            Some(override_pair) => {
                let mut pair = override_pair.clone();
                pair.label = definition.label.to_string();
                pair
            }
            None => default_theme_pair(mode, definition.name)
                .expect("built-in definitions always have defaults"),
        };
        merged.push(pair);
    }
    merged.extend(custom_pairs);
    merged
}

fn normalize_theme_palette(pairs: Vec<ThemeColorPair>, mode: ThemeMode) -> ThemePalette {
    ThemePalette {
        color_pairs: merge_color_pairs_with_defaults(pairs, mode),
    }
}

/// Default fill for a new custom pair: the palette's current primary colors
fn primary_pair_defaults(palette: &ThemePalette, mode: ThemeMode) -> (ThemeColor, ThemeColor) {
    if let Some(primary) = palette
        .color_pairs
        .iter()
        .find(|pair| pair.name == "primary")
    {
        return (primary.color.clone(), primary.foreground.clone());
    }

    match default_theme_pair(mode, "primary") {
        Some(pair) => (pair.color, pair.foreground),
        None => (FALLBACK_COLOR.to_string(), FALLBACK_FOREGROUND.to_string()),
    }
}

fn create_custom_pair_for_palette(
    palette: &ThemePalette,
    mode: ThemeMode,
    name: &str,
    label: &str,
    include_in_button_variant: bool,
    color: Option<&str>,
    foreground: Option<&str>,
) -> ThemeColorPair {
    let (primary_color, primary_foreground) = primary_pair_defaults(palette, mode);
    ThemeColorPair {
        name: name.to_string(),
        label: label.to_string(),
        color: ensure_theme_color(color, &primary_color),
        foreground: ensure_theme_color(foreground, &primary_foreground),
        include_in_button_variant,
        is_custom: true,
    }
}

/// Reconcile custom pairs across modes so names, labels, and button-variant
/// opt-ins match, while colors stay per-mode
fn synchronize_theme_palettes(light: ThemePalette, dark: ThemePalette) -> MainTheme {
    let normalized_light = normalize_theme_palette(light.color_pairs, ThemeMode::Light);
    let normalized_dark = normalize_theme_palette(dark.color_pairs, ThemeMode::Dark);

    let light_built_in: Vec<ThemeColorPair> = normalized_light
        .color_pairs
        .iter()
        .filter(|pair| !pair.is_custom)
        .cloned()
        .collect();
    let dark_built_in: Vec<ThemeColorPair> = normalized_dark
        .color_pairs
        .iter()
        .filter(|pair| !pair.is_custom)
        .cloned()
        .collect();

    let light_custom: Vec<ThemeColorPair> = normalized_light
        .color_pairs
        .iter()
        .filter(|pair| pair.is_custom)
        .cloned()
        .collect();
    let dark_custom: Vec<ThemeColorPair> = normalized_dark
        .color_pairs
        .iter()
        .filter(|pair| pair.is_custom)
        .cloned()
        .collect();

    // Custom names in first-seen order, light palette first
    let mut custom_names: Vec<String> = Vec::new();
    for pair in light_custom.iter().chain(dark_custom.iter()) {
        if !custom_names.contains(&pair.name) {
            custom_names.push(pair.name.clone());
        }
    }

    let mut synced_light_custom: Vec<ThemeColorPair> = Vec::new();
    let mut synced_dark_custom: Vec<ThemeColorPair> = Vec::new();

    for name in &custom_names {
        let light_pair = light_custom.iter().find(|pair| &pair.name == name);
        let dark_pair = dark_custom.iter().find(|pair| &pair.name == name);
        let source_pair = light_pair.or(dark_pair);

        let label = match source_pair {
            Some(pair) if !pair.label.trim().is_empty() => pair.label.clone(),
            _ => start_case(name),
        };
        let include_in_button_variant =
            source_pair.is_some_and(|pair| pair.include_in_button_variant);

        let mut synced_light = match light_pair {
            Some(pair) => pair.clone(),
            None => create_custom_pair_for_palette(
                &normalized_light,
                ThemeMode::Light,
                name,
                &label,
                include_in_button_variant,
                None,
                None,
            ),
        };
        let mut synced_dark = match dark_pair {
            Some(pair) => pair.clone(),
            None => create_custom_pair_for_palette(
                &normalized_dark,
                ThemeMode::Dark,
                name,
                &label,
                include_in_button_variant,
                None,
                None,
            ),
        };

        for pair in [&mut synced_light, &mut synced_dark] {
            pair.name = name.clone();
            pair.label = label.clone();
            pair.include_in_button_variant = include_in_button_variant;
            pair.is_custom = true;
        }
        synced_light_custom.push(synced_light);
        synced_dark_custom.push(synced_dark);
    }

    let mut light_pairs = light_built_in;
    light_pairs.extend(synced_light_custom);
    let mut dark_pairs = dark_built_in;
    dark_pairs.extend(synced_dark_custom);

    MainTheme {
        light: ThemePalette { color_pairs: light_pairs },
        dark: ThemePalette { color_pairs: dark_pairs },
    }
}

fn create_theme_from_palette_pairs(
    light_pairs: Vec<ThemeColorPair>,
    dark_pairs: Vec<ThemeColorPair>,
) -> MainTheme {
    synchronize_theme_palettes(
        normalize_theme_palette(light_pairs, ThemeMode::Light),
        normalize_theme_palette(dark_pairs, ThemeMode::Dark),
    )
}

// =============================================================================
// Migration
// =============================================================================

/// Repair one pair-like JSON object into a well-formed pair, or drop it
fn ensure_theme_color_pair(value: &Value, fallback: &ThemeColorPair) -> Option<ThemeColorPair> {
    let record = value.as_object()?;

    let name = normalize_theme_pair_name(
        record.get("name").and_then(Value::as_str).unwrap_or(""),
    )?;

    let definition = built_in_definition(&name);
    let label = match record.get("label").and_then(Value::as_str) {
        Some(label) if !label.trim().is_empty() => label.trim().to_string(),
        _ => match definition {
            Some(definition) => definition.label.to_string(),
            None => start_case(&name),
        },
    };

    let include_in_button_variant = definition.is_none()
        && record
            .get("includeInButtonVariant")
            .and_then(Value::as_bool)
            .unwrap_or(false);

    Some(ThemeColorPair {
        name,
        label,
        color: ensure_theme_color_value(record.get("color"), &fallback.color),
        foreground: ensure_theme_color_value(record.get("foreground"), &fallback.foreground),
        include_in_button_variant,
        is_custom: definition.is_none(),
    })
}

/// Parse a `colorPairs`-like JSON array, dropping malformed entries.
/// Returns `None` when the value is not an array at all.
fn parse_theme_color_pairs_from_value(
    raw_pairs: Option<&Value>,
    mode: ThemeMode,
) -> Option<Vec<ThemeColorPair>> {
    let entries = raw_pairs?.as_array()?;
    let mut parsed: Vec<ThemeColorPair> = Vec::new();

    for candidate in entries {
        let Some(record) = candidate.as_object() else {
            continue;
        };
        let Some(name) = normalize_theme_pair_name(
            record.get("name").and_then(Value::as_str).unwrap_or(""),
        ) else {
            continue;
        };

        let fallback = default_theme_pair(mode, &name).unwrap_or_else(|| {
            let defaults = normalize_theme_palette(Vec::new(), mode);
            create_custom_pair_for_palette(
                &defaults,
                mode,
                &name,
                &start_case(&name),
                false,
                None,
                None,
            )
        });

        if let Some(pair) = ensure_theme_color_pair(candidate, &fallback) {
            parsed.push(pair);
        }
    }

    Some(parsed)
}

/// Ordered dispatch over the three accepted payload shapes: current
/// light/dark shape, legacy single-palette shape, oldest flat shape
fn normalize_main_theme(value: &Value) -> Option<MainTheme> {
    let record = value.as_object()?;

    let maybe_light_pairs = record
        .get("light")
        .filter(|palette| palette.is_object())
        .and_then(|palette| parse_theme_color_pairs_from_value(palette.get("colorPairs"), ThemeMode::Light));
    let maybe_dark_pairs = record
        .get("dark")
        .filter(|palette| palette.is_object())
        .and_then(|palette| parse_theme_color_pairs_from_value(palette.get("colorPairs"), ThemeMode::Dark));

    if maybe_light_pairs.is_some() || maybe_dark_pairs.is_some() {
        return Some(create_theme_from_palette_pairs(
            maybe_light_pairs.unwrap_or_else(|| create_default_color_pairs(ThemeMode::Light)),
            maybe_dark_pairs.unwrap_or_else(|| create_default_color_pairs(ThemeMode::Dark)),
        ));
    }

    // Legacy single-palette shape: a bare colorPairs array feeds the light
    // palette; dark is synthesized from defaults plus carried-over customs
    if let Some(legacy_pairs) =
        parse_theme_color_pairs_from_value(record.get("colorPairs"), ThemeMode::Light)
    {
        return Some(create_theme_from_palette_pairs(legacy_pairs, Vec::new()));
    }

    // Oldest flat shape: top-level background/foreground/primary strings
    let has_flat_shape = ["background", "foreground", "primary", "primaryForeground"]
        .iter()
        .any(|key| record.contains_key(*key));
    if !has_flat_shape {
        return None;
    }

    let mut next_theme = create_default_main_theme();
    for mode in [ThemeMode::Light, ThemeMode::Dark] {
        let background = get_theme_color_pair(&next_theme, mode, "background")
            .expect("default theme always has a background pair");
        next_theme = update_theme_color_pair(
            next_theme,
            mode,
            "background",
            ThemeColorPairUpdate {
                color: Some(ensure_theme_color_value(record.get("background"), &background.color)),
                foreground: Some(ensure_theme_color_value(
                    record.get("foreground"),
                    &background.foreground,
                )),
                ..Default::default()
            },
        );

        let primary = get_theme_color_pair(&next_theme, mode, "primary")
            .expect("default theme always has a primary pair");
        next_theme = update_theme_color_pair(
            next_theme,
            mode,
            "primary",
            ThemeColorPairUpdate {
                color: Some(ensure_theme_color_value(record.get("primary"), &primary.color)),
                foreground: Some(ensure_theme_color_value(
                    record.get("primaryForeground"),
                    &primary.foreground,
                )),
                ..Default::default()
            },
        );
    }

    Some(next_theme)
}

// =============================================================================
// Validation
// =============================================================================

/// Validate one palette's JSON, returning its pair names in order
fn validate_palette_value(value: &Value) -> Option<Vec<String>> {
    let palette = value.as_object()?;
    let pairs = palette.get("colorPairs")?.as_array()?;

    let mut names: Vec<String> = Vec::new();
    for pair_value in pairs {
        let pair = pair_value.as_object()?;

        let raw_name = pair.get("name").and_then(Value::as_str).unwrap_or("");
        let normalized = normalize_theme_pair_name(raw_name)?;
        // Validation accepts no implicit renaming and no duplicates
        if raw_name != normalized || names.contains(&normalized) {
            return None;
        }

        let valid_fields = pair.get("label").is_some_and(Value::is_string)
            && pair
                .get("color")
                .and_then(Value::as_str)
                .is_some_and(crate::color::is_theme_color)
            && pair
                .get("foreground")
                .and_then(Value::as_str)
                .is_some_and(crate::color::is_theme_color)
            && pair
                .get("includeInButtonVariant")
                .is_some_and(Value::is_boolean)
            && pair.get("isCustom").is_some_and(Value::is_boolean);
        if !valid_fields {
            return None;
        }

        names.push(normalized);
    }

    Some(names)
}

/// Structural validator for the current theme shape.
///
/// Accepts only a fully well-formed payload: normalized unique pair names,
/// valid colors, and identical name sequences across both palettes. Useful
/// both for migration dispatch and as a post-mutation invariant check.
pub fn is_main_theme(value: &Value) -> bool {
    let Some(record) = value.as_object() else {
        return false;
    };

    let (Some(light), Some(dark)) = (record.get("light"), record.get("dark")) else {
        return false;
    };

    let Some(light_names) = validate_palette_value(light) else {
        return false;
    };
    let Some(dark_names) = validate_palette_value(dark) else {
        return false;
    };

    light_names == dark_names
}

/// Parse a serialized theme payload, migrating legacy shapes.
///
/// Returns `None` when the input is not JSON or matches none of the three
/// accepted shapes.
pub fn parse_main_theme(raw: &str) -> Option<MainTheme> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    normalize_main_theme(&parsed)
}

// =============================================================================
// Read Accessors
// =============================================================================

/// All pairs of a mode's palette, as copies
pub fn get_theme_color_pairs(theme: &MainTheme, mode: ThemeMode) -> Vec<ThemeColorPair> {
    theme_palette(theme, mode).color_pairs.clone()
}

/// The built-in pairs of a mode's palette, as copies
pub fn get_built_in_theme_color_pairs(theme: &MainTheme, mode: ThemeMode) -> Vec<ThemeColorPair> {
    theme_palette(theme, mode)
        .color_pairs
        .iter()
        .filter(|pair| !pair.is_custom)
        .cloned()
        .collect()
}

/// The custom pairs of a mode's palette, as copies
pub fn get_custom_theme_color_pairs(theme: &MainTheme, mode: ThemeMode) -> Vec<ThemeColorPair> {
    theme_palette(theme, mode)
        .color_pairs
        .iter()
        .filter(|pair| pair.is_custom)
        .cloned()
        .collect()
}

/// Look up one pair by name. Falls back to the built-in default when the
/// palette lacks the pair but the name is a known built-in.
pub fn get_theme_color_pair(
    theme: &MainTheme,
    mode: ThemeMode,
    pair_name: &str,
) -> Option<ThemeColorPair> {
    let normalized = normalize_theme_pair_name(pair_name)?;

    theme_palette(theme, mode)
        .color_pairs
        .iter()
        .find(|pair| pair.name == normalized)
        .cloned()
        .or_else(|| default_theme_pair(mode, &normalized))
}

// =============================================================================
// Mutations
// =============================================================================

/// Update one pair's fields.
///
/// `color`/`foreground` apply only within the targeted mode's palette;
/// `label`/`include_in_button_variant` apply only when the pair is custom.
/// Returns the input theme unchanged when the name does not exist in either
/// mode. The result is always re-synchronized.
pub fn update_theme_color_pair(
    theme: MainTheme,
    mode: ThemeMode,
    pair_name: &str,
    updates: ThemeColorPairUpdate,
) -> MainTheme {
    let Some(normalized) = normalize_theme_pair_name(pair_name) else {
        return theme;
    };

    let has_pair = theme
        .light
        .color_pairs
        .iter()
        .chain(theme.dark.color_pairs.iter())
        .any(|pair| pair.name == normalized);
    if !has_pair {
        return theme;
    }

    let next_label = updates
        .label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string);

    let update_palette_pairs = |current_mode: ThemeMode, pairs: &[ThemeColorPair]| {
        pairs
            .iter()
            .map(|pair| {
                if pair.name != normalized {
                    return pair.clone();
                }

                let update_colors = current_mode == mode;
                ThemeColorPair {
                    name: pair.name.clone(),
                    label: match (&next_label, pair.is_custom) {
                        (Some(label), true) => label.clone(),
                        _ => pair.label.clone(),
                    },
                    color: if update_colors {
                        ensure_theme_color(updates.color.as_deref(), &pair.color)
                    } else {
                        pair.color.clone()
                    },
                    foreground: if update_colors {
                        ensure_theme_color(updates.foreground.as_deref(), &pair.foreground)
                    } else {
                        pair.foreground.clone()
                    },
                    include_in_button_variant: if pair.is_custom {
                        updates
                            .include_in_button_variant
                            .unwrap_or(pair.include_in_button_variant)
                    } else {
                        false
                    },
                    is_custom: pair.is_custom,
                }
            })
            .collect::<Vec<_>>()
    };

    create_theme_from_palette_pairs(
        update_palette_pairs(ThemeMode::Light, &theme.light.color_pairs),
        update_palette_pairs(ThemeMode::Dark, &theme.dark.color_pairs),
    )
}

/// Add a custom pair to both palettes.
///
/// Fails (with the theme returned unchanged) when the name is invalid,
/// belongs to a built-in pair, collides with a reserved button variant, or
/// already exists. Omitted colors default to the theme's primary pair.
pub fn add_custom_theme_color_pair(
    theme: MainTheme,
    input: AddThemeColorPairInput,
) -> AddThemeColorPairResult {
    let Some(normalized) = normalize_theme_pair_name(&input.name) else {
        return AddThemeColorPairResult {
            theme,
            error: Some(AddThemeColorPairError::InvalidName),
        };
    };

    if is_built_in_pair_name(&normalized) {
        return AddThemeColorPairResult {
            theme,
            error: Some(AddThemeColorPairError::BuiltInName),
        };
    }

    if is_reserved_button_variant_name(&normalized) {
        return AddThemeColorPairResult {
            theme,
            error: Some(AddThemeColorPairError::ReservedVariantName),
        };
    }

    let already_exists = theme
        .light
        .color_pairs
        .iter()
        .chain(theme.dark.color_pairs.iter())
        .any(|pair| pair.name == normalized);
    if already_exists {
        return AddThemeColorPairResult {
            theme,
            error: Some(AddThemeColorPairError::DuplicateName),
        };
    }

    let label = input
        .label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| start_case(&normalized));

    let next_light_pair = create_custom_pair_for_palette(
        &theme.light,
        ThemeMode::Light,
        &normalized,
        &label,
        input.include_in_button_variant,
        input.color.as_deref(),
        input.foreground.as_deref(),
    );
    let next_dark_pair = create_custom_pair_for_palette(
        &theme.dark,
        ThemeMode::Dark,
        &normalized,
        &label,
        input.include_in_button_variant,
        input.color.as_deref(),
        input.foreground.as_deref(),
    );

    let mut light_pairs = theme.light.color_pairs;
    light_pairs.push(next_light_pair);
    let mut dark_pairs = theme.dark.color_pairs;
    dark_pairs.push(next_dark_pair);

    AddThemeColorPairResult {
        theme: create_theme_from_palette_pairs(light_pairs, dark_pairs),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_value(theme: &MainTheme) -> Value {
        serde_json::to_value(theme).unwrap()
    }

    // ==========================================================================
    // Name Normalization Tests
    // ==========================================================================

    #[test]
    fn test_normalize_pair_name() {
        assert_eq!(normalize_theme_pair_name("Brand").as_deref(), Some("brand"));
        assert_eq!(
            normalize_theme_pair_name("  My_Brand Color ").as_deref(),
            Some("my-brand-color")
        );
        assert_eq!(
            normalize_theme_pair_name("--brand--x--").as_deref(),
            Some("brand-x")
        );
        assert_eq!(
            normalize_theme_pair_name("a_@_b").as_deref(),
            Some("a-b")
        );
        assert_eq!(normalize_theme_pair_name("1brand"), None);
        assert_eq!(normalize_theme_pair_name("---"), None);
        assert_eq!(normalize_theme_pair_name(""), None);
    }

    #[test]
    fn test_start_case() {
        assert_eq!(start_case("brand"), "Brand");
        assert_eq!(start_case("sidebar-primary"), "Sidebar Primary");
    }

    // ==========================================================================
    // Default Theme Tests
    // ==========================================================================

    #[test]
    fn test_default_theme_is_valid() {
        let theme = create_default_main_theme();
        assert!(is_main_theme(&theme_value(&theme)));
        assert_eq!(theme.light.color_pairs.len(), 10);
        assert_eq!(theme.dark.color_pairs.len(), 10);
        assert_eq!(theme.light.color_pairs[0].name, "background");
        assert!(theme.light.color_pairs.iter().all(|pair| !pair.is_custom));
    }

    #[test]
    fn test_default_modes_differ() {
        let theme = create_default_main_theme();
        let light = get_theme_color_pair(&theme, ThemeMode::Light, "background").unwrap();
        let dark = get_theme_color_pair(&theme, ThemeMode::Dark, "background").unwrap();
        assert_ne!(light.color, dark.color);
    }

    // ==========================================================================
    // Validation Tests
    // ==========================================================================

    #[test]
    fn test_is_main_theme_accepts_empty_palettes() {
        let value = serde_json::json!({
            "light": { "colorPairs": [] },
            "dark": { "colorPairs": [] },
        });
        assert!(is_main_theme(&value));
    }

    #[test]
    fn test_is_main_theme_rejects_single_palette_shape() {
        assert!(!is_main_theme(&serde_json::json!({ "colorPairs": [] })));
        assert!(!is_main_theme(&serde_json::json!(null)));
        assert!(!is_main_theme(&serde_json::json!([])));
    }

    #[test]
    fn test_is_main_theme_rejects_unnormalized_names() {
        let mut value = theme_value(&create_default_main_theme());
        value["light"]["colorPairs"][0]["name"] = Value::String("Background".to_string());
        assert!(!is_main_theme(&value));
    }

    #[test]
    fn test_is_main_theme_rejects_mismatched_palettes() {
        let with_custom = add_custom_theme_color_pair(
            create_default_main_theme(),
            AddThemeColorPairInput {
                name: "brand".to_string(),
                ..Default::default()
            },
        )
        .theme;
        let mut value = theme_value(&with_custom);
        value["dark"]["colorPairs"]
            .as_array_mut()
            .unwrap()
            .pop();
        assert!(!is_main_theme(&value));
    }

    #[test]
    fn test_is_main_theme_rejects_invalid_colors() {
        let mut value = theme_value(&create_default_main_theme());
        value["light"]["colorPairs"][0]["color"] = Value::String("rgb(0 0 0)".to_string());
        assert!(!is_main_theme(&value));
    }

    // ==========================================================================
    // Parsing and Migration Tests
    // ==========================================================================

    #[test]
    fn test_parse_current_shape_round_trips() {
        let theme = create_default_main_theme();
        let raw = serde_json::to_string(&theme).unwrap();
        assert_eq!(parse_main_theme(&raw), Some(theme));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_main_theme("not json"), None);
        assert_eq!(parse_main_theme("42"), None);
        assert_eq!(parse_main_theme("{}"), None);
    }

    #[test]
    fn test_parse_drops_malformed_pairs_and_repairs_fields() {
        let raw = serde_json::json!({
            "light": {
                "colorPairs": [
                    { "name": "background", "color": "#010101", "foreground": "#fefefe" },
                    { "name": "???" },
                    "not-a-pair",
                    { "name": "brand", "color": "bogus", "includeInButtonVariant": true },
                ],
            },
        })
        .to_string();

        let theme = parse_main_theme(&raw).unwrap();
        assert!(is_main_theme(&theme_value(&theme)));

        let background = get_theme_color_pair(&theme, ThemeMode::Light, "background").unwrap();
        assert_eq!(background.color, "#010101");
        assert_eq!(background.label, "Background");
        assert!(!background.is_custom);

        // Invalid color falls back to the light primary default
        let brand = get_theme_color_pair(&theme, ThemeMode::Light, "brand").unwrap();
        let primary = default_theme_pair(ThemeMode::Light, "primary").unwrap();
        assert_eq!(brand.color, primary.color);
        assert_eq!(brand.label, "Brand");
        assert!(brand.is_custom);
        assert!(brand.include_in_button_variant);

        // Missing dark palette falls back to dark defaults, custom carried over
        let dark_brand = get_theme_color_pair(&theme, ThemeMode::Dark, "brand").unwrap();
        let dark_primary = default_theme_pair(ThemeMode::Dark, "primary").unwrap();
        assert_eq!(dark_brand.color, dark_primary.color);
    }

    #[test]
    fn test_parse_legacy_single_palette_shape() {
        let raw = serde_json::json!({
            "colorPairs": [
                {
                    "name": "background",
                    "label": "Background",
                    "color": "#010101",
                    "foreground": "#fefefe",
                    "includeInButtonVariant": false,
                    "isCustom": false,
                },
                {
                    "name": "brand",
                    "label": "Brand",
                    "color": "#112233",
                    "foreground": "#ffffff",
                    "includeInButtonVariant": true,
                    "isCustom": true,
                },
            ],
        })
        .to_string();

        let theme = parse_main_theme(&raw).unwrap();
        assert!(is_main_theme(&theme_value(&theme)));
        assert_eq!(
            get_theme_color_pair(&theme, ThemeMode::Light, "background").unwrap().color,
            "#010101"
        );
        assert_eq!(
            get_theme_color_pair(&theme, ThemeMode::Light, "brand").unwrap().color,
            "#112233"
        );

        // Dark palette is synthesized: defaults plus the custom pair filled
        // from the dark primary
        let dark_brand = get_theme_color_pair(&theme, ThemeMode::Dark, "brand").unwrap();
        let dark_primary = get_theme_color_pair(&theme, ThemeMode::Dark, "primary").unwrap();
        assert_eq!(dark_brand.color, dark_primary.color);
        assert!(dark_brand.include_in_button_variant);
    }

    #[test]
    fn test_parse_oldest_flat_shape() {
        let raw = serde_json::json!({
            "background": "#000000",
            "foreground": "#ffffff",
            "primary": "#111111",
            "primaryForeground": "#f5f5f5",
        })
        .to_string();

        let theme = parse_main_theme(&raw).unwrap();
        assert!(is_main_theme(&theme_value(&theme)));
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let background = get_theme_color_pair(&theme, mode, "background").unwrap();
            assert_eq!(background.color, "#000000");
            assert_eq!(background.foreground, "#ffffff");
            let primary = get_theme_color_pair(&theme, mode, "primary").unwrap();
            assert_eq!(primary.color, "#111111");
            assert_eq!(primary.foreground, "#f5f5f5");
        }

        // Untouched built-ins stay at their defaults
        let card = get_theme_color_pair(&theme, ThemeMode::Light, "card").unwrap();
        assert_eq!(card, default_theme_pair(ThemeMode::Light, "card").unwrap());
    }

    // ==========================================================================
    // Accessor Tests
    // ==========================================================================

    #[test]
    fn test_get_pair_falls_back_to_built_in_default() {
        let theme = MainTheme {
            light: ThemePalette { color_pairs: vec![] },
            dark: ThemePalette { color_pairs: vec![] },
        };
        let pair = get_theme_color_pair(&theme, ThemeMode::Light, "primary").unwrap();
        assert_eq!(pair, default_theme_pair(ThemeMode::Light, "primary").unwrap());
        assert_eq!(get_theme_color_pair(&theme, ThemeMode::Light, "nope"), None);
    }

    #[test]
    fn test_accessors_return_copies() {
        let theme = create_default_main_theme();
        let mut pairs = get_theme_color_pairs(&theme, ThemeMode::Light);
        pairs[0].color = "#123456".to_string();
        assert_ne!(theme.light.color_pairs[0].color, "#123456");
    }

    #[test]
    fn test_built_in_and_custom_accessors() {
        let result = add_custom_theme_color_pair(
            create_default_main_theme(),
            AddThemeColorPairInput {
                name: "brand".to_string(),
                ..Default::default()
            },
        );
        let theme = result.theme;
        assert_eq!(get_built_in_theme_color_pairs(&theme, ThemeMode::Light).len(), 10);
        let custom = get_custom_theme_color_pairs(&theme, ThemeMode::Light);
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].name, "brand");
    }

    // ==========================================================================
    // Update Tests
    // ==========================================================================

    #[test]
    fn test_update_targets_one_mode_only() {
        let theme = create_default_main_theme();
        let original_dark = get_theme_color_pair(&theme, ThemeMode::Dark, "primary").unwrap();

        let updated = update_theme_color_pair(
            theme,
            ThemeMode::Light,
            "primary",
            ThemeColorPairUpdate {
                color: Some("#123456".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            get_theme_color_pair(&updated, ThemeMode::Light, "primary").unwrap().color,
            "#123456"
        );
        assert_eq!(
            get_theme_color_pair(&updated, ThemeMode::Dark, "primary").unwrap().color,
            original_dark.color
        );

        let updated_both = update_theme_color_pair(
            updated,
            ThemeMode::Dark,
            "primary",
            ThemeColorPairUpdate {
                color: Some("#654321".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            get_theme_color_pair(&updated_both, ThemeMode::Dark, "primary").unwrap().color,
            "#654321"
        );
        assert_eq!(
            get_theme_color_pair(&updated_both, ThemeMode::Light, "primary").unwrap().color,
            "#123456"
        );
        assert!(is_main_theme(&theme_value(&updated_both)));
    }

    #[test]
    fn test_update_unknown_pair_is_a_noop() {
        let theme = create_default_main_theme();
        let updated = update_theme_color_pair(
            theme.clone(),
            ThemeMode::Light,
            "missing",
            ThemeColorPairUpdate {
                color: Some("#123456".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(updated, theme);
    }

    #[test]
    fn test_update_ignores_invalid_color() {
        let theme = create_default_main_theme();
        let original = get_theme_color_pair(&theme, ThemeMode::Light, "primary").unwrap();
        let updated = update_theme_color_pair(
            theme,
            ThemeMode::Light,
            "primary",
            ThemeColorPairUpdate {
                color: Some("rgb(1 2 3)".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            get_theme_color_pair(&updated, ThemeMode::Light, "primary").unwrap().color,
            original.color
        );
    }

    #[test]
    fn test_update_metadata_only_applies_to_custom_pairs() {
        let with_custom = add_custom_theme_color_pair(
            create_default_main_theme(),
            AddThemeColorPairInput {
                name: "brand".to_string(),
                ..Default::default()
            },
        )
        .theme;

        // Built-in pairs ignore label and button-variant updates
        let updated = update_theme_color_pair(
            with_custom,
            ThemeMode::Light,
            "primary",
            ThemeColorPairUpdate {
                label: Some("Renamed".to_string()),
                include_in_button_variant: Some(true),
                ..Default::default()
            },
        );
        let primary = get_theme_color_pair(&updated, ThemeMode::Light, "primary").unwrap();
        assert_eq!(primary.label, "Primary");
        assert!(!primary.include_in_button_variant);

        // Custom pairs accept them, synchronized across both modes
        let updated = update_theme_color_pair(
            updated,
            ThemeMode::Light,
            "brand",
            ThemeColorPairUpdate {
                label: Some("  Brand X  ".to_string()),
                include_in_button_variant: Some(true),
                ..Default::default()
            },
        );
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let brand = get_theme_color_pair(&updated, mode, "brand").unwrap();
            assert_eq!(brand.label, "Brand X");
            assert!(brand.include_in_button_variant);
        }
    }

    // ==========================================================================
    // Add Custom Pair Tests
    // ==========================================================================

    #[test]
    fn test_add_custom_pair_fills_from_primary() {
        let theme = create_default_main_theme();
        let light_primary = get_theme_color_pair(&theme, ThemeMode::Light, "primary").unwrap();
        let dark_primary = get_theme_color_pair(&theme, ThemeMode::Dark, "primary").unwrap();

        let result = add_custom_theme_color_pair(
            theme,
            AddThemeColorPairInput {
                name: "brand".to_string(),
                include_in_button_variant: true,
                ..Default::default()
            },
        );
        assert_eq!(result.error, None);

        let light_brand =
            get_theme_color_pair(&result.theme, ThemeMode::Light, "brand").unwrap();
        let dark_brand = get_theme_color_pair(&result.theme, ThemeMode::Dark, "brand").unwrap();
        assert_eq!(light_brand.color, light_primary.color);
        assert_eq!(dark_brand.color, dark_primary.color);
        assert!(light_brand.include_in_button_variant);
        assert!(dark_brand.include_in_button_variant);
        assert!(is_main_theme(&theme_value(&result.theme)));
    }

    #[test]
    fn test_add_custom_pair_rejections() {
        let theme = create_default_main_theme();

        let result = add_custom_theme_color_pair(
            theme,
            AddThemeColorPairInput {
                name: "!!!".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(result.error, Some(AddThemeColorPairError::InvalidName));

        let result = add_custom_theme_color_pair(
            result.theme,
            AddThemeColorPairInput {
                name: "primary".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(result.error, Some(AddThemeColorPairError::BuiltInName));

        let result = add_custom_theme_color_pair(
            result.theme,
            AddThemeColorPairInput {
                name: "ghost".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(result.error, Some(AddThemeColorPairError::ReservedVariantName));

        let result = add_custom_theme_color_pair(
            result.theme,
            AddThemeColorPairInput {
                name: "brand".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(result.error, None);
        let result = add_custom_theme_color_pair(
            result.theme,
            AddThemeColorPairInput {
                name: "brand".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(result.error, Some(AddThemeColorPairError::DuplicateName));
        assert_eq!(
            result.error.unwrap().to_string(),
            "A pair with this name already exists."
        );
    }

    #[test]
    fn test_add_custom_pair_with_explicit_colors() {
        let result = add_custom_theme_color_pair(
            create_default_main_theme(),
            AddThemeColorPairInput {
                name: "Brand".to_string(),
                label: Some("  Our Brand  ".to_string()),
                color: Some("#112233".to_string()),
                foreground: Some("oklch(100% 0 0)".to_string()),
                include_in_button_variant: false,
            },
        );
        assert_eq!(result.error, None);
        let brand = get_theme_color_pair(&result.theme, ThemeMode::Light, "brand").unwrap();
        assert_eq!(brand.label, "Our Brand");
        assert_eq!(brand.color, "#112233");
        assert_eq!(brand.foreground, "oklch(1 0 0)");
    }
}
