//! Built-in semantic pair definitions and default variable tables
//!
//! These tables are read-only process-wide data: the ten semantic pairs
//! every theme must contain, the `@theme inline` token mapping emitted at
//! the top of every CSS export, and the default light/dark variable values
//! a fresh theme starts from.

use crate::theme::ThemeMode;

/// Definition of one built-in semantic pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BuiltInPairDefinition {
    /// Normalized pair name (also the palette key)
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// CSS variable token holding the pair's background color
    pub color_token: &'static str,
    /// CSS variable token holding the pair's foreground color
    pub foreground_token: &'static str,
}

/// The ten built-in pairs, in canonical palette order
pub(crate) const BUILT_IN_PAIR_DEFINITIONS: &[BuiltInPairDefinition] = &[
    BuiltInPairDefinition {
        name: "background",
        label: "Background",
        color_token: "background",
        foreground_token: "foreground",
    },
    BuiltInPairDefinition {
        name: "card",
        label: "Card",
        color_token: "card",
        foreground_token: "card-foreground",
    },
    BuiltInPairDefinition {
        name: "popover",
        label: "Popover",
        color_token: "popover",
        foreground_token: "popover-foreground",
    },
    BuiltInPairDefinition {
        name: "primary",
        label: "Primary",
        color_token: "primary",
        foreground_token: "primary-foreground",
    },
    BuiltInPairDefinition {
        name: "secondary",
        label: "Secondary",
        color_token: "secondary",
        foreground_token: "secondary-foreground",
    },
    BuiltInPairDefinition {
        name: "muted",
        label: "Muted",
        color_token: "muted",
        foreground_token: "muted-foreground",
    },
    BuiltInPairDefinition {
        name: "accent",
        label: "Accent",
        color_token: "accent",
        foreground_token: "accent-foreground",
    },
    BuiltInPairDefinition {
        name: "sidebar",
        label: "Sidebar",
        color_token: "sidebar",
        foreground_token: "sidebar-foreground",
    },
    BuiltInPairDefinition {
        name: "sidebar-primary",
        label: "Sidebar Primary",
        color_token: "sidebar-primary",
        foreground_token: "sidebar-primary-foreground",
    },
    BuiltInPairDefinition {
        name: "sidebar-accent",
        label: "Sidebar Accent",
        color_token: "sidebar-accent",
        foreground_token: "sidebar-accent-foreground",
    },
];

/// Names a custom pair may not take because the exported button component
/// already defines a variant with that name
pub(crate) const RESERVED_BUTTON_VARIANT_NAMES: &[&str] =
    &["default", "destructive", "outline", "secondary", "ghost", "link"];

/// Fallback color when a default-table lookup misses
pub(crate) const FALLBACK_COLOR: &str = "#111827";

/// Fallback foreground when a default-table lookup misses
pub(crate) const FALLBACK_FOREGROUND: &str = "#f9fafb";

/// Fixed lines of the `@theme inline` block, before any custom pair lines
pub(crate) const THEME_INLINE_BASE_LINES: &[&str] = &[
    "  --radius-sm: calc(var(--radius) - 4px);",
    "  --radius-md: calc(var(--radius) - 2px);",
    "  --radius-lg: var(--radius);",
    "  --radius-xl: calc(var(--radius) + 4px);",
    "  --radius-2xl: calc(var(--radius) + 8px);",
    "  --radius-3xl: calc(var(--radius) + 12px);",
    "  --radius-4xl: calc(var(--radius) + 16px);",
    "  --color-background: var(--background);",
    "  --color-foreground: var(--foreground);",
    "  --color-card: var(--card);",
    "  --color-card-foreground: var(--card-foreground);",
    "  --color-popover: var(--popover);",
    "  --color-popover-foreground: var(--popover-foreground);",
    "  --color-primary: var(--primary);",
    "  --color-primary-foreground: var(--primary-foreground);",
    "  --color-secondary: var(--secondary);",
    "  --color-secondary-foreground: var(--secondary-foreground);",
    "  --color-muted: var(--muted);",
    "  --color-muted-foreground: var(--muted-foreground);",
    "  --color-accent: var(--accent);",
    "  --color-accent-foreground: var(--accent-foreground);",
    "  --color-destructive: var(--destructive);",
    "  --color-border: var(--border);",
    "  --color-input: var(--input);",
    "  --color-ring: var(--ring);",
    "  --color-chart-1: var(--chart-1);",
    "  --color-chart-2: var(--chart-2);",
    "  --color-chart-3: var(--chart-3);",
    "  --color-chart-4: var(--chart-4);",
    "  --color-chart-5: var(--chart-5);",
    "  --color-sidebar: var(--sidebar);",
    "  --color-sidebar-foreground: var(--sidebar-foreground);",
    "  --color-sidebar-primary: var(--sidebar-primary);",
    "  --color-sidebar-primary-foreground: var(--sidebar-primary-foreground);",
    "  --color-sidebar-accent: var(--sidebar-accent);",
    "  --color-sidebar-accent-foreground: var(--sidebar-accent-foreground);",
    "  --color-sidebar-border: var(--sidebar-border);",
    "  --color-sidebar-ring: var(--sidebar-ring);",
];

/// Default light-mode variable values, in `:root` emission order
pub(crate) const LIGHT_THEME_VARIABLES: &[(&str, &str)] = &[
    ("radius", "0.625rem"),
    ("background", "oklch(1 0 0)"),
    ("foreground", "oklch(0.147 0.004 49.25)"),
    ("card", "oklch(1 0 0)"),
    ("card-foreground", "oklch(0.147 0.004 49.25)"),
    ("popover", "oklch(1 0 0)"),
    ("popover-foreground", "oklch(0.147 0.004 49.25)"),
    ("primary", "oklch(0.216 0.006 56.043)"),
    ("primary-foreground", "oklch(0.985 0.001 106.423)"),
    ("secondary", "oklch(0.97 0.001 106.424)"),
    ("secondary-foreground", "oklch(0.216 0.006 56.043)"),
    ("muted", "oklch(0.97 0.001 106.424)"),
    ("muted-foreground", "oklch(0.553 0.013 58.071)"),
    ("accent", "oklch(0.97 0.001 106.424)"),
    ("accent-foreground", "oklch(0.216 0.006 56.043)"),
    ("destructive", "oklch(0.577 0.245 27.325)"),
    ("border", "oklch(0.923 0.003 48.717)"),
    ("input", "oklch(0.923 0.003 48.717)"),
    ("ring", "oklch(0.709 0.01 56.259)"),
    ("chart-1", "oklch(0.646 0.222 41.116)"),
    ("chart-2", "oklch(0.6 0.118 184.704)"),
    ("chart-3", "oklch(0.398 0.07 227.392)"),
    ("chart-4", "oklch(0.828 0.189 84.429)"),
    ("chart-5", "oklch(0.769 0.188 70.08)"),
    ("sidebar", "oklch(0.985 0.001 106.423)"),
    ("sidebar-foreground", "oklch(0.147 0.004 49.25)"),
    ("sidebar-primary", "oklch(0.216 0.006 56.043)"),
    ("sidebar-primary-foreground", "oklch(0.985 0.001 106.423)"),
    ("sidebar-accent", "oklch(0.97 0.001 106.424)"),
    ("sidebar-accent-foreground", "oklch(0.216 0.006 56.043)"),
    ("sidebar-border", "oklch(0.923 0.003 48.717)"),
    ("sidebar-ring", "oklch(0.709 0.01 56.259)"),
];

/// Default dark-mode variable values, in `.dark` emission order
pub(crate) const DARK_THEME_VARIABLES: &[(&str, &str)] = &[
    ("background", "oklch(0.147 0.004 49.25)"),
    ("foreground", "oklch(0.985 0.001 106.423)"),
    ("card", "oklch(0.216 0.006 56.043)"),
    ("card-foreground", "oklch(0.985 0.001 106.423)"),
    ("popover", "oklch(0.216 0.006 56.043)"),
    ("popover-foreground", "oklch(0.985 0.001 106.423)"),
    ("primary", "oklch(0.923 0.003 48.717)"),
    ("primary-foreground", "oklch(0.216 0.006 56.043)"),
    ("secondary", "oklch(0.268 0.007 34.298)"),
    ("secondary-foreground", "oklch(0.985 0.001 106.423)"),
    ("muted", "oklch(0.268 0.007 34.298)"),
    ("muted-foreground", "oklch(0.709 0.01 56.259)"),
    ("accent", "oklch(0.268 0.007 34.298)"),
    ("accent-foreground", "oklch(0.985 0.001 106.423)"),
    ("destructive", "oklch(0.704 0.191 22.216)"),
    ("border", "oklch(1 0 0 / 10%)"),
    ("input", "oklch(1 0 0 / 15%)"),
    ("ring", "oklch(0.553 0.013 58.071)"),
    ("chart-1", "oklch(0.488 0.243 264.376)"),
    ("chart-2", "oklch(0.696 0.17 162.48)"),
    ("chart-3", "oklch(0.769 0.188 70.08)"),
    ("chart-4", "oklch(0.627 0.265 303.9)"),
    ("chart-5", "oklch(0.645 0.246 16.439)"),
    ("sidebar", "oklch(0.216 0.006 56.043)"),
    ("sidebar-foreground", "oklch(0.985 0.001 106.423)"),
    ("sidebar-primary", "oklch(0.488 0.243 264.376)"),
    ("sidebar-primary-foreground", "oklch(0.985 0.001 106.423)"),
    ("sidebar-accent", "oklch(0.268 0.007 34.298)"),
    ("sidebar-accent-foreground", "oklch(0.985 0.001 106.423)"),
    ("sidebar-border", "oklch(1 0 0 / 10%)"),
    ("sidebar-ring", "oklch(0.553 0.013 58.071)"),
];

/// Look up a built-in pair definition by normalized name
pub(crate) fn built_in_definition(name: &str) -> Option<&'static BuiltInPairDefinition> {
    BUILT_IN_PAIR_DEFINITIONS
        .iter()
        .find(|definition| definition.name == name)
}

/// Check whether a normalized name belongs to a built-in pair
pub(crate) fn is_built_in_pair_name(name: &str) -> bool {
    built_in_definition(name).is_some()
}

/// Check whether a normalized name collides with a button variant
pub(crate) fn is_reserved_button_variant_name(name: &str) -> bool {
    RESERVED_BUTTON_VARIANT_NAMES.contains(&name)
}

/// Default variable table for a mode
pub(crate) fn theme_variables(mode: ThemeMode) -> &'static [(&'static str, &'static str)] {
    match mode {
        ThemeMode::Light => LIGHT_THEME_VARIABLES,
        ThemeMode::Dark => DARK_THEME_VARIABLES,
    }
}

/// Look up a default variable value for a mode
pub(crate) fn theme_variable(mode: ThemeMode, token: &str) -> Option<&'static str> {
    theme_variables(mode)
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, value)| *value)
}
