//! CSS and component-source generation
//!
//! Turns a [`MainTheme`] into the two deliverable artifacts: a stylesheet
//! (`@theme inline` mapping block plus `:root` and `.dark` variable blocks)
//! and a button component source file whose variant map reflects the
//! theme's opted-in custom pairs. Both generators are pure functions of the
//! theme.

use serde::{Deserialize, Serialize};

use crate::builtin::{self, built_in_definition, THEME_INLINE_BASE_LINES};
use crate::color::{to_hex_color, to_oklch_color};
use crate::theme::{
    get_custom_theme_color_pairs, get_theme_color_pairs, MainTheme, ThemeColorPair, ThemeMode,
};

// =============================================================================
// Export Format
// =============================================================================

/// Target color notation for the generated stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CssExportColorFormat {
    /// Emit every color as `oklch(...)`
    #[default]
    Oklch,
    /// Emit every color as a hex literal
    Hex,
}

/// Convert a single value to the requested notation. Values that cannot be
/// converted (radius lengths, `calc()` expressions) pass through unchanged.
fn format_color_for_export(value: &str, color_format: CssExportColorFormat) -> String {
    let converted = match color_format {
        CssExportColorFormat::Hex => to_hex_color(value),
        CssExportColorFormat::Oklch => to_oklch_color(value),
    };
    converted.unwrap_or_else(|| value.to_string())
}

// =============================================================================
// Variable Assembly
// =============================================================================

fn pair_token_names(pair: &ThemeColorPair) -> (String, String) {
    match built_in_definition(&pair.name) {
        Some(definition) => (
            definition.color_token.to_string(),
            definition.foreground_token.to_string(),
        ),
        None => (pair.name.clone(), format!("{}-foreground", pair.name)),
    }
}

/// The full ordered variable list for one mode: the base table with pair
/// colors overlaid, followed by custom-pair tokens
fn theme_variables_with_overrides(theme: &MainTheme, mode: ThemeMode) -> Vec<(String, String)> {
    let base_variables = builtin::theme_variables(mode);

    let mut overrides: Vec<(String, String)> = Vec::new();
    for pair in get_theme_color_pairs(theme, mode) {
        let (color_token, foreground_token) = pair_token_names(&pair);
        overrides.push((color_token, pair.color.clone()));
        overrides.push((foreground_token, pair.foreground.clone()));
    }
    let lookup = |token: &str| -> Option<String> {
        overrides
            .iter()
            .rev()
            .find(|(name, _)| name == token)
            .map(|(_, value)| value.clone())
    };

    let mut variables: Vec<(String, String)> = base_variables
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                lookup(name).unwrap_or_else(|| value.to_string()),
            )
        })
        .collect();

    for pair in get_custom_theme_color_pairs(theme, mode) {
        let (color_token, foreground_token) = pair_token_names(&pair);
        let color = lookup(&color_token).unwrap_or_else(|| pair.color.clone());
        let foreground = lookup(&foreground_token).unwrap_or_else(|| pair.foreground.clone());
        variables.push((color_token, color));
        variables.push((foreground_token, foreground));
    }

    variables
}

fn format_css_variable_block(selector: &str, variables: &[(String, String)]) -> String {
    let lines: Vec<String> = variables
        .iter()
        .map(|(name, value)| format!("  --{}: {};", name, value))
        .collect();
    format!("{} {{\n{}\n}}", selector, lines.join("\n"))
}

fn format_theme_inline_block(theme: &MainTheme) -> String {
    let mut lines: Vec<String> = THEME_INLINE_BASE_LINES
        .iter()
        .map(|line| line.to_string())
        .collect();

    for pair in get_custom_theme_color_pairs(theme, ThemeMode::Light) {
        lines.push(format!("  --color-{}: var(--{});", pair.name, pair.name));
        lines.push(format!(
            "  --color-{}-foreground: var(--{}-foreground);",
            pair.name, pair.name
        ));
    }

    format!("@theme inline {{\n{}\n}}", lines.join("\n"))
}

// =============================================================================
// Stylesheet Export
// =============================================================================

/// Render the full stylesheet for a theme.
///
/// Three blocks joined by blank lines: the `@theme inline` token mapping,
/// `:root` with the light variables, and `.dark` with the dark variables.
pub fn get_main_theme_css(theme: &MainTheme, color_format: CssExportColorFormat) -> String {
    let map_for_export = |variables: Vec<(String, String)>| -> Vec<(String, String)> {
        variables
            .into_iter()
            .map(|(name, value)| (name, format_color_for_export(&value, color_format)))
            .collect()
    };

    let light_variables = map_for_export(theme_variables_with_overrides(theme, ThemeMode::Light));
    let dark_variables = map_for_export(theme_variables_with_overrides(theme, ThemeMode::Dark));

    [
        format_theme_inline_block(theme),
        format_css_variable_block(":root", &light_variables),
        format_css_variable_block(".dark", &dark_variables),
    ]
    .join("\n\n")
}

// =============================================================================
// Component Export
// =============================================================================

const BUTTON_COMPONENT_HEAD: &str = r##"import * as React from 'react'
import { cva } from 'class-variance-authority'
import type { VariantProps } from 'class-variance-authority'
import { Slot } from 'radix-ui'

import { cn } from '@/lib/utils'

const buttonVariants = cva(
  "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-all disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-[3px] aria-invalid:ring-destructive/20 dark:aria-invalid:ring-destructive/40 aria-invalid:border-destructive",
  {
    variants: {
      variant: {
        default: 'bg-primary text-primary-foreground hover:bg-primary/90',
        destructive:
          'bg-destructive text-white hover:bg-destructive/90 focus-visible:ring-destructive/20 dark:focus-visible:ring-destructive/40 dark:bg-destructive/60',
        outline:
          'border bg-background shadow-xs hover:bg-accent hover:text-accent-foreground dark:bg-input/30 dark:border-input dark:hover:bg-input/50',
        secondary:
          'bg-secondary text-secondary-foreground hover:bg-secondary/80',
        ghost:
          'hover:bg-accent hover:text-accent-foreground dark:hover:bg-accent/50',
        link: 'text-primary underline-offset-4 hover:underline',"##;

const BUTTON_COMPONENT_TAIL: &str = r##"
      },
      size: {
        default: 'h-9 px-4 py-2 has-[>svg]:px-3',
        xs: "h-6 gap-1 rounded-md px-2 text-xs has-[>svg]:px-1.5 [&_svg:not([class*='size-'])]:size-3",
        sm: 'h-8 rounded-md gap-1.5 px-3 has-[>svg]:px-2.5',
        lg: 'h-10 rounded-md px-6 has-[>svg]:px-4',
        icon: 'size-9',
        'icon-xs': "size-6 rounded-md [&_svg:not([class*='size-'])]:size-3",
        'icon-sm': 'size-8',
        'icon-lg': 'size-10',
      },
    },
    defaultVariants: {
      variant: 'default',
      size: 'default',
    },
  },
)

function Button({
  className,
  variant = 'default',
  size = 'default',
  asChild = false,
  ...props
}: React.ComponentProps<'button'> &
  VariantProps<typeof buttonVariants> & {
    asChild?: boolean
  }) {
  const Comp = asChild ? Slot.Root : 'button'

  return (
    <Comp
      data-slot="button"
      data-variant={variant}
      data-size={size}
      className={cn(buttonVariants({ variant, size, className }))}
      {...props}
    />
  )
}

export { Button, buttonVariants }
"##;

/// Render the button component source, inserting one cva variant line per
/// custom pair that opted into the button-variant export
pub fn get_main_theme_component_tsx(theme: &MainTheme) -> String {
    let custom_variant_lines: Vec<String> = get_custom_theme_color_pairs(theme, ThemeMode::Light)
        .iter()
        .filter(|pair| pair.include_in_button_variant)
        .map(|pair| {
            format!(
                "        '{}': 'bg-{} text-{}-foreground hover:bg-{}/90',",
                pair.name, pair.name, pair.name, pair.name
            )
        })
        .collect();

    let custom_variant_block = if custom_variant_lines.is_empty() {
        String::new()
    } else {
        format!("\n{}", custom_variant_lines.join("\n"))
    };

    format!(
        "{}{}{}",
        BUTTON_COMPONENT_HEAD, custom_variant_block, BUTTON_COMPONENT_TAIL
    )
}
