//! Color parsing, normalization, and hex/OKLCH conversion
//!
//! Theme colors are carried as canonical strings in one of two notations:
//! hex (`#rrggbb` or `#rrggbbaa`) or OKLCH functional notation
//! (`oklch(L C H)` / `oklch(L C H / A)`). Conversion between the two goes
//! through linear sRGB and the OKLab intermediate space.
//!
//! Every function in this module returns `None` for malformed input; a
//! fallback color is always the caller's responsibility.

/// sRGB gamma curve breakpoint (encoded side)
const SRGB_GAMMA_BREAKPOINT: f64 = 0.04045;

/// sRGB gamma curve breakpoint (linear side)
const LINEAR_GAMMA_BREAKPOINT: f64 = 0.0031308;

/// Chroma below this is treated as achromatic and the hue forced to 0
const ACHROMATIC_CHROMA_EPSILON: f64 = 1e-7;

/// A color as normalized [0, 1] sRGB channels plus alpha
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

/// A parsed OKLCH color; hue is normalized to [0, 360)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Oklch {
    l: f64,
    c: f64,
    h: f64,
    a: f64,
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

fn normalize_hue(value: f64) -> f64 {
    value.rem_euclid(360.0)
}

/// Format a channel value to at most 3 decimal places, with trailing zeros
/// trimmed and negative zero collapsed to `0`
fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut text = format!("{rounded:.3}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

fn channel_to_byte(value: f64) -> u8 {
    (clamp(value, 0.0, 1.0) * 255.0).round() as u8
}

fn format_hex(color: Rgba) -> String {
    let red = channel_to_byte(color.r);
    let green = channel_to_byte(color.g);
    let blue = channel_to_byte(color.b);
    let alpha = channel_to_byte(color.a);
    if alpha == 255 {
        format!("#{red:02x}{green:02x}{blue:02x}")
    } else {
        format!("#{red:02x}{green:02x}{blue:02x}{alpha:02x}")
    }
}

fn parse_hex(value: &str) -> Option<Rgba> {
    let digits = value.strip_prefix('#')?;
    if !matches!(digits.len(), 3 | 4 | 6 | 8)
        || !digits.chars().all(|ch| ch.is_ascii_hexdigit())
    {
        return None;
    }

    // Expand shorthand (#abc / #abcd) to full byte form
    let expanded: String = if digits.len() <= 4 {
        digits
            .chars()
            .flat_map(|ch| [ch, ch])
            .collect::<String>()
            .to_ascii_lowercase()
    } else {
        digits.to_ascii_lowercase()
    };

    let mut bytes = [0u8, 0, 0, 255];
    for (index, byte) in bytes
        .iter_mut()
        .enumerate()
        .take(expanded.len() / 2)
    {
        *byte = u8::from_str_radix(&expanded[index * 2..index * 2 + 2], 16).ok()?;
    }

    Some(Rgba {
        r: f64::from(bytes[0]) / 255.0,
        g: f64::from(bytes[1]) / 255.0,
        b: f64::from(bytes[2]) / 255.0,
        a: f64::from(bytes[3]) / 255.0,
    })
}

/// Check the restricted numeric grammar: optional sign, digits with at most
/// one decimal point, no exponent
fn is_plain_number(token: &str) -> bool {
    let digits = token
        .strip_prefix(['+', '-'])
        .unwrap_or(token);
    if digits.is_empty() {
        return false;
    }

    let mut seen_dot = false;
    let mut seen_digit = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

fn parse_numeric_token(token: &str, allow_percent: bool) -> Option<f64> {
    let trimmed = token.trim();
    if allow_percent {
        if let Some(stripped) = trimmed.strip_suffix('%') {
            if is_plain_number(stripped) {
                return stripped.parse::<f64>().ok().map(|value| value / 100.0);
            }
        }
    }
    if is_plain_number(trimmed) {
        return trimmed.parse().ok();
    }
    None
}

fn parse_oklch(value: &str) -> Option<Oklch> {
    let trimmed = value.trim();
    let head = trimmed.get(..6)?;
    if !head.eq_ignore_ascii_case("oklch(") || !trimmed.ends_with(')') {
        return None;
    }

    let raw_content = trimmed[6..trimmed.len() - 1].trim();
    let slash_index = raw_content.find('/');
    if let Some(index) = slash_index {
        if raw_content.rfind('/') != Some(index) {
            return None;
        }
    }

    let (channel_part, alpha_part) = match slash_index {
        None => (raw_content, None),
        Some(index) => (&raw_content[..index], Some(raw_content[index + 1..].trim())),
    };

    let channels: Vec<&str> = channel_part.split_whitespace().collect();
    if channels.len() != 3 {
        return None;
    }

    let lightness = parse_numeric_token(channels[0], true)?;
    let chroma = parse_numeric_token(channels[1], false)?;
    let hue = parse_numeric_token(channels[2], false)?;
    if !(0.0..=1.0).contains(&lightness) || chroma < 0.0 {
        return None;
    }

    let alpha = match alpha_part {
        None => 1.0,
        Some(part) if part.is_empty() => 1.0,
        Some(part) => parse_numeric_token(part, true)?,
    };
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        return None;
    }

    Some(Oklch {
        l: lightness,
        c: chroma,
        h: normalize_hue(hue),
        a: alpha,
    })
}

fn format_oklch(color: Oklch) -> String {
    let lightness = format_number(color.l);
    let chroma = format_number(color.c);
    let hue = format_number(color.h);
    if color.a >= 1.0 {
        format!("oklch({lightness} {chroma} {hue})")
    } else {
        let alpha = format_number(color.a);
        format!("oklch({lightness} {chroma} {hue} / {alpha})")
    }
}

fn normalize_hex_color(value: &str) -> Option<String> {
    parse_hex(value).map(format_hex)
}

fn normalize_oklch_color(value: &str) -> Option<String> {
    parse_oklch(value).map(format_oklch)
}

fn srgb_channel_to_linear(value: f64) -> f64 {
    if value <= SRGB_GAMMA_BREAKPOINT {
        return value / 12.92;
    }
    ((value + 0.055) / 1.055).powf(2.4)
}

fn linear_channel_to_srgb(value: f64) -> f64 {
    if value <= LINEAR_GAMMA_BREAKPOINT {
        return 12.92 * value;
    }
    1.055 * value.powf(1.0 / 2.4) - 0.055
}

fn oklch_to_hex(value: &str) -> Option<String> {
    let parsed = parse_oklch(value)?;

    let hue_radians = parsed.h.to_radians();
    let a = parsed.c * hue_radians.cos();
    let b = parsed.c * hue_radians.sin();

    let l_prime = parsed.l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_prime = parsed.l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_prime = parsed.l - 0.089_484_177_5 * a - 1.291_485_548 * b;

    let l = l_prime.powi(3);
    let m = m_prime.powi(3);
    let s = s_prime.powi(3);

    let linear_red = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
    let linear_green = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
    let linear_blue = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701 * s;

    Some(format_hex(Rgba {
        r: linear_channel_to_srgb(clamp(linear_red, 0.0, 1.0)),
        g: linear_channel_to_srgb(clamp(linear_green, 0.0, 1.0)),
        b: linear_channel_to_srgb(clamp(linear_blue, 0.0, 1.0)),
        a: parsed.a,
    }))
}

fn hex_to_oklch(value: &str) -> Option<String> {
    let parsed = parse_hex(value)?;

    let linear_red = srgb_channel_to_linear(parsed.r);
    let linear_green = srgb_channel_to_linear(parsed.g);
    let linear_blue = srgb_channel_to_linear(parsed.b);

    let l = 0.412_221_470_8 * linear_red
        + 0.536_332_536_3 * linear_green
        + 0.051_445_992_9 * linear_blue;
    let m = 0.211_903_498_2 * linear_red
        + 0.680_699_545_1 * linear_green
        + 0.107_396_956_6 * linear_blue;
    let s = 0.088_302_461_9 * linear_red
        + 0.281_718_837_6 * linear_green
        + 0.629_978_700_5 * linear_blue;

    let l_prime = l.cbrt();
    let m_prime = m.cbrt();
    let s_prime = s.cbrt();

    let lightness =
        0.210_454_255_3 * l_prime + 0.793_617_785 * m_prime - 0.004_072_046_8 * s_prime;
    let a = 1.977_998_495_1 * l_prime - 2.428_592_205 * m_prime + 0.450_593_709_9 * s_prime;
    let b = 0.025_904_037_1 * l_prime + 0.782_771_766_2 * m_prime - 0.808_675_766 * s_prime;

    let chroma = a.hypot(b);
    let hue = if chroma <= ACHROMATIC_CHROMA_EPSILON {
        0.0
    } else {
        normalize_hue(b.atan2(a).to_degrees())
    };

    Some(format_oklch(Oklch {
        l: clamp(lightness, 0.0, 1.0),
        c: chroma,
        h: hue,
        a: parsed.a,
    }))
}

/// Normalize a color string to its canonical form.
///
/// Hex input is expanded to full byte form with the alpha byte omitted when
/// opaque; OKLCH input is reformatted with 3-decimal channels and the alpha
/// segment omitted when >= 1. Returns `None` for anything else.
pub fn normalize_theme_color(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    normalize_hex_color(trimmed).or_else(|| normalize_oklch_color(trimmed))
}

/// Check whether a string is a valid theme color in either notation
pub fn is_theme_color(value: &str) -> bool {
    normalize_theme_color(value).is_some()
}

/// Convert a theme color to canonical hex, identity-normalizing hex input
pub fn to_hex_color(value: &str) -> Option<String> {
    normalize_hex_color(value).or_else(|| oklch_to_hex(value))
}

/// Convert a theme color to canonical OKLCH, identity-normalizing OKLCH input
pub fn to_oklch_color(value: &str) -> Option<String> {
    normalize_oklch_color(value).or_else(|| hex_to_oklch(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_bytes(value: &str) -> Vec<u8> {
        let digits = value.strip_prefix('#').unwrap();
        (0..digits.len() / 2)
            .map(|index| u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).unwrap())
            .collect()
    }

    // ==========================================================================
    // Normalization Tests
    // ==========================================================================

    #[test]
    fn test_normalize_hex_shorthand() {
        assert_eq!(normalize_theme_color("#ABC").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_theme_color("#abcd").as_deref(), Some("#aabbccdd"));
        assert_eq!(normalize_theme_color(" #FFFFFF ").as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_normalize_hex_drops_opaque_alpha() {
        assert_eq!(normalize_theme_color("#aabbccff").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_theme_color("#aabbcc80").as_deref(), Some("#aabbcc80"));
    }

    #[test]
    fn test_normalize_rejects_malformed_hex() {
        assert_eq!(normalize_theme_color("#ab"), None);
        assert_eq!(normalize_theme_color("#abcde"), None);
        assert_eq!(normalize_theme_color("#gggggg"), None);
        assert_eq!(normalize_theme_color("aabbcc"), None);
        assert_eq!(normalize_theme_color(""), None);
        assert_eq!(normalize_theme_color("   "), None);
    }

    #[test]
    fn test_normalize_oklch() {
        assert_eq!(
            normalize_theme_color("oklch(100% 0 0)").as_deref(),
            Some("oklch(1 0 0)")
        );
        assert_eq!(
            normalize_theme_color("OKLCH(0.5 0.1 720)").as_deref(),
            Some("oklch(0.5 0.1 0)")
        );
        assert_eq!(
            normalize_theme_color("oklch(0.5 0.1 -90)").as_deref(),
            Some("oklch(0.5 0.1 270)")
        );
        assert_eq!(
            normalize_theme_color("oklch(0.5 0.1 30 / 50%)").as_deref(),
            Some("oklch(0.5 0.1 30 / 0.5)")
        );
        assert_eq!(
            normalize_theme_color("oklch(0.5 0.1 30 / 1)").as_deref(),
            Some("oklch(0.5 0.1 30)")
        );
    }

    #[test]
    fn test_normalize_rejects_malformed_oklch() {
        assert_eq!(normalize_theme_color("oklch(0.5 0.1)"), None);
        assert_eq!(normalize_theme_color("oklch(0.5 0.1 30 40)"), None);
        assert_eq!(normalize_theme_color("oklch(1.5 0.1 30)"), None);
        assert_eq!(normalize_theme_color("oklch(0.5 -0.1 30)"), None);
        assert_eq!(normalize_theme_color("oklch(0.5 0.1 30 / 2)"), None);
        assert_eq!(normalize_theme_color("oklch(0.5 0.1 30 / 0.5 / 0.5)"), None);
        assert_eq!(normalize_theme_color("oklch(a b c)"), None);
        assert_eq!(normalize_theme_color("oklch(1e-1 0 0)"), None);
        assert_eq!(normalize_theme_color("rgb(0 0 0)"), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["#ABC", "#aabbcc80", "oklch(100% 0 0)", "oklch(0.62 0.2 29.5 / 25%)"] {
            let once = normalize_theme_color(input).unwrap();
            let twice = normalize_theme_color(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    // ==========================================================================
    // Conversion Tests
    // ==========================================================================

    #[test]
    fn test_white_and_black_round_trip_exactly() {
        assert_eq!(to_oklch_color("#ffffff").as_deref(), Some("oklch(1 0 0)"));
        assert_eq!(to_hex_color("oklch(1 0 0)").as_deref(), Some("#ffffff"));
        assert_eq!(to_oklch_color("#000000").as_deref(), Some("oklch(0 0 0)"));
        assert_eq!(to_hex_color("oklch(0 0 0)").as_deref(), Some("#000000"));
    }

    #[test]
    fn test_identity_normalization_in_target_notation() {
        assert_eq!(to_hex_color("#ABC").as_deref(), Some("#aabbcc"));
        assert_eq!(
            to_oklch_color("oklch(100% 0 0)").as_deref(),
            Some("oklch(1 0 0)")
        );
    }

    #[test]
    fn test_alpha_survives_conversion() {
        let oklch = to_oklch_color("#ffffff80").unwrap();
        assert!(oklch.contains(" / 0.502"), "got {oklch}");
        let hex = to_hex_color(&oklch).unwrap();
        assert_eq!(hex, "#ffffff80");
    }

    #[test]
    fn test_hex_round_trip_within_one_byte_per_channel() {
        for input in ["#9d4edd", "#06ffa5", "#1e3a5f", "#ef4444", "#123456", "#f9fafb"] {
            let oklch = to_oklch_color(input).unwrap();
            let back = to_hex_color(&oklch).unwrap();
            let expected = hex_bytes(input);
            let actual = hex_bytes(&back);
            for (channel, (a, b)) in expected.iter().zip(actual.iter()).enumerate() {
                assert!(
                    a.abs_diff(*b) <= 1,
                    "{input} -> {oklch} -> {back}: channel {channel} off by more than 1"
                );
            }
        }
    }

    #[test]
    fn test_conversion_rejects_invalid_input() {
        assert_eq!(to_hex_color("not-a-color"), None);
        assert_eq!(to_oklch_color("#ab"), None);
    }

    // ==========================================================================
    // Formatting Tests
    // ==========================================================================

    #[test]
    fn test_format_number_collapses_negative_zero() {
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.2165), "0.217");
        assert_eq!(format_number(56.043), "56.043");
    }

    #[test]
    fn test_plain_number_grammar() {
        assert!(is_plain_number("1"));
        assert!(is_plain_number("-0.5"));
        assert!(is_plain_number("+.5"));
        assert!(is_plain_number("5."));
        assert!(!is_plain_number("1e5"));
        assert!(!is_plain_number("."));
        assert!(!is_plain_number(""));
        assert!(!is_plain_number("1.2.3"));
    }
}
