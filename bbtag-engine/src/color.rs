use regex::Regex;
use std::sync::OnceLock;

use crate::error::{BbError, BbResult};

fn rgb_regex() -> &'static Regex {
    static RGB_REGEX: OnceLock<Regex> = OnceLock::new();
    RGB_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^rgb\((\d{1,3}%?),(\d{1,3}%?),(\d{1,3}%?)\)$").unwrap()
    })
}

fn hex_regex() -> &'static Regex {
    static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
    HEX_REGEX.get_or_init(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap())
}

/// Convert a CSS colour as reported by the picker into the upper-case
/// six-digit hex used by `[color=...]`.
///
/// Accepts `rgb(r, g, b)` (components may be percentages), `#abc` and
/// `#aabbcc`, with or without the `#`.
pub fn to_hex(color: &str) -> BbResult<String> {
    let compact: String = color.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(caps) = rgb_regex().captures(&compact) {
        let mut hex = String::with_capacity(6);
        for idx in 1..=3 {
            let component = component_value(color, &caps[idx])?;
            hex.push_str(&format!("{:02X}", component));
        }
        return Ok(hex);
    }

    if let Some(caps) = hex_regex().captures(&compact) {
        let digits = &caps[1];
        let hex = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };
        return Ok(hex.to_uppercase());
    }

    Err(BbError::InvalidColor {
        value: color.to_string(),
        reason: "expected rgb(r, g, b) or a hex colour".to_string(),
    })
}

fn component_value(color: &str, component: &str) -> BbResult<u8> {
    let out_of_range = || BbError::InvalidColor {
        value: color.to_string(),
        reason: format!("component '{}' is out of range", component),
    };

    let value = match component.strip_suffix('%') {
        Some(percent) => {
            let percent: f64 = percent.parse().map_err(|_| out_of_range())?;
            (percent * 2.55).round()
        }
        None => component.parse::<f64>().map_err(|_| out_of_range())?,
    };

    if value > 255.0 {
        return Err(out_of_range());
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb() {
        assert_eq!(to_hex("rgb(255, 0, 51)").unwrap(), "FF0033");
        assert_eq!(to_hex("RGB(0,0,0)").unwrap(), "000000");
    }

    #[test]
    fn test_rgb_percentages() {
        assert_eq!(to_hex("rgb(100%, 0%, 100%)").unwrap(), "FF00FF");
    }

    #[test]
    fn test_short_and_long_hex() {
        assert_eq!(to_hex("#f0a").unwrap(), "FF00AA");
        assert_eq!(to_hex("cc9966").unwrap(), "CC9966");
        assert_eq!(to_hex(" #336699 ").unwrap(), "336699");
    }

    #[test]
    fn test_invalid_colors() {
        for color in ["", "red", "rgb(300, 0, 0)", "rgb(1,2)", "#12345"] {
            assert!(
                matches!(to_hex(color), Err(BbError::InvalidColor { .. })),
                "Should fail for color: {}",
                color
            );
        }
    }
}
