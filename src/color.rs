use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

/// User-selected accent colour, stored as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AccentColor {
    /// `#667eea`, the stock accent.
    pub const DEFAULT: AccentColor = AccentColor { r: 0x66, g: 0x7e, b: 0xea };

    pub const PRESETS: &'static [(&'static str, AccentColor)] = &[
        ("Indigo", AccentColor::DEFAULT),
        ("Violet", AccentColor { r: 0x76, g: 0x4b, b: 0xa2 }),
        ("Émeraude", AccentColor { r: 0x2e, g: 0xcc, b: 0x71 }),
        ("Ambre", AccentColor { r: 0xf3, g: 0x9c, b: 0x12 }),
        ("Corail", AccentColor { r: 0xff, g: 0x6b, b: 0x6b }),
        ("Cyan", AccentColor { r: 0x1a, g: 0xbc, b: 0x9c }),
    ];

    /// Parses `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn lighten(self, percent: f64) -> Self {
        let up = |c: u8| {
            let c = f64::from(c);
            (c + (255.0 - c) * percent).floor().clamp(0.0, 255.0) as u8
        };
        Self { r: up(self.r), g: up(self.g), b: up(self.b) }
    }

    pub fn darken(self, percent: f64) -> Self {
        let down = |c: u8| (f64::from(c) * (1.0 - percent)).floor().clamp(0.0, 255.0) as u8;
        Self { r: down(self.r), g: down(self.g), b: down(self.b) }
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for AccentColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid colour '{s}'"))
    }
}

// ── Theme ─────────────────────────────────────────────────────────────────────

/// Colours derived from the accent: the accent itself plus a light and a dark
/// variant used for highlights and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub light: Color,
    pub dark: Color,
}

impl Theme {
    pub fn from_accent(accent: AccentColor) -> Self {
        Self {
            accent: accent.to_color(),
            light: accent.lighten(0.3).to_color(),
            dark: accent.darken(0.2).to_color(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_accent(AccentColor::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ACCENT;

    #[test]
    fn default_constant_matches_configured_hex() {
        assert_eq!(AccentColor::parse(DEFAULT_ACCENT), Some(AccentColor::DEFAULT));
        assert_eq!(AccentColor::DEFAULT.to_string(), DEFAULT_ACCENT);
    }

    #[test]
    fn parse_accepts_missing_hash_and_uppercase() {
        assert_eq!(AccentColor::parse("667EEA"), Some(AccentColor::DEFAULT));
        assert_eq!(AccentColor::parse(" #667eea "), Some(AccentColor::DEFAULT));
    }

    #[test]
    fn parse_rejects_malformed_values() {
        assert_eq!(AccentColor::parse("#12345"), None);
        assert_eq!(AccentColor::parse("#gg0000"), None);
        assert_eq!(AccentColor::parse(""), None);
        assert!("blue".parse::<AccentColor>().is_err());
    }

    #[test]
    fn lighten_and_darken_floor_each_channel() {
        let light = AccentColor::DEFAULT.lighten(0.3);
        // 102 + 153 * 0.3 = 147.9
        assert_eq!(light.r, 147);
        assert_eq!(AccentColor { r: 255, g: 255, b: 255 }.lighten(0.5).r, 255);

        let dark = AccentColor::DEFAULT.darken(0.2);
        // 102 * 0.8 = 81.6
        assert_eq!(dark.r, 81);
        assert_eq!(AccentColor { r: 0, g: 0, b: 0 }.darken(0.2).g, 0);
    }

    #[test]
    fn theme_uses_rgb_variants() {
        let theme = Theme::from_accent(AccentColor::DEFAULT);
        assert_eq!(theme.accent, Color::Rgb(0x66, 0x7e, 0xea));
        assert_ne!(theme.light, theme.accent);
        assert_ne!(theme.dark, theme.accent);
    }
}
