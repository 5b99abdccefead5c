use std::fmt;

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    Empty,
    InvalidHex(String),
    InvalidFunction(String),
    UnknownName(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::Empty => write!(f, "empty color string"),
            ColorParseError::InvalidHex(s) => write!(f, "invalid hex color: {s}"),
            ColorParseError::InvalidFunction(s) => write!(f, "invalid color function: {s}"),
            ColorParseError::UnknownName(s) => write!(f, "unknown color name: {s}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgba(1.0, 1.0, 0.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_bytes(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a.clamp(0.0, 1.0),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn as_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`, `rgba(...)`
    /// or one of a few basic names.
    pub fn from_css(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return parse_rgb_function(args)
                .ok_or_else(|| ColorParseError::InvalidFunction(s.to_string()));
        }

        match lower.as_str() {
            "white" => Ok(Color::WHITE),
            "black" => Ok(Color::BLACK),
            "yellow" => Ok(Color::YELLOW),
            "red" => Ok(Color::RED),
            "transparent" => Ok(Color::rgba(0.0, 0.0, 0.0, 0.0)),
            _ => Err(ColorParseError::UnknownName(s.to_string())),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::from_bytes(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
        6 => Some(Color::from_bytes(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Color::from_bytes(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f32 / 255.0,
        )),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Color> {
    let inner = args.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v: f64 = p.parse().ok()?;
        (0.0..=255.0).contains(&v).then_some(v.round() as u8)
    };
    let alpha = match parts.get(3) {
        Some(p) => p.parse::<f32>().ok()?,
        None => 1.0,
    };
    Some(Color::from_bytes(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorParseError};

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-6, "expected {a} ~= {b}");
    }

    #[test]
    fn parses_long_and_short_hex() {
        let c = Color::from_css("#F26419").expect("hex");
        assert_close(c.r, 242.0 / 255.0);
        assert_close(c.g, 100.0 / 255.0);
        assert_close(c.b, 25.0 / 255.0);
        assert_close(c.a, 1.0);

        let short = Color::from_css("#fff").expect("short hex");
        assert_eq!(short, Color::WHITE);
    }

    #[test]
    fn parses_rgba_function_with_alpha() {
        let c = Color::from_css("rgba(255, 255, 255, 0.01)").expect("rgba");
        assert_close(c.r, 1.0);
        assert_close(c.a, 0.01);

        let opaque = Color::from_css("rgb(0, 0, 0)").expect("rgb");
        assert_eq!(opaque, Color::BLACK);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Color::from_css("  "), Err(ColorParseError::Empty));
        assert!(matches!(
            Color::from_css("#12345"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            Color::from_css("rgba(300, 0, 0, 1)"),
            Err(ColorParseError::InvalidFunction(_))
        ));
        assert!(matches!(
            Color::from_css("chartreuse-ish"),
            Err(ColorParseError::UnknownName(_))
        ));
    }

    #[test]
    fn with_alpha_clamps() {
        assert_close(Color::WHITE.with_alpha(1.5).a, 1.0);
        assert_close(Color::WHITE.with_alpha(0.3).a, 0.3);
    }
}
