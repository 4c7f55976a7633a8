/// RGBA colors for face fill and stroke

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Default face outline, `#00000044`
    pub const FAINT_OUTLINE: Color = Color::rgba(0, 0, 0, 0x44);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Relative luminance in `0.0..=1.0` (Rec. 709 weights, no gamma)
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// CSS `rgba()` notation for canvas styles
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.alpha())
    }

    /// Source-over blend of `self` onto an opaque `base`
    pub fn over(&self, base: Color) -> Color {
        let t = self.alpha();
        let mix = |top: u8, bottom: u8| (top as f64 * t + bottom as f64 * (1.0 - t)).round() as u8;
        Color::rgb(
            mix(self.r, base.r),
            mix(self.g, base.g),
            mix(self.b, base.b),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::RED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::hex("#00000044"), Some(Color::FAINT_OUTLINE));
        assert_eq!(Color::hex("#88000"), None);
        assert_eq!(Color::hex("ff0000"), None);
        assert_eq!(Color::hex("#gg0000"), None);
    }

    #[test]
    fn test_luminance_range() {
        assert_eq!(Color::BLACK.luminance(), 0.0);
        assert!((Color::WHITE.luminance() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend() {
        let half = Color::rgba(255, 255, 255, 128);
        let mixed = half.over(Color::BLACK);
        assert!(mixed.r > 120 && mixed.r < 135);
        assert_eq!(Color::RED.over(Color::WHITE), Color::RED);
    }
}
