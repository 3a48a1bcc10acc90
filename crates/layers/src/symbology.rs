use registry::Category;

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba_f32(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub const HAS_AGENCY_FILL: Color = Color::rgb(0x4a, 0xde, 0x80);
pub const NO_AGENCY_FILL: Color = Color::rgb(0xf8, 0x71, 0x71);
pub const NEUTRAL_FILL: Color = Color::rgb(0x33, 0x41, 0x55);
/// Background drawn when the boundary dataset cannot be loaded.
pub const FALLBACK_BACKGROUND: Color = Color::rgb(0x0f, 0x17, 0x2a);
pub const OUTLINE_STROKE: &str = "rgba(255,255,255,0.25)";

/// Id of the SVG filter applied to matched countries.
pub const GLOW_FILTER_ID: &str = "glow";
pub const GLOW_BLUR_STD_DEV: f64 = 2.2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Fill for a country given its registry category, if it has one.
pub fn fill_for(category: Option<Category>) -> Color {
    match category {
        Some(Category::HasAgency) => HAS_AGENCY_FILL,
        Some(Category::NoAgency) => NO_AGENCY_FILL,
        None => NEUTRAL_FILL,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub cursor: Cursor,
    pub glow: bool,
}

impl ShapeStyle {
    pub fn for_category(category: Option<Category>, stroke_width: f64) -> Self {
        let matched = category.is_some();
        Self {
            fill: fill_for(category),
            stroke: OUTLINE_STROKE,
            stroke_width,
            cursor: if matched { Cursor::Pointer } else { Cursor::Default },
            glow: matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_colors() {
        assert_eq!(fill_for(Some(Category::HasAgency)).to_hex(), "#4ade80");
        assert_eq!(fill_for(Some(Category::NoAgency)).to_hex(), "#f87171");
        assert_eq!(fill_for(None).to_hex(), "#334155");
        assert_eq!(FALLBACK_BACKGROUND.to_string(), "#0f172a");
    }

    #[test]
    fn unmatched_style_is_plain() {
        let s = ShapeStyle::for_category(None, 0.5);
        assert_eq!(s.cursor, Cursor::Default);
        assert!(!s.glow);
        let m = ShapeStyle::for_category(Some(Category::NoAgency), 0.5);
        assert_eq!(m.cursor.as_css(), "pointer");
        assert!(m.glow);
    }
}
