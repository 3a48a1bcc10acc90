use foundation::math::Vec2;

/// Uniform scale followed by translation: `screen = k * p + (x, y)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub const fn identity() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn invert(&self, screen: Vec2) -> Vec2 {
        Vec2::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
    }

    pub fn translate_by(&self, delta: Vec2) -> Self {
        Self::new(self.k, self.x + delta.x, self.y + delta.y)
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}
