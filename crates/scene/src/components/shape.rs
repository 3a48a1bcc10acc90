use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Rings of one polygon in screen space, outer ring first.
pub type ScreenPolygon = Vec<Vec<Vec2>>;

/// A boundary after projection: one or more polygons plus their bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    pub polygons: Vec<ScreenPolygon>,
    pub bounds: Aabb2,
}

impl ProjectedShape {
    pub fn new(polygons: Vec<ScreenPolygon>) -> Self {
        let mut bounds = Aabb2::empty();
        for p in polygons.iter().flatten().flatten() {
            bounds.extend(*p);
        }
        Self { polygons, bounds }
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().flatten().map(Vec::len).sum()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds.contains(p) && crate::picking::polygons_contain(&self.polygons, p)
    }
}

impl AsRef<ProjectedShape> for ProjectedShape {
    fn as_ref(&self) -> &ProjectedShape {
        self
    }
}
