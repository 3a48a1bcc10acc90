//! Natural Earth I pseudo-cylindrical projection.
//!
//! Screen space follows the SVG convention: x grows to the right, y grows
//! downwards. A projection is a raw unit projection followed by a uniform
//! scale and a translation, and can be fitted so that a set of geographic
//! points fills a screen-space extent.

use crate::bounds::Aabb2;

use super::Vec2;

/// Scale used before fitting; matches the common 960px-wide world layout.
pub const DEFAULT_SCALE: f64 = 175.295;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// No finite coordinate was supplied to fit against.
    EmptyExtent,
    /// The supplied coordinates project onto a single point.
    DegenerateExtent,
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::EmptyExtent => write!(f, "no finite coordinates to fit"),
            ProjectionError::DegenerateExtent => {
                write!(f, "coordinates project onto a single point")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Unscaled Natural Earth I forward projection (radians in, unit plane out,
/// y pointing north).
pub fn natural_earth1_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalEarth1 {
    pub scale: f64,
    pub translate: Vec2,
}

impl Default for NaturalEarth1 {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            translate: Vec2::new(480.0, 250.0),
        }
    }
}

impl NaturalEarth1 {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Projects a `[lon, lat]` pair in degrees to screen space.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let (x, y) = natural_earth1_raw(lon_deg.to_radians(), lat_deg.to_radians());
        Vec2::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        )
    }

    /// Fits scale and translation so that `coords` (lon/lat degrees) are
    /// centered in `extent` and touch it on the tighter axis.
    pub fn fit_extent(
        &mut self,
        extent: Aabb2,
        coords: impl IntoIterator<Item = [f64; 2]>,
    ) -> Result<(), ProjectionError> {
        let mut raw = Aabb2::empty();
        for [lon, lat] in coords {
            let (x, y) = natural_earth1_raw(lon.to_radians(), lat.to_radians());
            raw.extend(Vec2::new(x, -y));
        }
        if raw.is_empty() {
            return Err(ProjectionError::EmptyExtent);
        }

        let w = extent.width();
        let h = extent.height();
        let k = (w / raw.width()).min(h / raw.height());
        if !k.is_finite() || k <= 0.0 {
            return Err(ProjectionError::DegenerateExtent);
        }

        let tx = extent.min[0] + (w - k * (raw.max[0] + raw.min[0])) / 2.0;
        let ty = extent.min[1] + (h - k * (raw.max[1] + raw.min[1])) / 2.0;
        self.scale = k;
        self.translate = Vec2::new(tx, ty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NaturalEarth1, ProjectionError, natural_earth1_raw};
    use crate::bounds::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn origin_maps_to_translate() {
        let p = NaturalEarth1::default();
        assert_eq!(p.project(0.0, 0.0), Vec2::new(480.0, 250.0));
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let p = NaturalEarth1::default();
        let north = p.project(0.0, 45.0);
        let east = p.project(45.0, 0.0);
        assert!(north.y < 250.0);
        assert!(east.x > 480.0);
    }

    #[test]
    fn raw_is_odd_in_both_axes() {
        let (x, y) = natural_earth1_raw(0.5, 0.3);
        let (nx, ny) = natural_earth1_raw(-0.5, -0.3);
        assert!((x + nx).abs() < 1e-12);
        assert!((y + ny).abs() < 1e-12);
    }

    #[test]
    fn fit_extent_keeps_points_inside_and_centered() {
        let extent = Aabb2::new([10.0, 10.0], [950.0, 510.0]);
        let coords = [[-180.0, -85.0], [180.0, 85.0], [20.0, 10.0]];
        let mut p = NaturalEarth1::default();
        p.fit_extent(extent, coords).expect("fit");

        let projected: Vec<Vec2> = coords.iter().map(|c| p.project(c[0], c[1])).collect();
        let b = Aabb2::from_points(projected.iter());
        assert!(b.min[0] >= 10.0 - 1e-9 && b.max[0] <= 950.0 + 1e-9);
        assert!(b.min[1] >= 10.0 - 1e-9 && b.max[1] <= 510.0 + 1e-9);

        let c = b.center();
        assert!((c.x - 480.0).abs() < 1e-6);
        assert!((c.y - 260.0).abs() < 1e-6);
    }

    #[test]
    fn fit_extent_rejects_empty_and_degenerate_input() {
        let extent = Aabb2::new([0.0, 0.0], [100.0, 100.0]);
        let mut p = NaturalEarth1::default();
        assert_eq!(
            p.fit_extent(extent, std::iter::empty()),
            Err(ProjectionError::EmptyExtent)
        );
        assert_eq!(
            p.fit_extent(extent, [[5.0, 5.0], [5.0, 5.0]]),
            Err(ProjectionError::DegenerateExtent)
        );
        assert_eq!(p, NaturalEarth1::default());
    }
}
