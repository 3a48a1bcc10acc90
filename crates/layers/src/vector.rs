use std::fmt::Write;

use formats::{BoundaryFeature, GeoPoint};
use foundation::math::{NaturalEarth1, Vec2};
use scene::components::{ProjectedShape, ScreenPolygon};

/// Projects every ring of a boundary into map space.
///
/// A closing vertex equal to the first one is dropped; rings left with
/// fewer than three vertices are discarded.
pub fn project_feature(projection: &NaturalEarth1, feature: &BoundaryFeature) -> ProjectedShape {
    let mut polygons: Vec<ScreenPolygon> = Vec::new();
    for rings in feature.geometry.polygons() {
        let mut out: ScreenPolygon = Vec::with_capacity(rings.len());
        for ring in rings {
            let projected = project_ring(projection, ring);
            if projected.len() >= 3 {
                out.push(projected);
            }
        }
        if !out.is_empty() {
            polygons.push(out);
        }
    }
    ProjectedShape::new(polygons)
}

fn project_ring(projection: &NaturalEarth1, ring: &[GeoPoint]) -> Vec<Vec2> {
    let mut pts: Vec<Vec2> = ring
        .iter()
        .map(|p| projection.project(p.lon_deg, p.lat_deg))
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    if pts.len() >= 2 && pts.first() == pts.last() {
        pts.pop();
    }
    pts
}

/// SVG path data (`d` attribute) for a projected shape.
pub fn svg_path(shape: &ProjectedShape) -> String {
    let mut d = String::new();
    for polygon in &shape.polygons {
        for ring in polygon {
            for (i, p) in ring.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{},{}", round3(p.x), round3(p.y));
            }
            d.push('Z');
        }
    }
    d
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
