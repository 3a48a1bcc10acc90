//! Smooth zoom between two views (van Wijk & Nuij, "Smooth and efficient
//! zooming and panning"), with the curvature used by common web mapping
//! libraries (`rho = sqrt(2)`).
//!
//! Views are expressed as `[ux, uy, w]`: the map point at the viewport
//! center and the map-space width visible across the viewport.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use foundation::time::Time;
use runtime::tween::{Easing, Tween};

use crate::components::ViewTransform;

const RHO: f64 = std::f64::consts::SQRT_2;
const RHO2: f64 = 2.0;
const RHO4: f64 = 4.0;
const EPSILON2: f64 = 1e-12;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomInterpolator {
    start: [f64; 3],
    dx: f64,
    dy: f64,
    path: ZoomPath,
    /// Total path length `S`.
    length: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum ZoomPath {
    /// Centers coincide: pure exponential zoom.
    Zoom,
    Fly { d1: f64, r0: f64 },
}

impl ZoomInterpolator {
    pub fn new(p0: [f64; 3], p1: [f64; 3]) -> Self {
        let [ux0, uy0, w0] = p0;
        let [ux1, uy1, w1] = p1;
        let dx = ux1 - ux0;
        let dy = uy1 - uy0;
        let d2 = dx * dx + dy * dy;

        if d2 < EPSILON2 {
            return Self {
                start: p0,
                dx,
                dy,
                path: ZoomPath::Zoom,
                length: (w1 / w0).ln() / RHO,
            };
        }

        let d1 = d2.sqrt();
        let b0 = (w1 * w1 - w0 * w0 + RHO4 * d2) / (2.0 * w0 * RHO2 * d1);
        let b1 = (w1 * w1 - w0 * w0 - RHO4 * d2) / (2.0 * w1 * RHO2 * d1);
        let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
        let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
        Self {
            start: p0,
            dx,
            dy,
            path: ZoomPath::Fly { d1, r0 },
            length: (r1 - r0) / RHO,
        }
    }

    pub fn at(&self, t: f64) -> [f64; 3] {
        let [ux0, uy0, w0] = self.start;
        match self.path {
            ZoomPath::Zoom => [
                ux0 + t * self.dx,
                uy0 + t * self.dy,
                w0 * (RHO * t * self.length).exp(),
            ],
            ZoomPath::Fly { d1, r0 } => {
                let s = t * self.length;
                let cosh_r0 = r0.cosh();
                let u = w0 / (RHO2 * d1) * (cosh_r0 * (RHO * s + r0).tanh() - r0.sinh());
                [
                    ux0 + u * self.dx,
                    uy0 + u * self.dy,
                    w0 * cosh_r0 / (RHO * s + r0).cosh(),
                ]
            }
        }
    }
}

/// An animated change of view following the smooth zoom path.
///
/// Intermediate frames are limited to `[min_scale, max_scale]`; the last
/// frame is exactly the target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomTransition {
    from: ViewTransform,
    to: ViewTransform,
    tween: Tween,
    center: Vec2,
    width: f64,
    interp: ZoomInterpolator,
    scale_bounds: (f64, f64),
}

impl ZoomTransition {
    pub fn new(
        from: ViewTransform,
        to: ViewTransform,
        viewport: &Aabb2,
        scale_bounds: (f64, f64),
        start: Time,
        duration_ms: f64,
    ) -> Self {
        let center = viewport.center();
        let width = viewport.width().max(viewport.height());
        let a = from.invert(center);
        let b = to.invert(center);
        Self {
            from,
            to,
            tween: Tween::new(start, duration_ms, Easing::CubicInOut),
            center,
            width,
            interp: ZoomInterpolator::new([a.x, a.y, width / from.k], [b.x, b.y, width / to.k]),
            scale_bounds,
        }
    }

    pub fn source(&self) -> ViewTransform {
        self.from
    }

    pub fn target(&self) -> ViewTransform {
        self.to
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.tween.is_finished(now)
    }

    pub fn sample(&self, now: Time) -> ViewTransform {
        if self.tween.is_finished(now) {
            return self.to;
        }
        let [ux, uy, w] = self.interp.at(self.tween.progress(now));
        let (lo, hi) = self.scale_bounds;
        let k = (self.width / w).clamp(lo, hi);
        ViewTransform::new(k, self.center.x - ux * k, self.center.y - uy * k)
    }
}
