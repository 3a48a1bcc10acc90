//! Pan/zoom rules for the map viewport.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;

use crate::components::ViewTransform;

/// Unit of a wheel event's `deltaY`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WheelMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl WheelMode {
    /// Maps DOM `WheelEvent.deltaMode` (0, 1, 2).
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => WheelMode::Line,
            2 => WheelMode::Page,
            _ => WheelMode::Pixel,
        }
    }
}

/// Base-2 zoom exponent produced by one wheel event.
pub fn wheel_exponent(delta_y: f64, mode: WheelMode, ctrl_key: bool) -> f64 {
    let unit = match mode {
        WheelMode::Pixel => 0.002,
        WheelMode::Line => 0.05,
        WheelMode::Page => 1.0,
    };
    -delta_y * unit * if ctrl_key { 10.0 } else { 1.0 }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomBehavior {
    /// Visible area in screen units.
    pub viewport: Aabb2,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl ZoomBehavior {
    pub fn new(viewport: Aabb2, min_scale: f64, max_scale: f64) -> Self {
        Self {
            viewport,
            min_scale: min_scale.min(max_scale),
            max_scale: max_scale.max(min_scale),
        }
    }

    pub fn clamp_scale(&self, k: f64) -> f64 {
        if k.is_nan() {
            return self.min_scale;
        }
        k.clamp(self.min_scale, self.max_scale)
    }

    /// Scales `view` to `k` (clamped) while keeping the map point under
    /// `anchor` fixed on screen.
    pub fn scale_about(&self, view: ViewTransform, anchor: Vec2, k: f64) -> ViewTransform {
        let k = self.clamp_scale(k);
        let p = view.invert(anchor);
        ViewTransform::new(k, anchor.x - p.x * k, anchor.y - p.y * k)
    }

    pub fn wheel(
        &self,
        view: ViewTransform,
        pointer: Vec2,
        delta_y: f64,
        mode: WheelMode,
        ctrl_key: bool,
    ) -> ViewTransform {
        let k = view.k * 2f64.powf(wheel_exponent(delta_y, mode, ctrl_key));
        self.scale_about(view, pointer, k)
    }

    pub fn pan(&self, view: ViewTransform, delta: Vec2) -> ViewTransform {
        view.translate_by(delta)
    }

    /// Transform that centers `bounds` in the viewport and scales it to
    /// cover `fit` of the viewport along its tighter axis, clamped to the
    /// scale extent. Zero-size boxes get the maximum scale.
    pub fn zoom_to_bounds(&self, bounds: &Aabb2, fit: f64) -> ViewTransform {
        if bounds.is_empty() {
            return ViewTransform::identity();
        }
        let vw = self.viewport.width();
        let vh = self.viewport.height();
        let ratio = (bounds.width() / vw).max(bounds.height() / vh);
        let k = if ratio > 0.0 && ratio.is_finite() {
            self.clamp_scale(fit / ratio)
        } else {
            self.max_scale
        };

        let c = bounds.center();
        let center = self.viewport.center();
        ViewTransform::new(k, center.x - k * c.x, center.y - k * c.y)
    }
}
