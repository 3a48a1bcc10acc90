use std::sync::Arc;

use foundation::time::Time;
use layers::ShapeStyle;
use registry::{Category, CountryRecord};
use runtime::tween::{Easing, Tween};
use scene::components::ProjectedShape;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapePhase {
    Unmatched,
    MatchedIdle,
    MatchedHovered,
    MatchedSelected,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct OutlineAnim {
    from: f64,
    to: f64,
    tween: Tween,
}

impl OutlineAnim {
    fn fixed(width: f64) -> Self {
        Self {
            from: width,
            to: width,
            tween: Tween::new(Time::ZERO, 0.0, Easing::CubicInOut),
        }
    }

    fn width(&self, now: Time) -> f64 {
        self.tween.lerp(self.from, self.to, now)
    }
}

/// Everything the map knows about one drawn country.
#[derive(Debug, Clone)]
pub struct ShapeState {
    /// Display name taken from the dataset.
    pub feature_name: String,
    pub record: Option<Arc<CountryRecord>>,
    pub projected: ProjectedShape,
    /// SVG path data in map space.
    pub path: String,
    hovered: bool,
    selected: bool,
    outline: OutlineAnim,
}

impl ShapeState {
    pub fn new(
        feature_name: impl Into<String>,
        record: Option<Arc<CountryRecord>>,
        projected: ProjectedShape,
        outline_width: f64,
    ) -> Self {
        let path = layers::svg_path(&projected);
        Self {
            feature_name: feature_name.into(),
            record,
            projected,
            path,
            hovered: false,
            selected: false,
            outline: OutlineAnim::fixed(outline_width),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.record.is_some()
    }

    pub fn category(&self) -> Option<Category> {
        self.record.as_ref().map(|r| r.category)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn phase(&self) -> ShapePhase {
        match (&self.record, self.selected, self.hovered) {
            (None, _, _) => ShapePhase::Unmatched,
            (Some(_), true, _) => ShapePhase::MatchedSelected,
            (Some(_), false, true) => ShapePhase::MatchedHovered,
            (Some(_), false, false) => ShapePhase::MatchedIdle,
        }
    }

    pub fn outline_width(&self, now: Time) -> f64 {
        self.outline.width(now)
    }

    pub fn outline_settled(&self, now: Time) -> bool {
        self.outline.tween.is_finished(now)
    }

    pub fn style(&self, now: Time) -> ShapeStyle {
        ShapeStyle::for_category(self.category(), self.outline_width(now))
    }

    /// Starts an outline transition from the current width toward `width`.
    pub(crate) fn set_hovered(&mut self, hovered: bool, width: f64, now: Time, duration_ms: f64) {
        self.hovered = hovered;
        self.outline = OutlineAnim {
            from: self.outline.width(now),
            to: width,
            tween: Tween::new(now, duration_ms, Easing::CubicInOut),
        };
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected && self.record.is_some();
    }
}

impl AsRef<ProjectedShape> for ShapeState {
    fn as_ref(&self) -> &ProjectedShape {
        &self.projected
    }
}

#[cfg(test)]
mod tests {
    use super::{ShapePhase, ShapeState};
    use foundation::math::Vec2;
    use foundation::time::Time;
    use registry::{Category, CountryEntry, CountryRecord};
    use scene::components::ProjectedShape;
    use std::sync::Arc;

    fn square() -> ProjectedShape {
        ProjectedShape::new(vec![vec![vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]]])
    }

    #[test]
    fn phases_follow_flags() {
        let record = Arc::new(CountryRecord::from_entry(
            "Japan",
            CountryEntry::new("JAXA", "", Category::HasAgency),
        ));
        let mut s = ShapeState::new("Japan", Some(record), square(), 0.5);
        assert_eq!(s.phase(), ShapePhase::MatchedIdle);
        s.set_hovered(true, 1.0, Time(0.0), 150.0);
        assert_eq!(s.phase(), ShapePhase::MatchedHovered);
        s.set_selected(true);
        assert_eq!(s.phase(), ShapePhase::MatchedSelected);

        let mut u = ShapeState::new("Germany", None, square(), 0.5);
        u.set_hovered(true, 1.0, Time(0.0), 150.0);
        u.set_selected(true);
        assert_eq!(u.phase(), ShapePhase::Unmatched);
        assert!(!u.is_selected());
    }

    #[test]
    fn outline_animates_from_current_width() {
        let mut s = ShapeState::new("Germany", None, square(), 0.5);
        assert_eq!(s.outline_width(Time(0.0)), 0.5);
        s.set_hovered(true, 1.0, Time(0.0), 150.0);
        let mid = s.outline_width(Time(0.075));
        assert!(mid > 0.5 && mid < 1.0);
        assert_eq!(s.outline_width(Time(0.15)), 1.0);

        s.set_hovered(false, 0.5, Time(0.2), 150.0);
        assert_eq!(s.outline_width(Time(0.2)), 1.0);
        assert_eq!(s.outline_width(Time(0.35)), 0.5);
        assert!(s.outline_settled(Time(0.35)));
        assert_eq!(s.path, "M0,0L4,0L4,4L0,4Z");
    }
}
