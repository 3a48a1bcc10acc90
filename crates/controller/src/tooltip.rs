use foundation::math::Vec2;
use foundation::time::Time;
use registry::CountryRecord;
use runtime::tween::{Easing, Tween};

use crate::html::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub title: String,
    /// Status line; only for registered countries.
    pub status: Option<String>,
    pub hint: &'static str,
}

impl TooltipContent {
    pub fn for_shape(feature_name: &str, record: Option<&CountryRecord>) -> Self {
        match record {
            Some(r) => Self {
                title: r.name.clone(),
                status: Some(r.status.clone()),
                hint: "Click for details",
            },
            None => Self {
                title: feature_name.to_string(),
                status: None,
                hint: "No details available",
            },
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div style=\"font-weight:700;margin-bottom:4px;\">{}</div>",
            escape(&self.title)
        );
        if let Some(status) = &self.status {
            html.push_str(&format!("<div style=\"opacity:.9\">{}</div>", escape(status)));
        }
        html.push_str(&format!(
            "<div style=\"opacity:.7;font-size:11px\">{}</div>",
            self.hint
        ));
        html
    }
}

#[derive(Debug, Clone, Default)]
pub struct TooltipState {
    content: Option<TooltipContent>,
    position: Vec2,
    /// Running fade-out; `None` while shown.
    fade_out: Option<Tween>,
}

impl TooltipState {
    /// Shows `content` at once, anchored at `pos` shifted by `offset`.
    pub fn show(&mut self, content: TooltipContent, pos: Vec2, offset: f64) {
        self.content = Some(content);
        self.fade_out = None;
        self.move_to(pos, offset);
    }

    pub fn move_to(&mut self, pos: Vec2, offset: f64) {
        self.position = pos + Vec2::new(offset, offset);
    }

    pub fn hide(&mut self, now: Time, duration_ms: f64) {
        if self.content.is_some() && self.fade_out.is_none() {
            self.fade_out = Some(Tween::new(now, duration_ms, Easing::CubicInOut));
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_shown(&self) -> bool {
        self.content.is_some() && self.fade_out.is_none()
    }

    pub fn opacity(&self, now: Time) -> f64 {
        match (&self.content, &self.fade_out) {
            (None, _) => 0.0,
            (Some(_), None) => 1.0,
            (Some(_), Some(fade)) => fade.lerp(1.0, 0.0, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TooltipContent, TooltipState};
    use foundation::math::Vec2;
    use foundation::time::Time;
    use registry::{Category, CountryEntry, CountryRecord};

    #[test]
    fn matched_content_uses_canonical_name() {
        let record = CountryRecord::from_entry(
            "USA",
            CountryEntry::new("NASA", "", Category::HasAgency),
        );
        let c = TooltipContent::for_shape("United States of America", Some(&record));
        assert_eq!(c.title, "USA");
        assert_eq!(c.status.as_deref(), Some("NASA"));
        assert!(c.to_html().contains("Click for details"));

        let u = TooltipContent::for_shape("Germany", None);
        assert_eq!(u.title, "Germany");
        assert!(u.to_html().contains("No details available"));
    }

    #[test]
    fn follows_pointer_and_fades_out() {
        let mut t = TooltipState::default();
        t.show(TooltipContent::for_shape("Germany", None), Vec2::new(100.0, 40.0), 20.0);
        assert_eq!(t.position(), Vec2::new(120.0, 60.0));
        t.move_to(Vec2::new(5.0, 5.0), 20.0);
        assert_eq!(t.position(), Vec2::new(25.0, 25.0));
        assert_eq!(t.opacity(Time(0.0)), 1.0);

        t.hide(Time(1.0), 150.0);
        assert!(!t.is_shown());
        assert_eq!(t.opacity(Time(1.15)), 0.0);
    }
}
