use std::fmt::Write;
use std::sync::Arc;

use foundation::time::Time;
use registry::CountryRecord;
use runtime::tween::{Easing, Tween};

use crate::html::escape;

/// The country details shown next to the map after a click.
#[derive(Debug, Clone, Default)]
pub struct DetailsPanel {
    record: Option<Arc<CountryRecord>>,
    fade: Option<Tween>,
}

impl DetailsPanel {
    pub fn show(&mut self, record: Arc<CountryRecord>, now: Time, duration_ms: f64) {
        self.record = Some(record);
        self.fade = Some(Tween::new(now, duration_ms, Easing::CubicOut));
    }

    pub fn clear(&mut self) {
        self.record = None;
        self.fade = None;
    }

    pub fn record(&self) -> Option<&CountryRecord> {
        self.record.as_deref()
    }

    pub fn opacity(&self, now: Time) -> f64 {
        match (&self.record, &self.fade) {
            (Some(_), Some(fade)) => fade.lerp(0.0, 1.0, now),
            (Some(_), None) => 1.0,
            _ => 0.0,
        }
    }

    pub fn to_html(&self) -> Option<String> {
        self.record.as_deref().map(render_record)
    }
}

/// Panel markup for one record; stats keep their registration order.
pub fn render_record(record: &CountryRecord) -> String {
    let mut stats = String::new();
    for (label, value) in record.stats.iter() {
        let _ = write!(
            stats,
            "<div class=\"country-stat\"><span class=\"country-stat-value\">{}</span>\
             <span class=\"country-stat-label\">{}</span></div>",
            escape(value),
            escape(label)
        );
    }
    format!(
        "<div class=\"country-data active\">\
         <h4 class=\"country-name\">{}</h4>\
         <div class=\"country-status\">{}</div>\
         <p class=\"country-details\">{}</p>\
         <div class=\"country-stats\">{stats}</div>\
         </div>",
        escape(&record.name),
        escape(&record.status),
        escape(&record.details),
    )
}
