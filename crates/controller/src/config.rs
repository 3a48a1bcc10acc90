use std::path::Path;

use foundation::bounds::Aabb2;
use scene::ZoomBehavior;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Durations {
    pub zoom_ms: f64,
    pub reset_ms: f64,
    pub hover_ms: f64,
    pub tooltip_ms: f64,
    pub panel_ms: f64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            zoom_ms: 750.0,
            reset_ms: 600.0,
            hover_ms: 150.0,
            tooltip_ms: 150.0,
            panel_ms: 300.0,
        }
    }
}

/// Map layout and interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    /// Margin between the fitted world and the viewport edge.
    pub fit_padding: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Share of the viewport a selected country fills after zooming.
    pub zoom_fit: f64,
    pub durations: Durations,
    pub tooltip_offset: f64,
    pub outline_width: f64,
    pub outline_hover_width: f64,
    pub dataset_url: String,
    pub name_property: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 520.0,
            fit_padding: 10.0,
            min_scale: 1.0,
            max_scale: 8.0,
            zoom_fit: 0.9,
            durations: Durations::default(),
            tooltip_offset: 20.0,
            outline_width: 0.5,
            outline_hover_width: 1.0,
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            name_property: formats::DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

impl MapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn viewport(&self) -> Aabb2 {
        Aabb2::new([0.0, 0.0], [self.width, self.height])
    }

    /// Region the projection is fitted into.
    pub fn fit_extent(&self) -> Aabb2 {
        let p = self.fit_padding;
        Aabb2::new([p, p], [self.width - p, self.height - p])
    }

    pub fn zoom_behavior(&self) -> ZoomBehavior {
        ZoomBehavior::new(self.viewport(), self.min_scale, self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::MapConfig;
    use foundation::bounds::Aabb2;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_page_layout() {
        let c = MapConfig::default();
        assert_eq!(c.fit_extent(), Aabb2::new([10.0, 10.0], [950.0, 510.0]));
        assert_eq!(c.durations.zoom_ms, 750.0);
        assert_eq!(c.durations.reset_ms, 600.0);
        assert_eq!((c.min_scale, c.max_scale), (1.0, 8.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = MapConfig::from_json_str(r#"{ "max_scale": 4, "durations": { "zoom_ms": 0 } }"#)
            .unwrap();
        assert_eq!(c.max_scale, 4.0);
        assert_eq!(c.durations.zoom_ms, 0.0);
        assert_eq!(c.durations.reset_ms, 600.0);
        assert_eq!(c.name_property, "name");
    }

    #[test]
    fn rejects_bad_json() {
        assert!(MapConfig::from_json_str("{ nope").is_err());
    }
}
