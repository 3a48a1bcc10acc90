//! Offline inspection of the registry and boundary datasets.

use std::path::Path;
use std::sync::Arc;

use controller::{MapConfig, MapController};
use formats::{BoundaryDataset, load_dataset_file};
use registry::{CountryRecord, Registry};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize, PartialEq)]
pub struct LookupReport<'a> {
    pub query: &'a str,
    pub key: String,
    pub record: Option<&'a CountryRecord>,
}

pub fn lookup<'a>(registry: &'a Registry, query: &'a str) -> LookupReport<'a> {
    LookupReport {
        query,
        key: registry::normalize(query),
        record: registry.lookup(query),
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FeatureSummary {
    pub name: String,
    /// Canonical registry name when the feature matched.
    pub matched: Option<String>,
    pub category: Option<String>,
    pub fill: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InspectReport {
    pub features: Vec<FeatureSummary>,
    pub matched: usize,
    pub skipped: Vec<String>,
}

pub fn inspect(registry: &Registry, dataset: &BoundaryDataset) -> InspectReport {
    let features: Vec<FeatureSummary> = dataset
        .features
        .iter()
        .map(|f| {
            let record = registry.lookup(&f.name);
            let category = record.map(|r| r.category);
            FeatureSummary {
                name: f.name.clone(),
                matched: record.map(|r| r.name.clone()),
                category: category.map(|c| c.to_string()),
                fill: layers::fill_for(category).to_hex(),
            }
        })
        .collect();
    let matched = features.iter().filter(|f| f.matched.is_some()).count();
    let skipped = dataset
        .skipped
        .iter()
        .map(|s| match &s.name {
            Some(name) => format!("#{} {name}: {}", s.index, s.reason),
            None => format!("#{}: {}", s.index, s.reason),
        })
        .collect();
    InspectReport {
        features,
        matched,
        skipped,
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ZoomReport {
    pub feature: String,
    pub matched: bool,
    /// Screen-space bounds after fitting the world into the viewport.
    pub bounds: [[f64; 2]; 2],
    pub scale: f64,
    pub translate: [f64; 2],
    pub transform: String,
}

/// The view a click on `name` settles on. Feature names are read from
/// `name_property`.
pub fn zoom(
    registry: Arc<Registry>,
    payload: &str,
    name_property: &str,
    name: &str,
) -> Result<ZoomReport, String> {
    let config = MapConfig {
        name_property: name_property.to_string(),
        ..MapConfig::default()
    };
    let mut map = MapController::new(registry, config);
    map.load_dataset(Ok(payload)).map_err(|e| e.to_string())?;

    let key = registry::normalize(name);
    let index = map
        .shapes()
        .iter()
        .position(|s| registry::normalize(&s.feature_name) == key)
        .ok_or_else(|| format!("no feature named {name:?} in dataset"))?;

    map.click(index);
    let target = map.target_view();
    debug!(index, k = target.k, "computed zoom");
    let shape = map
        .shape(index)
        .ok_or_else(|| format!("feature index {index} out of range"))?;
    Ok(ZoomReport {
        feature: shape.feature_name.clone(),
        matched: shape.is_matched(),
        bounds: [shape.projected.bounds.min, shape.projected.bounds.max],
        scale: target.k,
        translate: [target.x, target.y],
        transform: target.to_svg(),
    })
}

pub fn load_registry(path: Option<&Path>) -> Result<Registry, String> {
    match path {
        Some(p) => Registry::from_json_file(p).map_err(|e| e.to_string()),
        None => registry::builtin::space_programs().map_err(|e| e.to_string()),
    }
}

pub fn load_dataset(path: &Path, name_property: &str) -> Result<BoundaryDataset, String> {
    load_dataset_file(path, name_property).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::{inspect, lookup, zoom};
    use formats::{BoundaryDataset, DEFAULT_NAME_PROPERTY};
    use registry::builtin::space_programs;
    use std::sync::Arc;

    const SAMPLE: &str = include_str!("../../apps/viewer_web/assets/world_sample.geojson");

    #[test]
    fn lookup_reports_key_and_record() {
        let registry = space_programs().unwrap();
        let report = lookup(&registry, "Russian  Federation!");
        assert_eq!(report.key, "russianfederation");
        assert_eq!(report.record.unwrap().name, "Russian Federation");
        assert!(lookup(&registry, "Germany").record.is_none());
    }

    #[test]
    fn inspect_counts_matches_and_skips() {
        let registry = space_programs().unwrap();
        let dataset = BoundaryDataset::from_geojson_str(SAMPLE, DEFAULT_NAME_PROPERTY).unwrap();
        let report = inspect(&registry, &dataset);
        assert_eq!(report.features.len(), 8);
        // USA, Canada, Ireland, Japan, Brazil, Russia
        assert_eq!(report.matched, 6);
        assert_eq!(report.skipped.len(), 2);
        let germany = report.features.iter().find(|f| f.name == "Germany").unwrap();
        assert_eq!(germany.fill, "#334155");
        assert_eq!(germany.category, None);
    }

    #[test]
    fn zoom_to_matched_and_unmatched() {
        let registry = Arc::new(space_programs().unwrap());
        let japan = zoom(Arc::clone(&registry), SAMPLE, DEFAULT_NAME_PROPERTY, "japan").unwrap();
        assert!(japan.matched);
        assert!(japan.scale >= 1.0 && japan.scale <= 8.0);

        let germany = zoom(registry, SAMPLE, DEFAULT_NAME_PROPERTY, "Germany").unwrap();
        assert!(!germany.matched);
        assert_eq!(germany.scale, 1.0);
        assert_eq!(germany.translate, [0.0, 0.0]);

        let registry = Arc::new(space_programs().unwrap());
        assert!(zoom(registry, SAMPLE, DEFAULT_NAME_PROPERTY, "Narnia").is_err());
    }

    #[test]
    fn zoom_reads_names_from_the_chosen_property() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ADMIN":"Japan"},"geometry":{"type":"Polygon","coordinates":[[[130,31],[142,31],[142,41],[130,41],[130,31]]]}},
            {"type":"Feature","properties":{"ADMIN":"Germany"},"geometry":{"type":"Polygon","coordinates":[[[6,47],[15,47],[15,55],[6,55],[6,47]]]}}
        ]}"#;
        let registry = Arc::new(space_programs().unwrap());
        let japan = zoom(Arc::clone(&registry), payload, "ADMIN", "Japan").unwrap();
        assert_eq!(japan.feature, "Japan");
        assert!(japan.matched);
        assert!(zoom(registry, payload, DEFAULT_NAME_PROPERTY, "Japan").is_err());
    }
}
