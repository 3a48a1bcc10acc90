use serde_json::{Map, Value};
use tracing::warn;

use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Property holding a feature's display name in the usual world datasets.
pub const DEFAULT_NAME_PROPERTY: &str = "name";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// A polygon as GeoJSON stores it: outer ring first, then holes.
pub type PolygonRings = Vec<Vec<GeoPoint>>;

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
}

impl BoundaryGeometry {
    pub fn polygons(&self) -> Vec<&PolygonRings> {
        match self {
            BoundaryGeometry::Polygon(rings) => vec![rings],
            BoundaryGeometry::MultiPolygon(polys) => polys.iter().collect(),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> + '_ {
        self.polygons()
            .into_iter()
            .flat_map(|rings| rings.iter())
            .flat_map(|ring| ring.iter())
    }

    /// Longitude/latitude bounds in degrees.
    pub fn lon_lat_bounds(&self) -> Aabb2 {
        let mut b = Aabb2::empty();
        for p in self.points() {
            b.extend(Vec2::new(p.lon_deg, p.lat_deg));
        }
        b
    }
}

/// One country (or territory) boundary from the fetched dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub id: Option<String>,
    /// Display name; empty when the feature carries none.
    pub name: String,
    pub geometry: BoundaryGeometry,
}

/// A feature that was left out of the dataset, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFeature {
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryDataset {
    pub features: Vec<BoundaryFeature>,
    pub skipped: Vec<SkippedFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    Json(String),
    NotAFeatureCollection,
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            DatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

impl BoundaryDataset {
    pub fn from_geojson_str(payload: &str, name_property: &str) -> Result<Self, DatasetError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| DatasetError::Json(e.to_string()))?;
        Self::from_geojson_value(&value, name_property)
    }

    /// Parses a FeatureCollection of boundaries.
    ///
    /// Only a broken document is an error. Individual features that are not
    /// polygons or have malformed coordinates end up in `skipped` and the rest
    /// of the collection is still returned.
    pub fn from_geojson_value(value: &Value, name_property: &str) -> Result<Self, DatasetError> {
        let obj = value
            .as_object()
            .ok_or(DatasetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(DatasetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(DatasetError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(DatasetError::NotAFeatureCollection)?;

        let mut out = BoundaryDataset::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(feat_val, name_property) {
                Ok(feature) => out.features.push(feature),
                Err(reason) => {
                    let name = feat_val
                        .get("properties")
                        .and_then(|p| p.get(name_property))
                        .and_then(|v| v.as_str())
                        .map(str::to_string);
                    warn!(index, name = ?name, %reason, "skipping malformed boundary feature");
                    out.skipped.push(SkippedFeature {
                        index,
                        name,
                        reason,
                    });
                }
            }
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Every boundary coordinate as `[lon, lat]`, in feature order.
    pub fn coordinates(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.features
            .iter()
            .flat_map(|f| f.geometry.points())
            .map(|p| [p.lon_deg, p.lat_deg])
    }
}

fn parse_feature(value: &Value, name_property: &str) -> Result<BoundaryFeature, String> {
    let obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if ty != "Feature" {
        return Err(format!("unexpected feature type: {ty}"));
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let empty = Map::new();
    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .unwrap_or(&empty);
    let name = properties
        .get(name_property)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| id.clone())
        .unwrap_or_default();

    let geometry_val = obj
        .get("geometry")
        .ok_or("feature missing geometry".to_string())?;
    let geometry = parse_geometry(geometry_val)?;

    Ok(BoundaryFeature { id, name, geometry })
}

fn parse_geometry(value: &Value) -> Result<BoundaryGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(BoundaryGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(BoundaryGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("lat must be a number".to_string())?;
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("lon {lon} outside [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("lat {lat} outside [-90, 90]"));
    }
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    // A closing position repeating the first one is not a vertex.
    let closed = out.len() >= 2 && out.first() == out.last();
    let vertices = out.len() - usize::from(closed);
    if vertices < 3 {
        return Err(format!("ring has {vertices} vertices, need at least 3"));
    }
    Ok(out)
}

fn parse_polygon(coords: &Value) -> Result<PolygonRings, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    if rings.is_empty() {
        return Err("Polygon has no rings".to_string());
    }
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<PolygonRings>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    if polys.is_empty() {
        return Err("MultiPolygon has no polygons".to_string());
    }
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}
