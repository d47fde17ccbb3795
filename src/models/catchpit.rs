use super::geometry::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

/// GeoJSON FeatureCollection as read from disk, coordinates still projected.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<RawFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub id: Option<Value>,
    pub geometry: Option<RawGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(u64),
    Text(String),
}

impl FeatureId {
    /// Read an id out of a JSON value. Falsy values (`null`, `0`, `""`,
    /// `false`) yield `None` so the caller falls through to the next source.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(0) => None,
                Some(v) => Some(FeatureId::Number(v)),
                None if n.as_f64() == Some(0.0) => None,
                None => Some(FeatureId::Text(n.to_string())),
            },
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(FeatureId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{}", n),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

/// JSON truthiness for loose flags: `false`, `0`, `""` and `null` are false,
/// anything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A catchpit after conversion to geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchpitFeature {
    pub id: FeatureId,
    pub position: LatLng,
    /// Coordinate as it appeared in the source file
    pub source: [f64; 2],
    pub blocked: bool,
    /// Remaining input properties, passed through untouched
    pub properties: Map<String, Value>,
}

impl CatchpitFeature {
    pub fn to_geojson(&self) -> Value {
        let mut properties = self.properties.clone();
        properties.insert("blocked".to_string(), Value::Bool(self.blocked));
        json!({
            "type": "Feature",
            "id": self.id,
            "geometry": {
                "type": "Point",
                "coordinates": [self.position.lng, self.position.lat],
            },
            "properties": properties,
        })
    }
}

pub fn to_feature_collection(features: &[CatchpitFeature]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features.iter().map(CatchpitFeature::to_geojson).collect::<Vec<_>>(),
    })
}
