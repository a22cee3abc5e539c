use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

use super::model::{AccidentRecord, Kind};

/// Per-point properties read by the map layers.
#[derive(Debug, Serialize)]
struct PointProperties {
    kind: Kind,
    seriousness: i32,
}

/// Reshape records as GeoJSON points carrying `kind` and `seriousness`.
///
/// Positions follow GeoJSON axis order, `[longitude, latitude]`.
pub fn to_feature_collection<'a>(
    records: impl IntoIterator<Item = &'a AccidentRecord>,
) -> FeatureCollection {
    let features = records.into_iter().map(to_feature).collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn to_feature(record: &AccidentRecord) -> Feature {
    let properties = PointProperties {
        kind: record.kind,
        seriousness: record.seriousness.code(),
    };
    let properties: Option<JsonObject> = match serde_json::to_value(properties) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    };

    let position = vec![record.coordinates.longitude, record.coordinates.latitude];
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(position))),
        id: None,
        properties,
        foreign_members: None,
    }
}
