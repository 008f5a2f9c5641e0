//! Wire types for the flight-plan endpoints.

use foundation::time::TimeWindow;
use serde::{Deserialize, Serialize};

/// Vertical reference for altitudes: the WGS84 ellipsoid.
pub const ALTITUDE_REFERENCE: &str = "W84";
pub const UNITS_METERS: &str = "M";
pub const TIME_FORMAT: &str = "RFC3339";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Altitude {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub units: String,
}

impl Altitude {
    /// Meters above the WGS84 ellipsoid.
    pub fn w84_meters(value: f64) -> Self {
        Self {
            value,
            reference: Some(ALTITUDE_REFERENCE.to_string()),
            units: UNITS_METERS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Radius {
    pub value: f64,
    pub units: String,
}

impl Radius {
    pub fn meters(value: f64) -> Self {
        Self {
            value,
            units: UNITS_METERS.to_string(),
        }
    }
}

/// Decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: LngLat,
    pub radius: Radius,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<LngLat>,
}

/// Horizontal footprint. Serialized as exactly one of `outline_circle` or
/// `outline_polygon` next to the altitude fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outline {
    #[serde(rename = "outline_circle")]
    Circle(Circle),
    #[serde(rename = "outline_polygon")]
    Polygon(Polygon),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(flatten)]
    pub outline: Outline,
    pub altitude_lower: Altitude,
    pub altitude_upper: Altitude,
}

impl Volume {
    pub fn circle(center: LngLat, radius_m: f64, lower_m: f64, upper_m: f64) -> Self {
        Self {
            outline: Outline::Circle(Circle {
                center,
                radius: Radius::meters(radius_m),
            }),
            altitude_lower: Altitude::w84_meters(lower_m),
            altitude_upper: Altitude::w84_meters(upper_m),
        }
    }

    pub fn polygon(vertices: Vec<LngLat>, lower_m: f64, upper_m: f64) -> Self {
        Self {
            outline: Outline::Polygon(Polygon { vertices }),
            altitude_lower: Altitude::w84_meters(lower_m),
            altitude_upper: Altitude::w84_meters(upper_m),
        }
    }

    pub fn shape_kind(&self) -> ShapeKind {
        match self.outline {
            Outline::Circle(_) => ShapeKind::Circle,
            Outline::Polygon(_) => ShapeKind::Polygon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub value: String,
    pub format: String,
}

impl TimePoint {
    pub fn rfc3339(value: String) -> Self {
        Self {
            value,
            format: TIME_FORMAT.to_string(),
        }
    }
}

/// Request body shared by flight-plan submission and conflict queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub volume: Volume,
    pub time_start: TimePoint,
    pub time_end: TimePoint,
}

impl AreaOfInterest {
    pub fn new(volume: Volume, window: &TimeWindow) -> Self {
        Self {
            volume,
            time_start: TimePoint::rfc3339(window.start_rfc3339()),
            time_end: TimePoint::rfc3339(window.end_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanResponse {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    /// Operational intent reference and details, passed through untouched.
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictData {
    #[serde(default)]
    pub constraints: Vec<AreaOfInterest>,
    #[serde(default)]
    pub operational_intents: Vec<AreaOfInterest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConflictsResponse {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: ConflictData,
}

impl QueryConflictsResponse {
    /// Constraints first, then operational intents.
    pub fn foreign_volumes(&self) -> impl Iterator<Item = &AreaOfInterest> {
        self.data
            .constraints
            .iter()
            .chain(self.data.operational_intents.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::time::TimeWindow;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn window() -> TimeWindow {
        TimeWindow::parse("2025-03-01T10:00:00Z", "2025-03-01T11:00:00Z").expect("valid window")
    }

    #[test]
    fn circle_body_matches_wire_contract() {
        let aoi = AreaOfInterest::new(
            Volume::circle(
                LngLat {
                    lng: -45.87,
                    lat: -23.21,
                },
                50.0,
                600.0,
                680.0,
            ),
            &window(),
        );
        let value = serde_json::to_value(&aoi).expect("serialize");
        assert_eq!(
            value,
            json!({
                "volume": {
                    "outline_circle": {
                        "center": { "lng": -45.87, "lat": -23.21 },
                        "radius": { "value": 50.0, "units": "M" }
                    },
                    "altitude_lower": { "value": 600.0, "reference": "W84", "units": "M" },
                    "altitude_upper": { "value": 680.0, "reference": "W84", "units": "M" }
                },
                "time_start": { "value": "2025-03-01T10:00:00Z", "format": "RFC3339" },
                "time_end": { "value": "2025-03-01T11:00:00Z", "format": "RFC3339" }
            })
        );
    }

    #[test]
    fn polygon_body_carries_only_polygon_outline() {
        let volume = Volume::polygon(
            vec![
                LngLat { lng: 1.0, lat: 2.0 },
                LngLat { lng: 1.5, lat: 2.0 },
                LngLat { lng: 1.5, lat: 2.5 },
            ],
            10.0,
            60.0,
        );
        let value = serde_json::to_value(&volume).expect("serialize");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert!(keys.contains(&"outline_polygon"));
        assert!(!keys.contains(&"outline_circle"));
        assert_eq!(volume.shape_kind(), ShapeKind::Polygon);
    }

    #[test]
    fn conflict_response_decodes_both_shapes() {
        let body = json!({
            "status": 200,
            "message": "ok",
            "data": {
                "constraints": [{
                    "volume": {
                        "outline_polygon": { "vertices": [
                            { "lng": 0.0, "lat": 0.0 },
                            { "lng": 0.001, "lat": 0.0 },
                            { "lng": 0.0, "lat": 0.001 }
                        ]},
                        "altitude_lower": { "value": 0.0, "reference": "W84", "units": "M" },
                        "altitude_upper": { "value": 120.0, "reference": "W84", "units": "M" }
                    },
                    "time_start": { "value": "2025-03-01T10:00:00Z", "format": "RFC3339" },
                    "time_end": { "value": "2025-03-01T11:00:00Z", "format": "RFC3339" }
                }],
                "operational_intents": [{
                    "volume": {
                        "outline_circle": {
                            "center": { "lng": 0.0, "lat": 0.0 },
                            "radius": { "value": 30.0, "units": "M" }
                        },
                        "altitude_lower": { "value": 10.0, "reference": "W84", "units": "M" },
                        "altitude_upper": { "value": 90.0, "reference": "W84", "units": "M" }
                    },
                    "time_start": { "value": "2025-03-01T10:00:00Z", "format": "RFC3339" },
                    "time_end": { "value": "2025-03-01T11:00:00Z", "format": "RFC3339" }
                }]
            }
        });
        let resp: QueryConflictsResponse = serde_json::from_value(body).expect("decode");
        let kinds: Vec<ShapeKind> = resp.foreign_volumes().map(|a| a.volume.shape_kind()).collect();
        assert_eq!(kinds, vec![ShapeKind::Polygon, ShapeKind::Circle]);
    }

    #[test]
    fn altitude_reference_is_optional_on_decode() {
        let body = json!({
            "status": 200,
            "message": "ok",
            "data": {
                "constraints": [{
                    "volume": {
                        "outline_circle": {
                            "center": { "lng": 0.0, "lat": 0.0 },
                            "radius": { "value": 30.0, "units": "M" }
                        },
                        "altitude_lower": { "value": 10.0, "units": "M" },
                        "altitude_upper": { "value": 90.0, "units": "M" }
                    },
                    "time_start": { "value": "2025-03-01T10:00:00Z", "format": "RFC3339" },
                    "time_end": { "value": "2025-03-01T11:00:00Z", "format": "RFC3339" }
                }]
            }
        });
        let resp: QueryConflictsResponse = serde_json::from_value(body).expect("decode");
        let volume = &resp.data.constraints[0].volume;
        assert_eq!(volume.altitude_lower.reference, None);
        assert_eq!(volume.altitude_upper.value, 90.0);

        let value = serde_json::to_value(&volume.altitude_lower).expect("serialize");
        assert_eq!(value, json!({ "value": 10.0, "units": "M" }));
    }

    #[test]
    fn empty_conflict_data_defaults() {
        let resp: QueryConflictsResponse =
            serde_json::from_value(json!({ "status": 200, "message": "none" })).expect("decode");
        assert_eq!(resp.foreign_volumes().count(), 0);
    }
}
