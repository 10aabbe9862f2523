use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::LineNumber;

/// One path vertex exactly as the server emitted it: `[x, y]`, `[x, y, z]`
/// or the `[g, x, y, i, j]` tuple with `null` gaps. Kept as raw JSON so the
/// plot request carries it back unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathPoint(pub Vec<Value>);

/// Body of a successful `POST /api/upload`. All lengths are millimeters.
/// `width` and `length` are absent on servers that do not report a bounding
/// box; they stay `None` rather than reading as a zero-sized part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "distance")]
    pub distance_mm: f64,
    pub coordinates: Vec<PathPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g00_line: Option<LineNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g90_line: Option<LineNumber>,
    #[serde(rename = "width", default, skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<f64>,
    #[serde(rename = "length", default, skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<f64>,
    #[serde(default)]
    pub is_ncg: bool,
}

impl UploadResponse {
    /// Line reported as the end of the parseable region. `g90_line` takes
    /// precedence over `g00_line` when the server reports both.
    pub fn last_valid_line(&self) -> Option<LineNumber> {
        self.g90_line.or(self.g00_line)
    }

    /// `(length, width)` in millimeters, only when the server reported both.
    pub fn bounding_box(&self) -> Option<(f64, f64)> {
        self.length_mm.zip(self.width_mm)
    }

    pub fn plot_request(&self) -> PlotRequest {
        PlotRequest {
            coordinates: self.coordinates.clone(),
            is_ncg: self.is_ncg,
        }
    }
}

/// Body of `POST /api/plot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub coordinates: Vec<PathPoint>,
    pub is_ncg: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_full_upload_response() {
        let response: UploadResponse = serde_json::from_value(json!({
            "distance": 12.3456,
            "coordinates": [[0, 1.5, 2.0, null, null], [2, 3.0, 4.0, 0.5, -0.5]],
            "g00_line": 42,
            "g90_line": 57,
            "width": 5,
            "length": 10,
            "is_ncg": true
        }))
        .expect("decode");

        assert_eq!(response.distance_mm, 12.3456);
        assert_eq!(response.coordinates.len(), 2);
        assert_eq!(response.g00_line, Some(LineNumber(42)));
        assert_eq!(response.g90_line, Some(LineNumber(57)));
        assert_eq!(response.width_mm, Some(5.0));
        assert_eq!(response.length_mm, Some(10.0));
        assert!(response.is_ncg);
    }

    #[test]
    fn tolerates_missing_optional_fields_and_explicit_nulls() {
        let response: UploadResponse = serde_json::from_value(json!({
            "distance": 3.0,
            "coordinates": [],
            "g00_line": null
        }))
        .expect("decode");

        assert_eq!(response.g00_line, None);
        assert_eq!(response.g90_line, None);
        assert_eq!(response.width_mm, None);
        assert_eq!(response.length_mm, None);
        assert!(!response.is_ncg);
    }

    #[test]
    fn rejects_response_without_distance() {
        let result = serde_json::from_value::<UploadResponse>(json!({ "coordinates": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn g90_line_wins_over_g00_line() {
        let mut response: UploadResponse = serde_json::from_value(json!({
            "distance": 1.0,
            "coordinates": [],
            "g00_line": 42
        }))
        .expect("decode");
        assert_eq!(response.last_valid_line(), Some(LineNumber(42)));

        response.g90_line = Some(LineNumber(50));
        assert_eq!(response.last_valid_line(), Some(LineNumber(50)));
    }

    #[test]
    fn plot_request_carries_points_verbatim_and_in_order() {
        let points = json!([[3, 1, 2], [1.25, -4.5], [0, 9.0, 8.0, null, null]]);
        let response: UploadResponse = serde_json::from_value(json!({
            "distance": 1.0,
            "coordinates": points.clone(),
            "is_ncg": true
        }))
        .expect("decode");

        let body = serde_json::to_value(response.plot_request()).expect("encode");
        assert_eq!(body, json!({ "coordinates": points, "is_ncg": true }));
    }
}
