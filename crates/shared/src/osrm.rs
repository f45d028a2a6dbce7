//! Wire format of the OSRM routing backend.
//!
//! Only the pieces needed to request a walking route with turn-by-turn steps
//! and to normalize the answer into a [`RouteResult`]. The HTTP call itself
//! lives with whoever owns a client.

use serde::Deserialize;

use crate::error::RoutingBackendError;
use crate::geo;
use crate::models::{GeoPoint, InstructionStep, RouteResult, WaypointList};

/// OSRM profile for walking. The travel mode is not caller-selectable.
pub const PEDESTRIAN_PROFILE: &str = "foot";

/// `GET` URL for a pedestrian route through `waypoints`, in order.
pub fn route_url(base_url: &str, waypoints: &WaypointList) -> String {
    let coordinates = waypoints
        .points()
        .iter()
        .map(|p| format!("{:.6},{:.6}", p.longitude, p.latitude))
        .collect::<Vec<_>>()
        .join(";");
    format!(
        "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=true",
        base_url.trim_end_matches('/'),
        PEDESTRIAN_PROFILE,
        coordinates
    )
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[longitude, latitude]` pairs.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    maneuver: Option<OsrmManeuver>,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    modifier: Option<String>,
    #[serde(default)]
    bearing_before: Option<f64>,
    #[serde(default)]
    bearing_after: Option<f64>,
}

impl OsrmManeuver {
    fn text(&self) -> Option<String> {
        match (&self.kind, &self.modifier) {
            (Some(kind), Some(modifier)) => Some(format!("{kind} {modifier}")),
            (Some(kind), None) => Some(kind.clone()),
            (None, Some(modifier)) => Some(modifier.clone()),
            (None, None) => None,
        }
    }

    /// Depart and arrive carry a placeholder bearing on one side.
    fn turn_angle(&self) -> Option<f64> {
        if matches!(self.kind.as_deref(), Some("depart") | Some("arrive")) {
            return None;
        }
        match (self.bearing_before, self.bearing_after) {
            (Some(before), Some(after)) => Some(geo::normalize_turn(before, after).round()),
            _ => None,
        }
    }
}

impl From<OsrmStep> for InstructionStep {
    fn from(step: OsrmStep) -> Self {
        InstructionStep {
            maneuver: step.maneuver.as_ref().and_then(OsrmManeuver::text),
            street_name: step.name.filter(|n| !n.trim().is_empty()),
            duration_seconds: step.duration,
            turn_angle_degrees: step.maneuver.as_ref().and_then(OsrmManeuver::turn_angle),
        }
    }
}

/// Normalize a successful (2xx) OSRM body.
pub fn parse_route_response(body: &str) -> Result<RouteResult, RoutingBackendError> {
    let response: OsrmResponse = serde_json::from_str(body)
        .map_err(|e| RoutingBackendError::InvalidResponse(e.to_string()))?;

    if response.code != "Ok" {
        return Err(RoutingBackendError::Rejected {
            message: response.message.unwrap_or_default(),
            code: response.code,
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingBackendError::MissingGeometry)?;

    let geometry: Vec<GeoPoint> = route
        .geometry
        .map(|g| {
            g.coordinates
                .into_iter()
                .map(|[lon, lat]| GeoPoint::new(lat, lon))
                .collect()
        })
        .unwrap_or_default();
    if geometry.len() < 2 {
        return Err(RoutingBackendError::MissingGeometry);
    }

    let instructions = route
        .legs
        .into_iter()
        .flat_map(|leg| leg.steps)
        .map(InstructionStep::from)
        .collect();

    Ok(RouteResult {
        geometry,
        instructions,
    })
}

/// Turn an HTTP status and body into a route or a backend error.
pub fn classify_response(status: u16, body: &str) -> Result<RouteResult, RoutingBackendError> {
    if (200..300).contains(&status) {
        return parse_route_response(body);
    }
    // OSRM reports bad queries as 4xx with a JSON code/message body.
    match serde_json::from_str::<OsrmResponse>(body) {
        Ok(err) => Err(RoutingBackendError::Rejected {
            code: err.code,
            message: err.message.unwrap_or_default(),
        }),
        Err(_) => Err(RoutingBackendError::Status { status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {"type": "LineString", "coordinates": [[-74.0, 40.70], [-74.0, 40.705], [-73.999, 40.71]]},
            "legs": [
                {"steps": [
                    {"name": "Hudson Street", "duration": 95.2, "maneuver": {"type": "depart", "bearing_before": 0, "bearing_after": 0}},
                    {"name": "", "duration": 30.0, "maneuver": {"type": "turn", "modifier": "right", "bearing_before": 0, "bearing_after": 88}}
                ]},
                {"steps": [
                    {"name": "Bleecker Street", "duration": 0, "maneuver": {"type": "arrive", "bearing_before": 350, "bearing_after": 0}}
                ]}
            ]
        }],
        "waypoints": []
    }"#;

    #[test]
    fn test_route_url_lon_lat_order_and_pedestrian_profile() {
        let waypoints = WaypointList::try_from(vec![
            GeoPoint::new(40.7, -74.0),
            GeoPoint::new(40.705, -73.9995),
            GeoPoint::new(40.71, -74.0),
        ])
        .unwrap();
        assert_eq!(
            route_url("https://router.example.org/", &waypoints),
            "https://router.example.org/route/v1/foot/-74.000000,40.700000;-73.999500,40.705000;-74.000000,40.710000?overview=full&geometries=geojson&steps=true"
        );
    }

    #[test]
    fn test_parse_ok_response() {
        let route = parse_route_response(OK_BODY).unwrap();
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry[0], GeoPoint::new(40.70, -74.0));
        assert_eq!(route.geometry[2], GeoPoint::new(40.71, -73.999));

        assert_eq!(route.instructions.len(), 3);
        let depart = &route.instructions[0];
        assert_eq!(depart.maneuver.as_deref(), Some("depart"));
        assert_eq!(depart.street_name.as_deref(), Some("Hudson Street"));
        assert_eq!(depart.duration_seconds, Some(95.2));
        assert!(depart.turn_angle_degrees.is_none());

        let turn = &route.instructions[1];
        assert_eq!(turn.maneuver.as_deref(), Some("turn right"));
        assert!(turn.street_name.is_none());
        assert_eq!(turn.turn_angle_degrees, Some(88.0));

        let arrive = &route.instructions[2];
        assert_eq!(arrive.maneuver.as_deref(), Some("arrive"));
        assert!(arrive.turn_angle_degrees.is_none());
    }

    #[test]
    fn test_geometry_without_steps_is_valid() {
        let body = r#"{"code":"Ok","routes":[{"geometry":{"coordinates":[[-74.0,40.70],[-74.0,40.71]]},"legs":[{"steps":[]}]}]}"#;
        let route = parse_route_response(body).unwrap();
        assert_eq!(route.geometry.len(), 2);
        assert!(route.instructions.is_empty());
    }

    #[test]
    fn test_no_route_code_is_rejected() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points","routes":[]}"#;
        assert_eq!(
            parse_route_response(body).unwrap_err(),
            RoutingBackendError::Rejected {
                code: "NoRoute".to_string(),
                message: "Impossible route between points".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_or_degenerate_geometry() {
        let no_routes = r#"{"code":"Ok","routes":[]}"#;
        assert_eq!(
            parse_route_response(no_routes).unwrap_err(),
            RoutingBackendError::MissingGeometry
        );
        let no_geometry = r#"{"code":"Ok","routes":[{"legs":[]}]}"#;
        assert_eq!(
            parse_route_response(no_geometry).unwrap_err(),
            RoutingBackendError::MissingGeometry
        );
        let single_point = r#"{"code":"Ok","routes":[{"geometry":{"coordinates":[[-74.0,40.7]]}}]}"#;
        assert_eq!(
            parse_route_response(single_point).unwrap_err(),
            RoutingBackendError::MissingGeometry
        );
    }

    #[test]
    fn test_garbage_body_is_invalid_response() {
        assert!(matches!(
            parse_route_response("<html>502 Bad Gateway</html>"),
            Err(RoutingBackendError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_classify_error_statuses() {
        let body = r#"{"code":"InvalidQuery","message":"Query string malformed close to position 28"}"#;
        assert!(matches!(
            classify_response(400, body),
            Err(RoutingBackendError::Rejected { code, .. }) if code == "InvalidQuery"
        ));
        assert_eq!(
            classify_response(503, "Service Unavailable").unwrap_err(),
            RoutingBackendError::Status { status: 503 }
        );
        assert!(classify_response(200, OK_BODY).is_ok());
    }
}
