use accessable_shared::models::{CatalogLocation, LocationType};
use accessable_shared::{GeoPoint, InstructionStep, RouteResult, RoutingBackendError, WaypointList};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQLErrorExtensions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLErrorExtensions {
    pub code: Option<String>,
}

/// Why a GraphQL call produced no data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Server {
        code: Option<String>,
        message: String,
    },
    #[error("no data returned")]
    NoData,
}

impl From<QueryError> for RoutingBackendError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Transport(msg) => RoutingBackendError::Transport(msg),
            QueryError::Server { code, message } => RoutingBackendError::Rejected {
                code: code.unwrap_or_else(|| "GRAPHQL".to_string()),
                message,
            },
            QueryError::NoData => {
                RoutingBackendError::InvalidResponse("no data returned".to_string())
            }
        }
    }
}

fn api_url() -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}/graphql", origin)
}

/// Unwrap a decoded GraphQL response into its data or the first error.
fn into_result<T>(resp: GraphQLResponse<T>) -> Result<T, QueryError> {
    if let Some(err) = resp.errors.and_then(|errors| errors.into_iter().next()) {
        return Err(QueryError::Server {
            code: err.extensions.and_then(|e| e.code),
            message: err.message,
        });
    }
    resp.data.ok_or(QueryError::NoData)
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, QueryError> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url())
        .json(&req)
        .send()
        .await
        .map_err(|e| QueryError::Transport(e.to_string()))?;

    let gql_resp: GraphQLResponse<T> = resp
        .json()
        .await
        .map_err(|e| QueryError::Transport(e.to_string()))?;

    into_result(gql_resp)
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for PointData {
    fn from(p: GeoPoint) -> Self {
        PointData {
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

impl From<PointData> for GeoPoint {
    fn from(p: PointData) -> Self {
        GeoPoint::new(p.latitude, p.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub id: String,
    pub name: String,
    /// GraphQL enum name, e.g. `PEDESTRIAN_SIGNAL`.
    pub location_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub borough: Option<String>,
    pub accessible: Option<String>,
}

impl From<LocationData> for CatalogLocation {
    fn from(l: LocationData) -> Self {
        CatalogLocation {
            id: l.id,
            name: l.name,
            location_type: LocationType::from_slug(&l.location_type.to_lowercase()),
            latitude: l.latitude,
            longitude: l.longitude,
            borough: l.borough,
            accessible: l.accessible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionStepData {
    pub maneuver: Option<String>,
    pub street_name: Option<String>,
    pub duration_seconds: Option<f64>,
    pub turn_angle_degrees: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteData {
    pub geometry: Vec<PointData>,
    pub instructions: Vec<InstructionStepData>,
}

impl From<RouteData> for RouteResult {
    fn from(r: RouteData) -> Self {
        RouteResult {
            geometry: r.geometry.into_iter().map(GeoPoint::from).collect(),
            instructions: r
                .instructions
                .into_iter()
                .map(|s| InstructionStep {
                    maneuver: s.maneuver,
                    street_name: s.street_name,
                    duration_seconds: s.duration_seconds,
                    turn_angle_degrees: s.turn_angle_degrees,
                })
                .collect(),
        }
    }
}

const LOCATION_FIELDS: &str = "id name locationType latitude longitude borough accessible";

/// Build the variables JSON for a route query.
pub fn build_route_variables(waypoints: &WaypointList) -> serde_json::Value {
    let points: Vec<PointData> = waypoints.points().iter().copied().map(PointData::from).collect();
    serde_json::json!({ "waypoints": points })
}

pub fn build_search_variables(term: &str, limit: usize) -> serde_json::Value {
    serde_json::json!({ "term": term, "limit": limit })
}

// API functions

#[derive(Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationData>,
}

pub async fn fetch_locations() -> Result<Vec<CatalogLocation>, String> {
    let resp: LocationsResponse = query(
        &format!("query {{ locations {{ {LOCATION_FIELDS} }} }}"),
        None,
    )
    .await
    .map_err(|e| e.to_string())?;
    Ok(resp.locations.into_iter().map(CatalogLocation::from).collect())
}

#[derive(Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "searchLocations")]
    pub search_locations: Vec<LocationData>,
}

pub async fn search_locations(term: &str, limit: usize) -> Result<Vec<CatalogLocation>, String> {
    let resp: SearchResponse = query(
        &format!(
            "query Search($term: String!, $limit: Int) {{ searchLocations(term: $term, limit: $limit) {{ {LOCATION_FIELDS} }} }}"
        ),
        Some(build_search_variables(term, limit)),
    )
    .await
    .map_err(|e| e.to_string())?;
    Ok(resp
        .search_locations
        .into_iter()
        .map(CatalogLocation::from)
        .collect())
}

#[derive(Deserialize)]
pub struct RouteResponse {
    pub route: RouteData,
}

/// Resolve a composed waypoint list into a walking route through the server.
pub async fn resolve_route(waypoints: &WaypointList) -> Result<RouteResult, RoutingBackendError> {
    let resp: RouteResponse = query(
        r#"query Route($waypoints: [PointInput!]!) {
            route(waypoints: $waypoints) {
                geometry { latitude longitude }
                instructions { maneuver streetName durationSeconds turnAngleDegrees }
            }
        }"#,
        Some(build_route_variables(waypoints)),
    )
    .await?;
    Ok(resp.route.into())
}
