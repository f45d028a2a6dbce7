use serde::{Deserialize, Serialize};

use crate::error::WaypointError;
use crate::geo;

/// A geocoded point. Equality is exact coordinate equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Build a point from possibly-missing coordinates.
    /// Missing or non-finite values yield `None`.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(GeoPoint::new(lat, lon))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Opaque identity of a signal candidate, taken from the catalog record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(pub String);

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pedestrian-signal crossing eligible as an intermediate waypoint.
/// Two candidates may share coordinates and still be distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub id: SignalId,
    pub point: GeoPoint,
}

impl SignalCandidate {
    pub fn new(id: impl Into<String>, point: GeoPoint) -> Self {
        SignalCandidate {
            id: SignalId(id.into()),
            point,
        }
    }
}

/// Ordered waypoints of one route request: start first, destination last.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointList {
    points: Vec<GeoPoint>,
    signals: Vec<SignalId>,
}

impl WaypointList {
    pub(crate) fn from_parts(points: Vec<GeoPoint>, signals: Vec<SignalId>) -> Self {
        debug_assert!(points.len() >= 2);
        WaypointList { points, signals }
    }

    /// A straight start → destination list without intermediate signals.
    pub fn direct(start: GeoPoint, destination: GeoPoint) -> Self {
        WaypointList::from_parts(vec![start, destination], Vec::new())
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Identities of the signals the list passes through, in route order.
    pub fn signals(&self) -> &[SignalId] {
        &self.signals
    }

    pub fn start(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn destination(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a list holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<Vec<GeoPoint>> for WaypointList {
    type Error = WaypointError;

    fn try_from(points: Vec<GeoPoint>) -> Result<Self, Self::Error> {
        if points.len() < 2 {
            return Err(WaypointError::TooFew(points.len()));
        }
        Ok(WaypointList::from_parts(points, Vec::new()))
    }
}

/// One turn-by-turn step. Absent fields are left out when rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_angle_degrees: Option<f64>,
}

/// Normalized answer of one successful routing backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub geometry: Vec<GeoPoint>,
    #[serde(default)]
    pub instructions: Vec<InstructionStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Beach,
    Playground,
    PedestrianSignal,
    SubwayStop,
    Restroom,
    #[serde(other)]
    Other,
}

impl LocationType {
    pub const ALL: [LocationType; 6] = [
        LocationType::Playground,
        LocationType::PedestrianSignal,
        LocationType::Beach,
        LocationType::SubwayStop,
        LocationType::Restroom,
        LocationType::Other,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            LocationType::Beach => "beach",
            LocationType::Playground => "playground",
            LocationType::PedestrianSignal => "pedestrian_signal",
            LocationType::SubwayStop => "subway_stop",
            LocationType::Restroom => "restroom",
            LocationType::Other => "other",
        }
    }

    pub fn from_slug(slug: &str) -> LocationType {
        LocationType::ALL
            .into_iter()
            .find(|t| t.slug() == slug)
            .unwrap_or(LocationType::Other)
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationType::Beach => write!(f, "Beaches"),
            LocationType::Playground => write!(f, "Playgrounds"),
            LocationType::PedestrianSignal => write!(f, "Pedestrian Signals"),
            LocationType::SubwayStop => write!(f, "Subway Stops"),
            LocationType::Restroom => write!(f, "Restrooms"),
            LocationType::Other => write!(f, "Other"),
        }
    }
}

/// A point of interest as delivered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLocation {
    pub id: String,
    #[serde(alias = "Name")]
    pub name: String,
    pub location_type: LocationType,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default, alias = "Accessible")]
    pub accessible: Option<String>,
}

impl CatalogLocation {
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }
}

/// Pedestrian signals of a catalog as waypoint candidates, in catalog order.
/// Records without coordinates are skipped.
pub fn signal_candidates(locations: &[CatalogLocation]) -> Vec<SignalCandidate> {
    locations
        .iter()
        .filter(|l| l.location_type == LocationType::PedestrianSignal)
        .filter_map(|l| {
            l.point().map(|point| SignalCandidate {
                id: SignalId(l.id.clone()),
                point,
            })
        })
        .collect()
}

/// Default radius of the nearby set around the user's start point.
pub const NEARBY_RADIUS_M: f64 = 1_000.0;

/// Locations within `radius_m` of `origin`, in catalog order.
pub fn nearby<'a>(
    locations: &'a [CatalogLocation],
    origin: GeoPoint,
    radius_m: f64,
) -> Vec<&'a CatalogLocation> {
    locations
        .iter()
        .filter(|l| {
            l.point()
                .is_some_and(|p| geo::distance_m(origin, p) <= radius_m)
        })
        .collect()
}
