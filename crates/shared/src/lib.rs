pub mod center;
pub mod error;
pub mod geo;
pub mod instructions;
pub mod models;
pub mod osrm;
pub mod overlay;
pub mod session;
pub mod waypoints;

pub use error::{ConfigError, RoutingBackendError, WaypointError};
pub use models::{GeoPoint, InstructionStep, RouteResult, SignalCandidate, WaypointList};
