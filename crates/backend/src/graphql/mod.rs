use std::sync::Arc;

use accessable_shared::models::{CatalogLocation, LocationType};
use accessable_shared::{
    waypoints, GeoPoint, InstructionStep, RouteResult, RoutingBackendError, WaypointError,
    WaypointList,
};
use async_graphql::{Context, Enum, ErrorExtensions, InputObject, Object, SimpleObject};

use crate::catalog::{Catalog, DEFAULT_SEARCH_LIMIT};
use crate::routing::OsrmClient;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlLocationType {
    Beach,
    Playground,
    PedestrianSignal,
    SubwayStop,
    Restroom,
    Other,
}

impl From<LocationType> for GqlLocationType {
    fn from(t: LocationType) -> Self {
        match t {
            LocationType::Beach => GqlLocationType::Beach,
            LocationType::Playground => GqlLocationType::Playground,
            LocationType::PedestrianSignal => GqlLocationType::PedestrianSignal,
            LocationType::SubwayStop => GqlLocationType::SubwayStop,
            LocationType::Restroom => GqlLocationType::Restroom,
            LocationType::Other => GqlLocationType::Other,
        }
    }
}

impl From<GqlLocationType> for LocationType {
    fn from(t: GqlLocationType) -> Self {
        match t {
            GqlLocationType::Beach => LocationType::Beach,
            GqlLocationType::Playground => LocationType::Playground,
            GqlLocationType::PedestrianSignal => LocationType::PedestrianSignal,
            GqlLocationType::SubwayStop => LocationType::SubwayStop,
            GqlLocationType::Restroom => LocationType::Restroom,
            GqlLocationType::Other => LocationType::Other,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject, Clone, Copy)]
pub struct GqlPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for GqlPoint {
    fn from(p: GeoPoint) -> Self {
        GqlPoint {
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlLocation {
    pub id: String,
    pub name: String,
    pub location_type: GqlLocationType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub borough: Option<String>,
    pub accessible: Option<String>,
}

impl From<&CatalogLocation> for GqlLocation {
    fn from(l: &CatalogLocation) -> Self {
        GqlLocation {
            id: l.id.clone(),
            name: l.name.clone(),
            location_type: l.location_type.into(),
            latitude: l.latitude,
            longitude: l.longitude,
            borough: l.borough.clone(),
            accessible: l.accessible.clone(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlWaypoints {
    pub points: Vec<GqlPoint>,
    pub signal_ids: Vec<String>,
}

impl From<WaypointList> for GqlWaypoints {
    fn from(w: WaypointList) -> Self {
        GqlWaypoints {
            points: w.points().iter().copied().map(GqlPoint::from).collect(),
            signal_ids: w.signals().iter().map(|s| s.0.clone()).collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlInstructionStep {
    pub maneuver: Option<String>,
    pub street_name: Option<String>,
    pub duration_seconds: Option<f64>,
    pub turn_angle_degrees: Option<f64>,
}

impl From<InstructionStep> for GqlInstructionStep {
    fn from(s: InstructionStep) -> Self {
        GqlInstructionStep {
            maneuver: s.maneuver,
            street_name: s.street_name,
            duration_seconds: s.duration_seconds,
            turn_angle_degrees: s.turn_angle_degrees,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlRoute {
    pub geometry: Vec<GqlPoint>,
    pub instructions: Vec<GqlInstructionStep>,
}

impl From<RouteResult> for GqlRoute {
    fn from(r: RouteResult) -> Self {
        GqlRoute {
            geometry: r.geometry.into_iter().map(GqlPoint::from).collect(),
            instructions: r
                .instructions
                .into_iter()
                .map(GqlInstructionStep::from)
                .collect(),
        }
    }
}

// Input types

#[derive(InputObject, Clone, Copy)]
pub struct PointInput {
    pub latitude: f64,
    pub longitude: f64,
}

impl PointInput {
    fn to_point(self) -> async_graphql::Result<GeoPoint> {
        GeoPoint::from_parts(Some(self.latitude), Some(self.longitude)).ok_or_else(|| {
            async_graphql::Error::new("coordinates must be finite numbers")
                .extend_with(|_, e| e.set("code", "INVALID_COORDINATES"))
        })
    }
}

fn routing_error(err: RoutingBackendError) -> async_graphql::Error {
    let code = err.code();
    async_graphql::Error::new(err.to_string()).extend_with(|_, e| e.set("code", code))
}

fn waypoint_error(err: WaypointError) -> async_graphql::Error {
    async_graphql::Error::new(err.to_string())
        .extend_with(|_, e| e.set("code", "TOO_FEW_WAYPOINTS"))
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Catalog locations, optionally restricted to one category.
    async fn locations(
        &self,
        ctx: &Context<'_>,
        location_type: Option<GqlLocationType>,
    ) -> async_graphql::Result<Vec<GqlLocation>> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        Ok(catalog
            .locations(location_type.map(LocationType::from))
            .into_iter()
            .map(GqlLocation::from)
            .collect())
    }

    async fn search_locations(
        &self,
        ctx: &Context<'_>,
        term: String,
        limit: Option<i32>,
    ) -> async_graphql::Result<Vec<GqlLocation>> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        let limit = limit
            .map(|l| l.max(0) as usize)
            .unwrap_or(DEFAULT_SEARCH_LIMIT);
        Ok(catalog
            .search(&term, limit)
            .into_iter()
            .map(GqlLocation::from)
            .collect())
    }

    /// Start, pedestrian signals that make progress toward the destination, destination.
    async fn compose_waypoints(
        &self,
        ctx: &Context<'_>,
        start: PointInput,
        destination: PointInput,
    ) -> async_graphql::Result<GqlWaypoints> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        let list = waypoints::compose(
            start.to_point()?,
            destination.to_point()?,
            catalog.signals(),
        );
        Ok(list.into())
    }

    /// Walking route through `waypoints`, in the given order.
    async fn route(
        &self,
        ctx: &Context<'_>,
        waypoints: Vec<PointInput>,
    ) -> async_graphql::Result<GqlRoute> {
        let client = ctx.data::<Arc<OsrmClient>>()?;
        let points = waypoints
            .into_iter()
            .map(PointInput::to_point)
            .collect::<async_graphql::Result<Vec<_>>>()?;
        let list = WaypointList::try_from(points).map_err(waypoint_error)?;
        let route = client.route(&list).await.map_err(routing_error)?;
        Ok(route.into())
    }
}

pub type Schema = async_graphql::Schema<
    QueryRoot,
    async_graphql::EmptyMutation,
    async_graphql::EmptySubscription,
>;

pub fn build_schema(catalog: Arc<Catalog>, router: Arc<OsrmClient>) -> Schema {
    async_graphql::Schema::build(
        QueryRoot,
        async_graphql::EmptyMutation,
        async_graphql::EmptySubscription,
    )
    .data(catalog)
    .data(router)
    .finish()
}
