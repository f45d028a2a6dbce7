use crate::geo::{self, ServiceArea};
use crate::models::GeoPoint;

/// The part of the map surface that controls what is in view.
pub trait MapViewport {
    fn zoom(&self) -> u8;
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
}

/// The only events allowed to move the map. Marker selection and filter
/// changes have no variant here on purpose: they never recenter.
#[derive(Debug, Clone, PartialEq)]
pub enum RecenterTrigger {
    /// The nearby set changed; entries without coordinates are `None`.
    NearbySetChanged(Vec<Option<GeoPoint>>),
    SearchLocationChanged(GeoPoint),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MapCenterController {
    area: ServiceArea,
}

impl MapCenterController {
    pub fn new(area: ServiceArea) -> Self {
        MapCenterController { area }
    }

    /// Where `trigger` wants the map centered, kept inside the service area.
    pub fn target(&self, trigger: &RecenterTrigger) -> GeoPoint {
        let center = match trigger {
            RecenterTrigger::NearbySetChanged(members) => {
                let defined: Vec<GeoPoint> = members.iter().flatten().copied().collect();
                geo::centroid(&defined).unwrap_or(self.area.fallback_center)
            }
            RecenterTrigger::SearchLocationChanged(point) => *point,
        };
        self.area.clamp(center)
    }

    /// Move `viewport` to the trigger's target at the current zoom.
    pub fn recenter<V: MapViewport>(
        &self,
        viewport: &mut V,
        trigger: &RecenterTrigger,
    ) -> GeoPoint {
        let center = self.target(trigger);
        let zoom = viewport.zoom();
        viewport.set_view(center, zoom);
        tracing::debug!(%center, zoom, "map recentered");
        center
    }
}
