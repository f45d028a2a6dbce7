//! Web-mercator math for the OSM tile map.
//!
//! World pixel coordinates follow the slippy-map convention: at zoom `z` the
//! world is `256 * 2^z` pixels square, origin at the north-west corner.

use std::f64::consts::PI;

use accessable_shared::center::MapViewport;
use accessable_shared::geo::{ServiceArea, NYC};
use accessable_shared::GeoPoint;

pub const TILE_SIZE: f64 = 256.0;
pub const MIN_ZOOM: u8 = 11;
pub const MAX_ZOOM: u8 = 18;

/// Mercator is undefined at the poles; clamp like every slippy map does.
const MAX_LATITUDE: f64 = 85.051_128_78;

pub fn tile_url(z: u8, x: i64, y: i64) -> String {
    format!("https://tile.openstreetmap.org/{z}/{x}/{y}.png")
}

fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom)
}

/// Geographic point to world pixels at `zoom`.
pub fn project(p: GeoPoint, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = p.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.longitude + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// World pixels at `zoom` back to a geographic point.
pub fn unproject(x: f64, y: f64, zoom: u8) -> GeoPoint {
    let size = world_size(zoom);
    let longitude = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let latitude = n.sinh().atan().to_degrees();
    GeoPoint::new(latitude, longitude)
}

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// One raster tile placed in container pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub url: String,
    pub left: f64,
    pub top: f64,
}

/// What the map container shows: a center, a zoom level and the container size.
/// The center never leaves `area`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
    pub width: f64,
    pub height: f64,
    area: ServiceArea,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Viewport::within(NYC, center, zoom)
    }

    pub fn within(area: ServiceArea, center: GeoPoint, zoom: u8) -> Self {
        Viewport {
            center: area.clamp(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width: 960.0,
            height: 640.0,
            area,
        }
    }

    pub fn area(&self) -> ServiceArea {
        self.area
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    /// World pixel of the container's top-left corner.
    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = project(self.center, self.zoom);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    /// Geographic point to container pixels.
    pub fn screen_position(&self, p: GeoPoint) -> (f64, f64) {
        let (ox, oy) = self.origin();
        let (x, y) = project(p, self.zoom);
        (x - ox, y - oy)
    }

    /// Container pixels to a geographic point.
    pub fn geo_at(&self, sx: f64, sy: f64) -> GeoPoint {
        let (ox, oy) = self.origin();
        unproject(ox + sx, oy + sy, self.zoom)
    }

    /// Move the content by a screen delta, as a drag does.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = project(self.center, self.zoom);
        self.center = self.area.clamp(unproject(cx - dx, cy - dy, self.zoom));
    }

    /// Change zoom while keeping the point under `(sx, sy)` fixed.
    /// Returns false when already at the limit.
    pub fn zoom_at(&mut self, zoom: u8, sx: f64, sy: f64) -> bool {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return false;
        }
        let anchor = self.geo_at(sx, sy);
        self.zoom = zoom;
        let (ax, ay) = project(anchor, zoom);
        let cx = ax - sx + self.width / 2.0;
        let cy = ay - sy + self.height / 2.0;
        self.center = self.area.clamp(unproject(cx, cy, zoom));
        true
    }

    /// Tiles covering the container, with their container offsets.
    pub fn visible_tiles(&self) -> Vec<PlacedTile> {
        let (ox, oy) = self.origin();
        let count = 1i64 << self.zoom;
        let first_x = (ox / TILE_SIZE).floor() as i64;
        let first_y = (oy / TILE_SIZE).floor() as i64;
        let last_x = ((ox + self.width) / TILE_SIZE).floor() as i64;
        let last_y = ((oy + self.height) / TILE_SIZE).floor() as i64;

        let mut tiles = Vec::new();
        for ty in first_y.max(0)..=last_y.min(count - 1) {
            for tx in first_x..=last_x {
                let wrapped = tx.rem_euclid(count);
                tiles.push(PlacedTile {
                    url: tile_url(self.zoom, wrapped, ty),
                    left: tx as f64 * TILE_SIZE - ox,
                    top: ty as f64 * TILE_SIZE - oy,
                });
            }
        }
        tiles
    }
}

impl MapViewport for Viewport {
    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.center = self.area.clamp(center);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}
