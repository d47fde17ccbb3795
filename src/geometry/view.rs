use super::projection::{R_MAJOR, lon_lat_to_mercator, mercator_to_lon_lat};
use crate::models::geometry::{LatLng, Point};
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
/// Deepest zoom the pixel maths is asked to handle
pub const MAX_ZOOM: f64 = 30.0;

/// Read-only view of the map's current zoom/pan, used to go between
/// geographic coordinates and layer pixels.
pub trait ViewTransform {
    fn lat_lng_to_layer_point(&self, latlng: LatLng) -> Point;
    fn layer_point_to_lat_lng(&self, point: Point) -> LatLng;
}

/// Leaflet-style EPSG:3857 view at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub zoom: f64,
    pub pixel_origin: Point,
}

impl MapView {
    pub fn new(zoom: f64) -> Self {
        MapView {
            zoom,
            pixel_origin: Point::new(0.0, 0.0),
        }
    }

    pub fn with_pixel_origin(mut self, origin: Point) -> Self {
        self.pixel_origin = origin;
        self
    }

    fn scale(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }
}

// Leaflet's EPSG3857 transformation coefficient
const TRANSFORM_COEFF: f64 = 0.5 / (PI * R_MAJOR);

impl ViewTransform for MapView {
    fn lat_lng_to_layer_point(&self, latlng: LatLng) -> Point {
        let (mx, my) = lon_lat_to_mercator(latlng.lng, latlng.lat);
        let scale = self.scale();
        let projected = Point::new(
            scale * (TRANSFORM_COEFF * mx + 0.5),
            scale * (-TRANSFORM_COEFF * my + 0.5),
        );
        projected - self.pixel_origin
    }

    fn layer_point_to_lat_lng(&self, point: Point) -> LatLng {
        let projected = point + self.pixel_origin;
        let scale = self.scale();
        let mx = (projected.x / scale - 0.5) / TRANSFORM_COEFF;
        let my = (projected.y / scale - 0.5) / -TRANSFORM_COEFF;
        let (lng, lat) = mercator_to_lon_lat(mx, my);
        LatLng::new(lat, lng)
    }
}
