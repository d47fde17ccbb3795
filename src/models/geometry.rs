use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

// Leaflet order: [lat, lng]
impl Serialize for LatLng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.lat)?;
        tup.serialize_element(&self.lng)?;
        tup.end()
    }
}

/// Pixel-space point in the map's layer coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Geographic rectangle an image overlay is stretched over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

// Serialised as [[south, west], [north, east]], ready for L.imageOverlay
impl Serialize for ImageBounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.south_west)?;
        tup.serialize_element(&self.north_east)?;
        tup.end()
    }
}

/// Pixel dimensions of the overlay raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize {
            width: 3350,
            height: 3000,
        }
    }
}
