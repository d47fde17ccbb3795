//! Catchpit overlay: projected catchpit points → geographic markers plus the
//! bounds the site raster is stretched over.

use crate::geometry::ViewTransform;
use crate::geometry::projection::project_to_geographic;
use crate::models::catchpit::{CatchpitFeature, FeatureCollection, FeatureId, is_truthy};
use crate::models::geometry::{ImageBounds, ImageSize, LatLng, Point};
use crate::reader::LoadError;
use serde::Serialize;
use std::collections::HashSet;

pub const MARKER_RADIUS: u32 = 5;
pub const BLOCKED_COLOUR: &str = "red";
pub const OPEN_COLOUR: &str = "green";

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub bounds: ImageBounds,
    pub catchpits: Vec<CatchpitFeature>,
}

/// Marker as drawn on the map, after the pixel adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: FeatureId,
    pub center: LatLng,
    pub radius: u32,
    pub color: &'static str,
    pub blocked: bool,
}

/// Convert every feature to lat/lng and derive the image bounds.
///
/// The bounds' height comes from the longitude span and the raster's aspect
/// ratio, hanging down from the northernmost catchpit.
pub fn convert_and_bound(
    collection: &FeatureCollection,
    image: ImageSize,
    source_crs: i32,
) -> Result<Overlay, LoadError> {
    if image.width == 0 || image.height == 0 {
        return Err(LoadError::InvalidImageSize(image.width, image.height));
    }
    if collection.features.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lng = f64::INFINITY;
    let mut max_lng = f64::NEG_INFINITY;

    let mut seen = HashSet::new();
    let mut catchpits = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(LoadError::MissingGeometry { index })?;
        if geometry.kind != "Point" {
            return Err(LoadError::UnsupportedGeometry {
                index,
                kind: geometry.kind.clone(),
            });
        }
        let (x, y) = match geometry.coordinates.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => (*x, *y),
            _ => return Err(LoadError::BadCoordinate { index }),
        };

        let (lng, lat) = project_to_geographic(x, y, source_crs).map_err(|e| {
            LoadError::Projection {
                index,
                message: e.to_string(),
            }
        })?;
        if !lat.is_finite() || !lng.is_finite() {
            return Err(LoadError::BadCoordinate { index });
        }

        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
        min_lng = min_lng.min(lng);
        max_lng = max_lng.max(lng);

        let mut properties = feature.properties.clone().unwrap_or_default();
        let blocked = properties
            .remove("blocked")
            .is_some_and(|v| is_truthy(&v));

        let id = feature
            .id
            .as_ref()
            .and_then(FeatureId::from_json)
            .or_else(|| properties.get("id").and_then(FeatureId::from_json))
            .unwrap_or(FeatureId::Number(index as u64));
        // Unique by rendered key, which is what markers and toggles use
        if !seen.insert(id.to_string()) {
            return Err(LoadError::DuplicateId(id));
        }

        catchpits.push(CatchpitFeature {
            id,
            position: LatLng::new(lat, lng),
            source: [x, y],
            blocked,
            properties,
        });
    }

    let lng_span = max_lng - min_lng;
    let lat_span_for_image = lng_span / image.aspect_ratio();
    let bounds = ImageBounds {
        south_west: LatLng::new(max_lat - lat_span_for_image, min_lng),
        north_east: LatLng::new(max_lat, max_lng),
    };

    Ok(Overlay { bounds, catchpits })
}

/// Shift a marker by a constant pixel vector at the view's current zoom.
pub fn adjust_marker(view: &dyn ViewTransform, position: LatLng, offset: Point) -> LatLng {
    let point = view.lat_lng_to_layer_point(position) + offset;
    view.layer_point_to_lat_lng(point)
}

impl Overlay {
    /// Flip `blocked` on the catchpit with this id. Unknown ids change nothing.
    pub fn toggle_blocked(&mut self, id: &FeatureId) -> Option<&CatchpitFeature> {
        self.toggle_where(|f| &f.id == id)
    }

    /// Toggle by the id as it appears in marker output and URLs.
    pub fn toggle_blocked_by_key(&mut self, key: &str) -> Option<&CatchpitFeature> {
        self.toggle_where(|f| f.id.to_string() == key)
    }

    fn toggle_where<P>(&mut self, matches: P) -> Option<&CatchpitFeature>
    where
        P: Fn(&CatchpitFeature) -> bool,
    {
        let feature = self.catchpits.iter_mut().find(|f| matches(f))?;
        feature.blocked = !feature.blocked;
        Some(feature)
    }

    pub fn blocked_count(&self) -> usize {
        self.catchpits.iter().filter(|f| f.blocked).count()
    }

    pub fn markers(&self, view: &dyn ViewTransform, offset: Point) -> Vec<Marker> {
        self.catchpits
            .iter()
            .map(|f| Marker {
                id: f.id.clone(),
                center: adjust_marker(view, f.position, offset),
                radius: MARKER_RADIUS,
                color: if f.blocked { BLOCKED_COLOUR } else { OPEN_COLOUR },
                blocked: f.blocked,
            })
            .collect()
    }
}

/// Nothing is drawn until the catchpits have loaded; after that the overlay
/// stays put for the life of the process.
#[derive(Debug, Default)]
pub enum OverlayState {
    #[default]
    Pending,
    Ready(Overlay),
}

impl OverlayState {
    /// Returns false if the overlay was already computed.
    pub fn complete(&mut self, overlay: Overlay) -> bool {
        match self {
            OverlayState::Pending => {
                *self = OverlayState::Ready(overlay);
                true
            }
            OverlayState::Ready(_) => false,
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match self {
            OverlayState::Ready(overlay) => Some(overlay),
            OverlayState::Pending => None,
        }
    }

    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        match self {
            OverlayState::Ready(overlay) => Some(overlay),
            OverlayState::Pending => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MapView;
    use serde_json::json;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    fn two_points() -> FeatureCollection {
        collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }, "properties": {} },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [100.0, 100.0] }, "properties": {} }
            ]
        }))
    }

    fn site_points() -> FeatureCollection {
        collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "id": 1, "geometry": { "type": "Point", "coordinates": [19453500.0, -4406300.0] }, "properties": { "blocked": true } },
                { "id": 2, "geometry": { "type": "Point", "coordinates": [19453900.0, -4406100.0] }, "properties": null },
                { "id": 3, "geometry": { "type": "Point", "coordinates": [19454300.0, -4406250.0] } },
                { "properties": { "id": "CP-9" }, "geometry": { "type": "Point", "coordinates": [19453700.0, -4406350.0] } }
            ]
        }))
    }

    #[test]
    fn two_point_scenario() {
        let overlay = convert_and_bound(&two_points(), ImageSize::default(), 3857).unwrap();
        assert_eq!(overlay.catchpits.len(), 2);
        for f in &overlay.catchpits {
            assert!(f.position.lat.is_finite() && f.position.lng.is_finite());
            assert!(!f.blocked);
        }
        let b = overlay.bounds;
        assert!(b.north_east.lng > b.south_west.lng);
        assert!(b.south_west.lat < b.north_east.lat);
    }

    #[test]
    fn north_east_corner_is_the_max_extent() {
        let overlay = convert_and_bound(&site_points(), ImageSize::default(), 3857).unwrap();
        let max_lat = overlay
            .catchpits
            .iter()
            .map(|f| f.position.lat)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_lng = overlay
            .catchpits
            .iter()
            .map(|f| f.position.lng)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_lng = overlay
            .catchpits
            .iter()
            .map(|f| f.position.lng)
            .fold(f64::INFINITY, f64::min);

        assert_eq!(overlay.bounds.north_east.lat, max_lat);
        assert_eq!(overlay.bounds.north_east.lng, max_lng);
        assert_eq!(overlay.bounds.south_west.lng, min_lng);
        for f in &overlay.catchpits {
            assert!(overlay.bounds.south_west.lng <= f.position.lng);
        }
    }

    #[test]
    fn image_height_follows_aspect_ratio() {
        let image = ImageSize::default();
        let overlay = convert_and_bound(&site_points(), image, 3857).unwrap();
        let b = overlay.bounds;
        let lng_span = b.north_east.lng - b.south_west.lng;
        let lat_span = b.north_east.lat - b.south_west.lat;
        assert!((lng_span / lat_span - image.aspect_ratio()).abs() < 1e-9);
        // The points span less latitude than the framed image, so all sit inside it
        for f in &overlay.catchpits {
            assert!(b.south_west.lat <= f.position.lat);
        }
    }

    #[test]
    fn ids_and_blocked_are_normalised() {
        let overlay = convert_and_bound(&site_points(), ImageSize::default(), 3857).unwrap();
        let ids: Vec<_> = overlay.catchpits.iter().map(|f| f.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                FeatureId::Number(1),
                FeatureId::Number(2),
                FeatureId::Number(3),
                FeatureId::Text("CP-9".into()),
            ]
        );
        let blocked: Vec<_> = overlay.catchpits.iter().map(|f| f.blocked).collect();
        assert_eq!(blocked, vec![true, false, false, false]);
    }

    #[test]
    fn loose_blocked_flags_count_as_blocked() {
        let fc = collection(json!({
            "features": [
                { "id": 1, "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }, "properties": { "blocked": 1 } },
                { "id": 2, "geometry": { "type": "Point", "coordinates": [1.0, 0.0] }, "properties": { "blocked": "yes" } },
                { "id": 3, "geometry": { "type": "Point", "coordinates": [2.0, 0.0] }, "properties": { "blocked": 0 } },
                { "id": 4, "geometry": { "type": "Point", "coordinates": [3.0, 0.0] }, "properties": { "blocked": "" } },
                { "id": 5, "geometry": { "type": "Point", "coordinates": [4.0, 0.0] }, "properties": { "blocked": null } }
            ]
        }));
        let overlay = convert_and_bound(&fc, ImageSize::default(), 3857).unwrap();
        let blocked: Vec<_> = overlay.catchpits.iter().map(|f| f.blocked).collect();
        assert_eq!(blocked, vec![true, true, false, false, false]);

        let markers = overlay.markers(&MapView::new(15.0), Point::new(0.0, 0.0));
        assert_eq!(markers[0].color, BLOCKED_COLOUR);
        assert_eq!(markers[2].color, OPEN_COLOUR);
    }

    #[test]
    fn digit_string_ids_toggle_by_key() {
        let fc = collection(json!({
            "features": [
                { "id": "42", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "id": "43", "geometry": { "type": "Point", "coordinates": [5.0, 5.0] } }
            ]
        }));
        let mut overlay = convert_and_bound(&fc, ImageSize::default(), 3857).unwrap();
        assert_eq!(overlay.catchpits[0].id, FeatureId::Text("42".into()));

        let toggled = overlay.toggle_blocked_by_key("42").unwrap();
        assert_eq!(toggled.id, FeatureId::Text("42".into()));
        assert!(toggled.blocked);
        assert!(!overlay.catchpits[1].blocked);
        assert!(overlay.toggle_blocked_by_key("44").is_none());
    }

    #[test]
    fn number_and_text_ids_with_same_key_clash() {
        let fc = collection(json!({
            "features": [
                { "id": 7, "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "id": "7", "geometry": { "type": "Point", "coordinates": [5.0, 5.0] } }
            ]
        }));
        let err = convert_and_bound(&fc, ImageSize::default(), 3857).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId(FeatureId::Text(ref key)) if key == "7"));
    }

    #[test]
    fn missing_ids_fall_back_to_index() {
        let overlay = convert_and_bound(&two_points(), ImageSize::default(), 3857).unwrap();
        assert_eq!(overlay.catchpits[0].id, FeatureId::Number(0));
        assert_eq!(overlay.catchpits[1].id, FeatureId::Number(1));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let fc = collection(json!({
            "features": [
                { "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "id": 0, "geometry": { "type": "Point", "coordinates": [5.0, 5.0] } }
            ]
        }));
        // second feature has falsy id 0, so it falls back to index 1: no clash
        assert!(convert_and_bound(&fc, ImageSize::default(), 3857).is_ok());

        let fc = collection(json!({
            "features": [
                { "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "id": 0, "geometry": { "type": "Point", "coordinates": [5.0, 5.0] } },
                { "id": 1, "geometry": { "type": "Point", "coordinates": [9.0, 9.0] } }
            ]
        }));
        let err = convert_and_bound(&fc, ImageSize::default(), 3857).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId(FeatureId::Number(1))));
    }

    #[test]
    fn malformed_input_is_an_error() {
        let empty = collection(json!({ "features": [] }));
        assert!(matches!(
            convert_and_bound(&empty, ImageSize::default(), 3857),
            Err(LoadError::Empty)
        ));

        let short = collection(json!({
            "features": [{ "geometry": { "type": "Point", "coordinates": [1.0] } }]
        }));
        assert!(matches!(
            convert_and_bound(&short, ImageSize::default(), 3857),
            Err(LoadError::BadCoordinate { index: 0 })
        ));

        let line = collection(json!({
            "features": [{ "geometry": { "type": "LineString", "coordinates": [1.0, 2.0] } }]
        }));
        assert!(matches!(
            convert_and_bound(&line, ImageSize::default(), 3857),
            Err(LoadError::UnsupportedGeometry { index: 0, .. })
        ));

        let no_geometry = collection(json!({ "features": [{ "properties": {} }] }));
        assert!(matches!(
            convert_and_bound(&no_geometry, ImageSize::default(), 3857),
            Err(LoadError::MissingGeometry { index: 0 })
        ));

        let zero = ImageSize {
            width: 3350,
            height: 0,
        };
        assert!(matches!(
            convert_and_bound(&two_points(), zero, 3857),
            Err(LoadError::InvalidImageSize(3350, 0))
        ));
    }

    #[test]
    fn geographic_input_passes_through() {
        let fc = collection(json!({
            "features": [
                { "geometry": { "type": "Point", "coordinates": [174.75, -36.75] } },
                { "geometry": { "type": "Point", "coordinates": [174.76, -36.74] } }
            ]
        }));
        let overlay = convert_and_bound(&fc, ImageSize::default(), 4326).unwrap();
        assert_eq!(overlay.catchpits[0].position, LatLng::new(-36.75, 174.75));
        assert_eq!(overlay.bounds.north_east, LatLng::new(-36.74, 174.76));
    }

    #[test]
    fn toggle_twice_restores() {
        let mut overlay = convert_and_bound(&site_points(), ImageSize::default(), 3857).unwrap();
        let original = overlay.clone();
        let id = FeatureId::Number(2);

        assert!(overlay.toggle_blocked(&id).unwrap().blocked);
        assert_eq!(overlay.blocked_count(), 2);
        // only the toggled feature changed
        for (a, b) in overlay.catchpits.iter().zip(&original.catchpits) {
            if a.id != id {
                assert_eq!(a, b);
            }
        }
        assert!(!overlay.toggle_blocked(&id).unwrap().blocked);
        assert_eq!(overlay, original);
    }

    #[test]
    fn toggle_unknown_id_is_a_no_op() {
        let mut overlay = convert_and_bound(&site_points(), ImageSize::default(), 3857).unwrap();
        let original = overlay.clone();
        assert!(overlay.toggle_blocked(&FeatureId::Number(99)).is_none());
        assert!(
            overlay
                .toggle_blocked(&FeatureId::Text("nope".into()))
                .is_none()
        );
        assert_eq!(overlay, original);
    }

    #[test]
    fn marker_offset_round_trips_through_pixels() {
        let view = MapView::new(15.0);
        let position = LatLng::new(-36.751697, 174.754);
        let offset = Point::new(10.0, 10.0);

        let adjusted = adjust_marker(&view, position, offset);
        let moved = view.lat_lng_to_layer_point(adjusted) - view.lat_lng_to_layer_point(position);
        assert!((moved.x - 10.0).abs() < 1e-6);
        assert!((moved.y - 10.0).abs() < 1e-6);

        // Subtracting the same pixel vector lands back on the original
        let back = adjust_marker(&view, adjusted, Point::new(-10.0, -10.0));
        assert!((back.lat - position.lat).abs() < 1e-9);
        assert!((back.lng - position.lng).abs() < 1e-9);
    }

    #[test]
    fn marker_offset_shrinks_with_zoom() {
        let position = LatLng::new(-36.751697, 174.754);
        let offset = Point::new(10.0, 10.0);
        let near = adjust_marker(&MapView::new(18.0), position, offset);
        let far = adjust_marker(&MapView::new(12.0), position, offset);
        // +x is east, +y is south in layer space
        assert!(far.lng - position.lng > near.lng - position.lng);
        assert!(far.lat < near.lat && near.lat < position.lat);
    }

    #[test]
    fn markers_are_coloured_by_state() {
        let overlay = convert_and_bound(&site_points(), ImageSize::default(), 3857).unwrap();
        let markers = overlay.markers(&MapView::new(15.0), Point::new(10.0, 10.0));
        assert_eq!(markers.len(), 4);
        assert_eq!(markers[0].color, BLOCKED_COLOUR);
        assert_eq!(markers[1].color, OPEN_COLOUR);
        assert!(markers.iter().all(|m| m.radius == MARKER_RADIUS));
    }

    #[test]
    fn state_completes_once() {
        let mut state = OverlayState::default();
        assert!(state.overlay().is_none());
        let overlay = convert_and_bound(&two_points(), ImageSize::default(), 3857).unwrap();
        assert!(state.complete(overlay.clone()));
        assert!(!state.complete(overlay));
        assert!(state.overlay().is_some());
    }
}
