use crate::endpoints::map::INDEX_HTML;
use crate::endpoints::server::AppState;
use crate::geometry::MapView;
use crate::geometry::view::MAX_ZOOM;
use crate::models::catchpit::to_feature_collection;
use crate::models::geometry::{ImageBounds, LatLng};
use crate::models::timeline::TimelineField;
use crate::timeline::{FieldInput, TimelineError};
use crate::utils::export::timeline_csv;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
struct OverlayResponse {
    bounds: ImageBounds,
    image_url: &'static str,
    opacity: f64,
    center: LatLng,
    zoom: u8,
    catchpits: usize,
}

#[derive(Deserialize)]
pub struct MarkerQuery {
    zoom: Option<f64>,
}

#[derive(Deserialize)]
pub struct NewPoint {
    time: FieldInput,
    rainfall: FieldInput,
}

#[derive(Deserialize)]
pub struct FieldEdit {
    field: TimelineField,
    value: FieldInput,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDelta {
    delta_x: f64,
    delta_y: f64,
}

impl IntoResponse for TimelineError {
    fn into_response(self) -> Response {
        let status = match self {
            TimelineError::NotANumber(_) => StatusCode::BAD_REQUEST,
            TimelineError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

pub async fn webmap_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

pub async fn overlay_handler(State(state): State<Arc<AppState>>) -> Response {
    let guard = state.overlay.read().await;
    match guard.overlay() {
        Some(overlay) => Json(OverlayResponse {
            bounds: overlay.bounds,
            image_url: "/overlay/image",
            opacity: state.config.overlay_opacity,
            center: state.config.center(),
            zoom: state.config.zoom,
            catchpits: overlay.catchpits.len(),
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, "Overlay bounds not computed yet").into_response(),
    }
}

pub async fn catchpits_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let guard = state.overlay.read().await;
    let features = guard
        .overlay()
        .map(|o| o.catchpits.as_slice())
        .unwrap_or_default();
    Json(to_feature_collection(features))
}

pub async fn markers_handler(
    Query(query): Query<MarkerQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let zoom = query
        .zoom
        .filter(|z| z.is_finite())
        .unwrap_or(state.config.zoom as f64)
        .clamp(0.0, MAX_ZOOM);
    let view = MapView::new(zoom);
    let guard = state.overlay.read().await;
    let markers = guard
        .overlay()
        .map(|o| o.markers(&view, state.config.marker_offset()))
        .unwrap_or_default();
    Json(markers)
}

pub async fn toggle_handler(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mut guard = state.overlay.write().await;
    let toggled = guard
        .overlay_mut()
        .and_then(|overlay| overlay.toggle_blocked_by_key(&id));
    match toggled {
        Some(feature) => {
            info!(id = %feature.id, blocked = feature.blocked, "catchpit toggled");
            Json(feature.to_geojson()).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("Catchpit not found: '{}'", id)).into_response(),
    }
}

pub async fn timeline_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.timeline.lock().await.points().to_vec())
}

pub async fn add_point(
    State(state): State<Arc<AppState>>,
    Json(point): Json<NewPoint>,
) -> Result<impl IntoResponse, TimelineError> {
    let mut timeline = state.timeline.lock().await;
    timeline.add_from_input(&point.time, &point.rainfall)?;
    Ok(Json(timeline.points().to_vec()))
}

pub async fn edit_point(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
    Json(edit): Json<FieldEdit>,
) -> Result<impl IntoResponse, TimelineError> {
    let mut timeline = state.timeline.lock().await;
    timeline.edit_field(index, edit.field, &edit.value)?;
    Ok(Json(timeline.points().to_vec()))
}

pub async fn remove_point(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, TimelineError> {
    let mut timeline = state.timeline.lock().await;
    timeline.remove(index)?;
    Ok(Json(timeline.points().to_vec()))
}

pub async fn drag_point(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
    Json(delta): Json<DragDelta>,
) -> Result<impl IntoResponse, TimelineError> {
    let mut timeline = state.timeline.lock().await;
    timeline.drag(index, delta.delta_x, delta.delta_y)?;
    Ok(Json(timeline.points().to_vec()))
}

pub async fn chart_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.timeline.lock().await.chart_series())
}

pub async fn timeline_csv_handler(State(state): State<Arc<AppState>>) -> Response {
    let points = state.timeline.lock().await.points().to_vec();
    match timeline_csv(&points) {
        Ok(csv) => ([(header::CONTENT_TYPE, "text/csv")], csv).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn simulation_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.viewer.descriptor())
}
