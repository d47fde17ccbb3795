use crate::config::Config;
use crate::endpoints::handlers::{
    add_point, catchpits_handler, chart_handler, drag_point, edit_point, markers_handler,
    overlay_handler, remove_point, simulation_handler, timeline_csv_handler, timeline_handler,
    toggle_handler, webmap_handler,
};
use crate::models::timeline::RainfallPoint;
use crate::overlay::{OverlayState, convert_and_bound};
use crate::reader::local::LocalCatchpitReader;
use crate::simulation::viewer_from_config;
use crate::timeline::RainfallTimeline;
use crate::traits::{CatchpitReader, SimulationViewer};
use crate::utils::raster::check_overlay_image;
use crate::utils::status::print_catchpit_summary;
use axum::{
    Router,
    routing::{get, get_service, post, put},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, error, info, warn};

pub struct AppState {
    pub config: Config,
    pub overlay: RwLock<OverlayState>,
    pub timeline: Mutex<RainfallTimeline>,
    pub timeline_tx: Arc<watch::Sender<Vec<RainfallPoint>>>,
    pub viewer: Arc<dyn SimulationViewer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let viewer = viewer_from_config(&config);
        let mut timeline = RainfallTimeline::default();
        let (tx, _rx) = watch::channel(timeline.points().to_vec());
        let timeline_tx = Arc::new(tx);

        let listener_tx = timeline_tx.clone();
        timeline.on_change(move |points| {
            debug!(points = points.len(), "rainfall timeline changed");
            listener_tx.send_replace(points.to_vec());
        });

        AppState {
            config,
            overlay: RwLock::new(OverlayState::Pending),
            timeline: Mutex::new(timeline),
            timeline_tx,
            viewer,
        }
    }
}

pub struct FloodServer {
    state: Arc<AppState>,
    reader: Arc<dyn CatchpitReader>,
}

impl FloodServer {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        if !config.data_folder.is_dir() {
            anyhow::bail!(
                "Data folder {:?} does not exist, set it with --data-folder",
                config.data_folder
            );
        }
        let reader: Arc<dyn CatchpitReader> =
            Arc::new(LocalCatchpitReader::new(config.catchpits_path()));
        Ok(Self::with_reader(config, reader))
    }

    pub fn with_reader(config: Config, reader: Arc<dyn CatchpitReader>) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
            reader,
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Receives the full rainfall timeline after every edit.
    pub fn subscribe_timeline(&self) -> watch::Receiver<Vec<RainfallPoint>> {
        self.state.timeline_tx.subscribe()
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Load catchpits in the background. The map stays empty until this
    /// finishes, and for good if it fails.
    pub fn spawn_catchpit_load(&self) -> tokio::task::JoinHandle<bool> {
        tokio::spawn(load_catchpits(self.state.clone(), self.reader.clone()))
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let config = &self.state.config;
        check_overlay_image(&config.overlay_image_path(), config.image_size());

        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        self.spawn_catchpit_load();

        println!(
            r#"
    🚀 floodview serving on {}

    🗺️ Catchpit map, rainfall timeline and simulation
       → http://{}/map

    📍 Catchpits (GeoJSON)
       → http://{}/catchpits

    🌧️ Rainfall timeline (JSON / CSV)
       → http://{}/timeline
       → http://{}/timeline.csv
            "#,
            addr, addr, addr, addr, addr
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let image = ServeFile::new(state.config.overlay_image_path());
    let mut app = Router::new()
        .route("/", get(webmap_handler))
        .route("/map", get(webmap_handler))
        .route("/overlay", get(overlay_handler))
        .route("/overlay/image", get_service(image))
        .route("/catchpits", get(catchpits_handler))
        .route("/catchpits/{id}/toggle", post(toggle_handler))
        .route("/markers", get(markers_handler))
        .route("/timeline", get(timeline_handler).post(add_point))
        .route("/timeline/{index}", put(edit_point).delete(remove_point))
        .route("/timeline/{index}/drag", post(drag_point))
        .route("/timeline/chart", get(chart_handler))
        .route("/timeline.csv", get(timeline_csv_handler))
        .route("/simulation", get(simulation_handler));

    if let Some(folder) = &state.config.unity_folder {
        app = app.nest_service("/unity", ServeDir::new(folder));
    }

    app.with_state(state)
}

/// Read, convert and publish the catchpits. Returns whether the overlay is
/// now ready.
pub async fn load_catchpits(state: Arc<AppState>, reader: Arc<dyn CatchpitReader>) -> bool {
    let source = reader.describe();
    let collection = match reader.load().await {
        Ok(collection) => collection,
        Err(e) => {
            error!(source = %source, error = %e, "error fetching catchpits data");
            return false;
        }
    };

    let image = state.config.image_size();
    let overlay = match convert_and_bound(&collection, image, state.config.source_crs) {
        Ok(overlay) => overlay,
        Err(e) => {
            error!(source = %source, error = %e, "error converting catchpits data");
            return false;
        }
    };

    info!(
        source = %source,
        catchpits = overlay.catchpits.len(),
        blocked = overlay.blocked_count(),
        "catchpits loaded"
    );
    print_catchpit_summary(&overlay, image);

    if !state.overlay.write().await.complete(overlay) {
        warn!("overlay was already computed, ignoring reload");
    }
    true
}
