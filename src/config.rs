use crate::models::geometry::{ImageSize, LatLng, Point};
use crate::simulation::ViewerKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "floodview",
    version,
    about = "Serve the catchpit overlay, rainfall timeline and simulation viewer"
)]
pub struct Config {
    /// Folder holding the catchpit GeoJSON and the overlay image
    #[arg(long, default_value = "data")]
    pub data_folder: PathBuf,

    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    #[arg(long, default_value = "catchpits.geojson")]
    pub catchpits_file: String,

    #[arg(long, default_value = "new_area_Data.png")]
    pub overlay_image: String,

    /// Pixel width of the overlay image, used for its aspect ratio
    #[arg(long, default_value_t = 3350)]
    pub image_width: u32,

    #[arg(long, default_value_t = 3000)]
    pub image_height: u32,

    /// EPSG code of the catchpit coordinates
    #[arg(long, default_value_t = 3857)]
    pub source_crs: i32,

    /// Pixel shift applied to every marker, x grows east
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub x_adjust: f64,

    /// Pixel shift applied to every marker, y grows south
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub y_adjust: f64,

    #[arg(long, default_value_t = -36.751697, allow_hyphen_values = true)]
    pub center_lat: f64,

    #[arg(long, default_value_t = 174.754, allow_hyphen_values = true)]
    pub center_lng: f64,

    #[arg(long, default_value_t = 15)]
    pub zoom: u8,

    #[arg(long, default_value_t = 0.8)]
    pub overlay_opacity: f64,

    #[arg(long, value_enum, default_value_t = ViewerKind::Iframe)]
    pub viewer: ViewerKind,

    /// Simulation server shown by the iframe viewer
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    pub viewer_url: String,

    /// URL prefix of the Unity WebGL build
    #[arg(long, default_value = "/unity")]
    pub unity_build_url: String,

    /// File stem of the Unity build artefacts
    #[arg(long, default_value = "Build")]
    pub unity_build_name: String,

    /// Local Unity build folder, served under /unity when set
    #[arg(long)]
    pub unity_folder: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["floodview"])
    }
}

impl Config {
    pub fn catchpits_path(&self) -> PathBuf {
        self.data_folder.join(&self.catchpits_file)
    }

    pub fn overlay_image_path(&self) -> PathBuf {
        self.data_folder.join(&self.overlay_image)
    }

    pub fn image_size(&self) -> ImageSize {
        ImageSize {
            width: self.image_width,
            height: self.image_height,
        }
    }

    pub fn marker_offset(&self) -> Point {
        Point::new(self.x_adjust, self.y_adjust)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_lat, self.center_lng)
    }
}
