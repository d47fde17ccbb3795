use crate::models::catchpit::FeatureId;
use std::path::PathBuf;

pub mod local;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feature collection has no features")]
    Empty,
    #[error("feature {index} has no geometry")]
    MissingGeometry { index: usize },
    #[error("feature {index} is a {kind}, only Point is supported")]
    UnsupportedGeometry { index: usize, kind: String },
    #[error("feature {index} does not have a finite x/y coordinate")]
    BadCoordinate { index: usize },
    #[error("feature {index} could not be projected: {message}")]
    Projection { index: usize, message: String },
    #[error("catchpit id '{0}' appears more than once")]
    DuplicateId(FeatureId),
    #[error("overlay image size {0}x{1} is not usable")]
    InvalidImageSize(u32, u32),
}
