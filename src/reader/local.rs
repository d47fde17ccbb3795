use super::LoadError;
use crate::models::catchpit::FeatureCollection;
use crate::traits::CatchpitReader;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads the catchpit FeatureCollection from a GeoJSON file on disk.
pub struct LocalCatchpitReader {
    path: PathBuf,
}

impl LocalCatchpitReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatchpitReader for LocalCatchpitReader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<FeatureCollection, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
