use crate::models::catchpit::FeatureCollection;
use crate::reader::LoadError;
use async_trait::async_trait;

#[async_trait]
pub trait CatchpitReader: Send + Sync {
    /// Human readable origin of the data, for logs
    fn describe(&self) -> String;
    async fn load(&self) -> Result<FeatureCollection, LoadError>;
}
