pub mod config;
pub mod endpoints;
pub mod geometry;
pub mod models;
pub mod overlay;
pub mod reader;
pub mod simulation;
pub mod timeline;
pub mod traits;
pub mod utils;

pub use config::Config;
pub use endpoints::server::FloodServer;
