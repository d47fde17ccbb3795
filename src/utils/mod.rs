pub mod export;
pub mod raster;
pub mod status;
