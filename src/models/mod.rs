pub mod catchpit;
pub mod geometry;
pub mod timeline;
