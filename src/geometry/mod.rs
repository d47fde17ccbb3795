pub mod projection;
pub mod view;

pub use view::{MapView, ViewTransform};
