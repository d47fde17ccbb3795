use crate::models::geometry::ImageSize;
use std::path::Path;
use tracing::{info, warn};

/// Compare the overlay file's real dimensions with the configured ones.
///
/// The bounds use the configured size, so a mismatch only produces a warning.
/// Returns the size read from the file, if it could be read at all.
pub fn check_overlay_image(path: &Path, expected: ImageSize) -> Option<ImageSize> {
    match image::image_dimensions(path) {
        Ok((width, height)) => {
            let actual = ImageSize { width, height };
            if actual != expected {
                warn!(
                    path = %path.display(),
                    "overlay image is {}x{} but configured as {}x{}, markers will not line up",
                    width,
                    height,
                    expected.width,
                    expected.height
                );
            } else {
                info!(path = %path.display(), "overlay image {}x{}", width, height);
            }
            Some(actual)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read overlay image");
            None
        }
    }
}
