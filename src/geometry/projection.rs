use std::f64::consts::PI;

/// WebMercator constants
pub const R_MAJOR: f64 = 6378137.0;
pub const MAX_LAT: f64 = 85.05112877980659; // Max bounds for Web Mercator

/// from longitude, latitude (degrees) → Web Mercator (x, y in meters)
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    // clamp latitude into Mercator’s valid range
    let clamped_lat = lat.clamp(-MAX_LAT, MAX_LAT);

    let x = lon * R_MAJOR * PI / 180.0;
    let lat_rad = clamped_lat * PI / 180.0;
    let y = R_MAJOR * ((PI / 4.0 + lat_rad / 2.0).tan().ln());
    (x, y)
}

/// from Web Mercator (x, y in meters) → longitude, latitude (degrees)
pub fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = x / (R_MAJOR * PI / 180.0);
    let lat_rad = 2.0 * ((y / R_MAJOR).exp().atan()) - PI / 2.0;
    let lat = lat_rad * 180.0 / PI;
    (lon, lat)
}

/// Unproject a coordinate in `crs_code` to longitude, latitude (degrees).
///
/// 3857 and 4326 are handled inline, anything else goes through PROJ.
pub fn project_to_geographic(x: f64, y: f64, crs_code: i32) -> anyhow::Result<(f64, f64)> {
    match crs_code {
        3857 => Ok(mercator_to_lon_lat(x, y)),
        4326 => Ok((x, y)),
        _ => {
            let proj = proj::Proj::new_known_crs(
                format!("EPSG:{}", crs_code).as_str(),
                "EPSG:4326",
                None,
            )?;
            proj.convert((x, y)).map_err(anyhow::Error::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proj::Proj;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-6;
    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_random_mercator_to_lon_lat_vs_proj() {
        let proj_geo = Proj::new_known_crs("EPSG:3857", "EPSG:4326", None).unwrap();
        let mut rng = StdRng::seed_from_u64(24);
        let bound = 20037508.342789244;

        for _ in 0..1_000 {
            let x = rng.random_range(-bound..bound);
            let y = rng.random_range(-bound..bound);
            let (lon1, lat1) = mercator_to_lon_lat(x, y);
            let (lon2, lat2) = proj_geo.convert((x, y)).unwrap();
            assert!(approx_eq(lon1, lon2), "lon mismatch at x={}, y={}", x, y);
            assert!(approx_eq(lat1, lat2), "lat mismatch at x={}, y={}", x, y);
        }
    }

    #[test]
    fn test_lon_lat_to_mercator_clamps_lat_above_max() {
        let (x1, y1) = lon_lat_to_mercator(10.0, 90.0);
        let (x2, y2) = lon_lat_to_mercator(10.0, MAX_LAT);
        assert!(approx_eq(x1, x2));
        assert!(approx_eq(y1, y2));
    }

    #[test]
    fn test_mercator_round_trip_near_site() {
        // Around the Auckland site the overlay was built for
        let (x, y) = lon_lat_to_mercator(174.754, -36.751697);
        let (lon, lat) = mercator_to_lon_lat(x, y);
        assert!(approx_eq(lon, 174.754));
        assert!(approx_eq(lat, -36.751697));
    }

    #[test]
    fn test_origin_unprojects_to_null_island() {
        let (lon, lat) = mercator_to_lon_lat(0.0, 0.0);
        assert!(approx_eq(lon, 0.0));
        assert!(approx_eq(lat, 0.0));
    }

    #[test]
    fn test_project_to_geographic_fast_paths() {
        let (lon, lat) = project_to_geographic(1000.0, 2000.0, 3857).unwrap();
        let (elon, elat) = mercator_to_lon_lat(1000.0, 2000.0);
        assert!(approx_eq(lon, elon));
        assert!(approx_eq(lat, elat));

        let (lon, lat) = project_to_geographic(174.7, -36.7, 4326).unwrap();
        assert!(approx_eq(lon, 174.7));
        assert!(approx_eq(lat, -36.7));
    }

    #[test]
    fn test_project_to_geographic_via_proj_for_nztm() {
        // NZTM2000 false origin sits near 173E, and Auckland lies north of Wellington
        let (lon, lat) = project_to_geographic(1_757_000.0, 5_927_000.0, 2193).unwrap();
        assert!((174.0..176.0).contains(&lon), "lon={}", lon);
        assert!((-38.0..-36.0).contains(&lat), "lat={}", lat);
    }
}
