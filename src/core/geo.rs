//! Great-circle distances.

use crate::domain::model::VesselRecord;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Largest meaningful radius: half the great-circle circumference.
pub const MAX_RADIUS_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

/// Haversine distance in kilometers between two points given in degrees.
///
/// Inputs are not range-checked; NaN propagates to the result.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    haversine_radians(lat1, lon1, lat1.cos(), lat2, lon2, lat2.cos())
}

#[inline]
fn haversine_radians(lat1: f64, lon1: f64, cos_lat1: f64, lat2: f64, lon2: f64, cos_lat2: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + cos_lat1 * cos_lat2 * (dlon / 2.0).sin().powi(2);

    // 浮點誤差可能讓 a 略大於 1，NaN 保持 NaN
    let a = if a > 1.0 { 1.0 } else { a };
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Vessel positions laid out as parallel coordinate arrays, already in radians.
///
/// Built once per dataset and reused for every port, so each distance pass
/// is a tight loop over contiguous arrays.
#[derive(Debug, Clone, Default)]
pub struct CoordinateColumns {
    lat_rad: Vec<f64>,
    lon_rad: Vec<f64>,
    cos_lat: Vec<f64>,
}

impl CoordinateColumns {
    pub fn from_records(records: &[VesselRecord]) -> Self {
        Self::from_degrees(records.iter().map(|r| (r.latitude, r.longitude)))
    }

    pub fn from_degrees(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let points = points.into_iter();
        let (lower, _) = points.size_hint();
        let mut columns = Self {
            lat_rad: Vec::with_capacity(lower),
            lon_rad: Vec::with_capacity(lower),
            cos_lat: Vec::with_capacity(lower),
        };

        for (lat, lon) in points {
            let lat = lat.to_radians();
            columns.lat_rad.push(lat);
            columns.lon_rad.push(lon.to_radians());
            columns.cos_lat.push(lat.cos());
        }

        columns
    }

    pub fn len(&self) -> usize {
        self.lat_rad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat_rad.is_empty()
    }

    /// Distance in kilometers from every position to one reference point, in input order.
    pub fn distances_to(&self, lat: f64, lon: f64) -> Vec<f64> {
        let ref_lat = lat.to_radians();
        let ref_lon = lon.to_radians();
        let ref_cos = ref_lat.cos();

        self.lat_rad
            .iter()
            .zip(&self.lon_rad)
            .zip(&self.cos_lat)
            .map(|((&lat, &lon), &cos_lat)| {
                haversine_radians(lat, lon, cos_lat, ref_lat, ref_lon, ref_cos)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        for &(lat, lon) in &[(0.0, 0.0), (33.738, -118.272), (-89.9, 179.9), (90.0, -180.0)] {
            assert_eq!(haversine_km(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let distance = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111.2).abs() < 0.5, "got {}", distance);
    }

    #[test]
    fn test_symmetric() {
        let a = (40.668, -74.045);
        let b = (25.778, -80.179);
        let ab = haversine_km(a.0, a.1, b.0, b.1);
        let ba = haversine_km(b.0, b.1, a.0, a.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_los_angeles_to_new_york() {
        let distance = haversine_km(33.738, -118.272, 40.668, -74.045);
        // 約 3,940 km
        assert!(distance > 3900.0 && distance < 3980.0, "got {}", distance);
    }

    #[test]
    fn test_antipodes_do_not_exceed_half_circumference() {
        let distance = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!(distance <= MAX_RADIUS_KM + 1e-9);
        assert!((distance - MAX_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(haversine_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn test_columns_match_scalar() {
        let points = vec![(33.74, -118.27), (40.668, -74.045), (-33.86, 151.21), (0.0, 0.0)];
        let columns = CoordinateColumns::from_degrees(points.clone());
        assert_eq!(columns.len(), 4);

        let distances = columns.distances_to(29.730, -95.265);
        for ((lat, lon), distance) in points.iter().zip(distances) {
            let expected = haversine_km(*lat, *lon, 29.730, -95.265);
            assert!((distance - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_columns() {
        let columns = CoordinateColumns::from_degrees(Vec::new());
        assert!(columns.is_empty());
        assert!(columns.distances_to(0.0, 0.0).is_empty());
    }
}
