use crate::core::geo::CoordinateColumns;
use crate::domain::model::{Port, VesselRecord};

/// Vessels whose great-circle distance to `port` is at most `radius_km`, in input order.
pub fn within_radius<'a>(
    vessels: &'a [VesselRecord],
    port: &Port,
    radius_km: f64,
) -> Vec<&'a VesselRecord> {
    ProximityIndex::new(vessels).within_radius(port, radius_km)
}

/// Borrowed vessel snapshot with its coordinate columns, shared across ports.
pub struct ProximityIndex<'a> {
    vessels: &'a [VesselRecord],
    columns: CoordinateColumns,
}

impl<'a> ProximityIndex<'a> {
    pub fn new(vessels: &'a [VesselRecord]) -> Self {
        Self {
            vessels,
            columns: CoordinateColumns::from_records(vessels),
        }
    }

    /// Indices of in-range vessels. The boundary is inclusive; NaN distances never match.
    pub fn indices_within(&self, port: &Port, radius_km: f64) -> Vec<usize> {
        self.columns
            .distances_to(port.lat, port.lon)
            .into_iter()
            .enumerate()
            .filter(|(_, distance)| *distance <= radius_km)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn within_radius(&self, port: &Port, radius_km: f64) -> Vec<&'a VesselRecord> {
        self.indices_within(port, radius_km)
            .into_iter()
            .map(|i| &self.vessels[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::haversine_km;
    use crate::domain::model::{NavStatus, VesselStatus};
    use chrono::{TimeZone, Utc};

    fn vessel(id: &str, lat: f64, lon: f64) -> VesselRecord {
        VesselRecord {
            imo_number: id.to_string(),
            name: None,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            latitude: lat,
            longitude: lon,
            speed_kn: Some(0.0),
            status: VesselStatus::Code(NavStatus::Moored),
        }
    }

    fn los_angeles() -> Port {
        Port::new("Port of Los Angeles", 33.738, -118.272)
    }

    #[test]
    fn test_empty_input() {
        assert!(within_radius(&[], &los_angeles(), 20.0).is_empty());
    }

    #[test]
    fn test_preserves_order() {
        let vessels = vec![
            vessel("c", 33.74, -118.27),
            vessel("far", 40.668, -74.045),
            vessel("a", 33.738, -118.272),
            vessel("b", 33.80, -118.30),
        ];
        let ids: Vec<&str> = within_radius(&vessels, &los_angeles(), 20.0)
            .iter()
            .map(|v| v.imo_number.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let port = los_angeles();
        let vessels = vec![vessel("edge", 33.9, -118.272)];
        let exact = haversine_km(33.9, -118.272, port.lat, port.lon);

        assert_eq!(within_radius(&vessels, &port, exact).len(), 1);
        assert!(within_radius(&vessels, &port, exact - 1e-6).is_empty());
    }

    #[test]
    fn test_zero_radius_matches_only_exact_position() {
        let vessels = vec![vessel("on-port", 33.738, -118.272), vessel("near", 33.74, -118.27)];
        let matched = within_radius(&vessels, &los_angeles(), 0.0);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].imo_number, "on-port");
    }

    #[test]
    fn test_radius_monotonicity() {
        let vessels: Vec<VesselRecord> = (0..40)
            .map(|i| vessel(&i.to_string(), 33.738 + i as f64 * 0.05, -118.272 + i as f64 * 0.03))
            .collect();
        let index = ProximityIndex::new(&vessels);
        let port = los_angeles();

        let radii = [0.0, 5.0, 20.0, 50.0, 100.0, 500.0];
        for pair in radii.windows(2) {
            let small = index.indices_within(&port, pair[0]);
            let large = index.indices_within(&port, pair[1]);
            assert!(small.iter().all(|i| large.contains(i)));
            assert!(small.len() <= large.len());
        }
    }

    #[test]
    fn test_nan_coordinates_never_match() {
        let vessels = vec![vessel("nan", f64::NAN, -118.272)];
        assert!(within_radius(&vessels, &los_angeles(), 20_000.0).is_empty());
    }
}
