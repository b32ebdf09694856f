use chrono::{TimeZone, Utc};
use port_congestion::core::congestion::aggregate_partitioned;
use port_congestion::{
    aggregate, haversine_km, port_totals, within_radius, NavStatus, PortRegistry, VesselRecord,
    VesselStatus,
};

/// Vessels scattered on a grid around every default port, statuses cycling through 0-15 and unknown.
fn fleet_around_ports() -> Vec<VesselRecord> {
    let registry = PortRegistry::default();
    let mut vessels = Vec::new();
    let mut n = 0usize;

    for port in registry.ports() {
        for i in -4i32..=4 {
            for j in -4i32..=4 {
                let status = match n % 17 {
                    16 => VesselStatus::Unknown,
                    code => VesselStatus::Code(NavStatus::try_from(code as u8).unwrap()),
                };
                vessels.push(VesselRecord {
                    imo_number: format!("{:09}", n),
                    name: None,
                    timestamp: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                    latitude: port.lat + i as f64 * 0.07,
                    longitude: port.lon + j as f64 * 0.07,
                    speed_kn: Some((n % 20) as f64),
                    status,
                });
                n += 1;
            }
        }
    }

    vessels
}

#[test]
fn test_distance_properties() {
    let points = [(0.0, 0.0), (33.738, -118.272), (-45.0, 170.0), (60.0, -179.5)];
    for &(lat1, lon1) in &points {
        assert_eq!(haversine_km(lat1, lon1, lat1, lon1), 0.0);
        for &(lat2, lon2) in &points {
            let ab = haversine_km(lat1, lon1, lat2, lon2);
            let ba = haversine_km(lat2, lon2, lat1, lon1);
            assert!(ab >= 0.0);
            assert!((ab - ba).abs() < 1e-9);
        }
    }
    assert!((haversine_km(0.0, 0.0, 0.0, 1.0) - 111.2).abs() < 0.5);
}

#[test]
fn test_count_conservation_for_every_radius() {
    let vessels = fleet_around_ports();
    let registry = PortRegistry::default();

    for radius in [0.0, 5.0, 10.0, 20.0, 35.0, 60.0, 100.0] {
        let rows = aggregate(&vessels, &registry, radius);
        for port in registry.ports() {
            let expected = within_radius(&vessels, port, radius).len();
            let counted: usize = rows
                .iter()
                .filter(|r| r.port == port.name)
                .map(|r| r.count)
                .sum();
            assert_eq!(counted, expected, "{} at {} km", port.name, radius);
        }

        let totals: usize = port_totals(&vessels, &registry, radius)
            .iter()
            .map(|t| t.vessel_count)
            .sum();
        assert_eq!(totals, rows.iter().map(|r| r.count).sum::<usize>());
    }
}

#[test]
fn test_rows_sorted_by_registry_then_status() {
    let vessels = fleet_around_ports();
    let registry = PortRegistry::default();
    let rows = aggregate(&vessels, &registry, 40.0);

    let port_position = |name: &str| registry.ports().iter().position(|p| p.name == name).unwrap();
    for pair in rows.windows(2) {
        let a = (port_position(&pair[0].port), pair[0].vessel_status);
        let b = (port_position(&pair[1].port), pair[1].vessel_status);
        assert!(a < b, "{:?} should come before {:?}", a, b);
    }
    assert!(rows.iter().any(|r| r.vessel_status == VesselStatus::Unknown));
}

#[test]
fn test_radius_monotonicity_per_port() {
    let vessels = fleet_around_ports();
    let registry = PortRegistry::default();

    for port in registry.ports() {
        let mut previous: Vec<&str> = Vec::new();
        for radius in [0.0, 8.0, 16.0, 32.0, 64.0] {
            let current: Vec<&str> = within_radius(&vessels, port, radius)
                .iter()
                .map(|v| v.imo_number.as_str())
                .collect();
            assert!(previous.iter().all(|id| current.contains(id)));
            previous = current;
        }
    }
}

#[test]
fn test_partitioned_aggregation_matches_single_pass() {
    let vessels = fleet_around_ports();
    let registry = PortRegistry::default();
    let single = aggregate(&vessels, &registry, 25.0);

    for chunk_size in [1, 7, 50, vessels.len()] {
        assert_eq!(
            aggregate_partitioned(vessels.chunks(chunk_size), &registry, 25.0),
            single
        );
    }
    assert_eq!(aggregate(&vessels, &registry, 25.0), single);
}
