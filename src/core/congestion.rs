use crate::core::proximity::ProximityIndex;
use crate::core::registry::PortRegistry;
use crate::domain::model::{
    CongestionRow, DatasetOverview, NavStatus, PortTotal, VesselRecord, VesselStatus,
};
use std::collections::{BTreeMap, HashSet};

/// Vessel counts per (port, status) within a radius.
///
/// Tallies from disjoint vessel partitions can be merged by addition; merging
/// in any order gives the same rows as one pass over the whole dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CongestionTally {
    // key: (registry index, status)
    counts: BTreeMap<(usize, VesselStatus), usize>,
}

impl CongestionTally {
    pub fn from_vessels(vessels: &[VesselRecord], registry: &PortRegistry, radius_km: f64) -> Self {
        let mut tally = Self::default();
        if vessels.is_empty() {
            return tally;
        }

        let index = ProximityIndex::new(vessels);
        for (port_idx, port) in registry.ports().iter().enumerate() {
            // 每個港口各算一次距離，不一次展開所有港口
            for vessel in index.within_radius(port, radius_km) {
                *tally.counts.entry((port_idx, vessel.status)).or_insert(0) += 1;
            }
        }

        tally
    }

    pub fn merge(mut self, other: CongestionTally) -> Self {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of in-range vessels counted for one port.
    pub fn port_total(&self, port_idx: usize) -> usize {
        let first = (port_idx, VesselStatus::Code(NavStatus::UnderwayUsingEngine));
        let last = (port_idx, VesselStatus::Unknown);
        self.counts.range(first..=last).map(|(_, count)| count).sum()
    }

    /// Rows in registry order, then status ascending with `Unknown` last.
    pub fn into_rows(self, registry: &PortRegistry) -> Vec<CongestionRow> {
        let ports = registry.ports();
        self.counts
            .into_iter()
            .filter_map(|((port_idx, status), count)| {
                let port = ports.get(port_idx)?;
                Some(CongestionRow {
                    port: port.name.clone(),
                    vessel_status: status,
                    count,
                    lat: port.lat,
                    lon: port.lon,
                })
            })
            .collect()
    }
}

/// Per-(port, status) congestion rows. Ports with no vessel in range produce no rows.
pub fn aggregate(
    vessels: &[VesselRecord],
    registry: &PortRegistry,
    radius_km: f64,
) -> Vec<CongestionRow> {
    CongestionTally::from_vessels(vessels, registry, radius_km).into_rows(registry)
}

/// Aggregates each partition separately and merges the counts.
pub fn aggregate_partitioned<'a>(
    partitions: impl IntoIterator<Item = &'a [VesselRecord]>,
    registry: &PortRegistry,
    radius_km: f64,
) -> Vec<CongestionRow> {
    partitions
        .into_iter()
        .map(|part| CongestionTally::from_vessels(part, registry, radius_km))
        .fold(CongestionTally::default(), CongestionTally::merge)
        .into_rows(registry)
}

/// Total in-range vessels for every port, zero included.
pub fn port_totals(
    vessels: &[VesselRecord],
    registry: &PortRegistry,
    radius_km: f64,
) -> Vec<PortTotal> {
    let index = ProximityIndex::new(vessels);
    registry
        .ports()
        .iter()
        .map(|port| PortTotal {
            port: port.name.clone(),
            vessel_count: index.indices_within(port, radius_km).len(),
            lat: port.lat,
            lon: port.lon,
        })
        .collect()
}

impl DatasetOverview {
    pub fn from_records(vessels: &[VesselRecord], radius_km: f64) -> Self {
        let unique_vessels: HashSet<&str> = vessels.iter().map(|v| v.imo_number.as_str()).collect();
        let statuses: HashSet<VesselStatus> = vessels.iter().map(|v| v.status).collect();

        Self {
            total_records: vessels.len(),
            unique_vessels: unique_vessels.len(),
            active_status_types: statuses.len(),
            radius_km,
        }
    }
}
