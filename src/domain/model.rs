use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// AIS navigational status codes (ITU-R M.1371).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NavStatus {
    UnderwayUsingEngine = 0,
    AtAnchor = 1,
    NotUnderCommand = 2,
    RestrictedManeuverability = 3,
    ConstrainedByDraft = 4,
    Moored = 5,
    Aground = 6,
    EngagedInFishing = 7,
    UnderSail = 8,
    Reserved9 = 9,
    Reserved10 = 10,
    Reserved11 = 11,
    Reserved12 = 12,
    Reserved13 = 13,
    AisSart = 14,
    Undefined = 15,
}

impl NavStatus {
    pub const ALL: [NavStatus; 16] = [
        NavStatus::UnderwayUsingEngine,
        NavStatus::AtAnchor,
        NavStatus::NotUnderCommand,
        NavStatus::RestrictedManeuverability,
        NavStatus::ConstrainedByDraft,
        NavStatus::Moored,
        NavStatus::Aground,
        NavStatus::EngagedInFishing,
        NavStatus::UnderSail,
        NavStatus::Reserved9,
        NavStatus::Reserved10,
        NavStatus::Reserved11,
        NavStatus::Reserved12,
        NavStatus::Reserved13,
        NavStatus::AisSart,
        NavStatus::Undefined,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            NavStatus::UnderwayUsingEngine => "Underway using engine",
            NavStatus::AtAnchor => "At anchor",
            NavStatus::NotUnderCommand => "Not under command",
            NavStatus::RestrictedManeuverability => "Restricted maneuverability",
            NavStatus::ConstrainedByDraft => "Constrained by draft",
            NavStatus::Moored => "Moored",
            NavStatus::Aground => "Aground",
            NavStatus::EngagedInFishing => "Engaged in fishing",
            NavStatus::UnderSail => "Under sail",
            NavStatus::Reserved9
            | NavStatus::Reserved10
            | NavStatus::Reserved11
            | NavStatus::Reserved12
            | NavStatus::Reserved13 => "Reserved for future use",
            NavStatus::AisSart => "AIS-SART / MOB / EPIRB",
            NavStatus::Undefined => "Unknown or undefined",
        }
    }
}

impl TryFrom<u8> for NavStatus {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        NavStatus::ALL.get(code as usize).copied().ok_or(code)
    }
}

/// Status of a position report. `Unknown` is its own group, never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VesselStatus {
    Code(NavStatus),
    Unknown,
}

impl VesselStatus {
    pub fn code(self) -> Option<u8> {
        match self {
            VesselStatus::Code(status) => Some(status.code()),
            VesselStatus::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VesselStatus::Code(status) => status.label(),
            VesselStatus::Unknown => "Not reported",
        }
    }
}

impl From<NavStatus> for VesselStatus {
    fn from(status: NavStatus) -> Self {
        VesselStatus::Code(status)
    }
}

impl fmt::Display for VesselStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VesselStatus::Code(status) => write!(f, "{}", status.code()),
            VesselStatus::Unknown => write!(f, "unknown"),
        }
    }
}

// 輸出欄位為整數或空值
impl Serialize for VesselStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.code() {
            Some(code) => serializer.serialize_some(&code),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for VesselStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<u8>::deserialize(deserializer)? {
            Some(code) => NavStatus::try_from(code).map(VesselStatus::Code).map_err(|code| {
                serde::de::Error::custom(format!("status code {} outside 0-15", code))
            }),
            None => Ok(VesselStatus::Unknown),
        }
    }
}

/// One observed AIS position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    pub imo_number: String,
    pub name: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kn: Option<f64>,
    pub status: VesselStatus,
}

/// A named reference location vessels are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Port {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionRow {
    pub port: String,
    pub vessel_status: VesselStatus,
    pub count: usize,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortTotal {
    pub port: String,
    pub vessel_count: usize,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub total_records: usize,
    pub unique_vessels: usize,
    pub active_status_types: usize,
    pub radius_km: f64,
}

/// Records that survived ingestion plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct VesselDataset {
    pub records: Vec<VesselRecord>,
    pub dropped_incomplete: usize,
    pub dropped_invalid: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CongestionReport {
    pub overview: DatasetOverview,
    pub rows: Vec<CongestionRow>,
    pub port_totals: Vec<PortTotal>,
}
