use crate::domain::model::{NavStatus, VesselDataset, VesselRecord, VesselStatus};
use crate::domain::ports::InvalidRecordPolicy;
use crate::utils::error::{CongestionError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// AIS feed headers and the canonical column they are renamed to.
pub const COLUMN_ALIASES: [(&str, &str); 7] = [
    ("MMSI", "imo_number"),
    ("BaseDateTime", "timestamp"),
    ("LAT", "latitude"),
    ("LON", "longitude"),
    ("SOG", "speed_kn"),
    ("VesselName", "name"),
    ("Status", "status"),
];

pub const REQUIRED_COLUMNS: [&str; 5] = ["imo_number", "timestamp", "latitude", "longitude", "status"];

const MISSING_MARKERS: [&str; 8] = ["", "nan", "na", "n/a", "null", "none", "nat", "-"];

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub max_rows: Option<usize>,
    pub policy: InvalidRecordPolicy,
}

#[derive(Debug)]
struct ColumnMap {
    imo_number: usize,
    timestamp: usize,
    latitude: usize,
    longitude: usize,
    status: usize,
    speed_kn: Option<usize>,
    name: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let canonical: Vec<&str> = headers.iter().map(canonical_column).collect();
        let find = |column: &str| canonical.iter().position(|c| *c == column);
        let require = |column: &str| {
            find(column).ok_or_else(|| CongestionError::MissingColumn {
                column: column.to_string(),
            })
        };

        Ok(Self {
            imo_number: require(REQUIRED_COLUMNS[0])?,
            timestamp: require(REQUIRED_COLUMNS[1])?,
            latitude: require(REQUIRED_COLUMNS[2])?,
            longitude: require(REQUIRED_COLUMNS[3])?,
            status: require(REQUIRED_COLUMNS[4])?,
            speed_kn: find("speed_kn"),
            name: find("name"),
        })
    }
}

enum RowOutcome {
    Record(VesselRecord),
    Incomplete,
    Invalid(CongestionError),
}

/// Maps an AIS feed header to its canonical name; canonical names pass through.
pub fn canonical_column(header: &str) -> &str {
    let header = header.trim();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(header)
}

/// Parses a vessel CSV snapshot.
///
/// Rows missing latitude, longitude or timestamp (or with an unreadable
/// timestamp) are dropped and counted. Present-but-unusable coordinates,
/// status or speed are handled according to `options.policy`.
pub fn parse_vessels(data: &[u8], options: &IngestOptions) -> Result<VesselDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns = ColumnMap::from_headers(reader.headers()?)?;
    tracing::debug!("Resolved vessel columns: {:?}", columns);

    let mut dataset = VesselDataset::default();
    let limit = options.max_rows.unwrap_or(usize::MAX);

    for row in reader.records().take(limit) {
        let row = row?;
        match parse_row(&row, &columns) {
            RowOutcome::Record(record) => dataset.records.push(record),
            RowOutcome::Incomplete => dataset.dropped_incomplete += 1,
            RowOutcome::Invalid(err) => match options.policy {
                InvalidRecordPolicy::Fail => return Err(err),
                InvalidRecordPolicy::Drop => {
                    tracing::warn!("⚠️ Dropping row: {}", err);
                    dataset.dropped_invalid += 1;
                }
            },
        }
    }

    tracing::debug!(
        "Parsed {} vessel records ({} incomplete, {} invalid dropped)",
        dataset.records.len(),
        dataset.dropped_incomplete,
        dataset.dropped_invalid
    );

    Ok(dataset)
}

fn parse_row(row: &csv::StringRecord, columns: &ColumnMap) -> RowOutcome {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let cell = |idx: usize| row.get(idx).unwrap_or("");
    let optional_cell = |idx: Option<usize>| idx.map(cell).filter(|v| !is_missing(v));

    let (lat_raw, lon_raw, ts_raw) = (
        cell(columns.latitude),
        cell(columns.longitude),
        cell(columns.timestamp),
    );
    if is_missing(lat_raw) || is_missing(lon_raw) || is_missing(ts_raw) {
        return RowOutcome::Incomplete;
    }
    let Some(timestamp) = parse_timestamp(ts_raw) else {
        return RowOutcome::Incomplete;
    };

    let invalid = |field: &str, value: &str, reason: &str| {
        RowOutcome::Invalid(CongestionError::InvalidRecord {
            line,
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    let latitude = match parse_coordinate(lat_raw, 90.0) {
        Ok(v) => v,
        Err(reason) => return invalid("latitude", lat_raw, reason),
    };
    let longitude = match parse_coordinate(lon_raw, 180.0) {
        Ok(v) => v,
        Err(reason) => return invalid("longitude", lon_raw, reason),
    };

    let status_raw = cell(columns.status);
    let status = match parse_status(status_raw) {
        Ok(status) => status,
        Err(reason) => return invalid("status", status_raw, reason),
    };

    let speed_kn = match optional_cell(columns.speed_kn) {
        None => None,
        Some(raw) => match raw.parse::<f64>() {
            Ok(speed) if speed.is_finite() && speed >= 0.0 => Some(speed),
            Ok(_) => return invalid("speed_kn", raw, "speed must be a non-negative number"),
            Err(_) => return invalid("speed_kn", raw, "not a number"),
        },
    };

    RowOutcome::Record(VesselRecord {
        imo_number: cell(columns.imo_number).to_string(),
        name: optional_cell(columns.name).map(str::to_string),
        timestamp,
        latitude,
        longitude,
        speed_kn,
        status,
    })
}

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

fn parse_coordinate(raw: &str, limit: f64) -> std::result::Result<f64, &'static str> {
    let value: f64 = raw.parse().map_err(|_| "not a number")?;
    if !value.is_finite() {
        return Err("not a finite number");
    }
    if value.abs() > limit {
        return Err("outside valid range");
    }
    Ok(value)
}

/// 狀態欄位可能是 "5" 或 "5.0"
fn parse_status(raw: &str) -> std::result::Result<VesselStatus, &'static str> {
    if is_missing(raw) {
        return Ok(VesselStatus::Unknown);
    }

    let code = match raw.parse::<i64>() {
        Ok(code) => code,
        Err(_) => {
            let value: f64 = raw.parse().map_err(|_| "not an integer status code")?;
            if value.fract() != 0.0 || !value.is_finite() {
                return Err("not an integer status code");
            }
            value as i64
        }
    };

    u8::try_from(code)
        .ok()
        .and_then(|code| NavStatus::try_from(code).ok())
        .map(VesselStatus::Code)
        .ok_or("status code outside 0-15")
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
