//! Fixture loaders: positions from CSV exports, zones and engine settings
//! from JSON.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{CoordinateError, Position, RiskZone, SubjectId, ZoneError};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Coordinate { row: usize, source: CoordinateError },
    Zone { index: usize, source: ZoneError },
    Config(ConfigError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read fixture: {}", err),
            ImportError::Csv(err) => write!(f, "invalid position CSV: {}", err),
            ImportError::Json(err) => write!(f, "invalid JSON fixture: {}", err),
            ImportError::Coordinate { row, source } => {
                write!(f, "position row {} rejected: {}", row, source)
            }
            ImportError::Zone { index, source } => {
                write!(f, "zone #{} rejected: {}", index, source)
            }
            ImportError::Config(err) => write!(f, "invalid engine settings: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
            ImportError::Coordinate { source, .. } => Some(source),
            ImportError::Zone { source, .. } => Some(source),
            ImportError::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for ImportError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    subject_id: String,
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
}

/// Reads `subject_id,latitude,longitude,timestamp` rows (RFC 3339
/// timestamps). Rows are returned in file order. Row numbers in errors are
/// 1-based and exclude the header.
pub fn positions_from_reader<R: Read>(reader: R) -> Result<Vec<Position>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut positions = Vec::new();

    for (index, record) in csv_reader.deserialize::<PositionRow>().enumerate() {
        let row = record?;
        let position = Position::new(
            SubjectId(row.subject_id),
            row.latitude,
            row.longitude,
            row.timestamp,
        )
        .map_err(|source| ImportError::Coordinate {
            row: index + 1,
            source,
        })?;
        positions.push(position);
    }

    Ok(positions)
}

pub fn positions_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Position>, ImportError> {
    let file = std::fs::File::open(path)?;
    positions_from_reader(file)
}

/// Reads a JSON array of zones, rejecting any with a bad radius or center.
pub fn zones_from_reader<R: Read>(reader: R) -> Result<Vec<RiskZone>, ImportError> {
    let zones: Vec<RiskZone> = serde_json::from_reader(reader)?;
    for (index, zone) in zones.iter().enumerate() {
        zone.validate()
            .map_err(|source| ImportError::Zone { index, source })?;
    }
    Ok(zones)
}

pub fn zones_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RiskZone>, ImportError> {
    let file = std::fs::File::open(path)?;
    zones_from_reader(file)
}

/// Partial JSON settings on top of the defaults, validated.
pub fn engine_config_from_reader<R: Read>(reader: R) -> Result<EngineConfig, ImportError> {
    let config: EngineConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

pub fn engine_config_from_path<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ImportError> {
    let file = std::fs::File::open(path)?;
    engine_config_from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;

    #[test]
    fn parses_trimmed_position_rows() {
        let csv = "subject_id, latitude, longitude, timestamp\n\
tourist-1, 27.1751, 78.0421, 2025-03-01T14:00:00Z\n\
tourist-1,27.1760,78.0430,2025-03-01T13:30:00+05:30\n";

        let positions = positions_from_reader(csv.as_bytes()).expect("csv parses");

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].subject_id, SubjectId::new("tourist-1"));
        assert_eq!(positions[0].latitude, 27.1751);
        assert_eq!(
            positions[1].timestamp.to_rfc3339(),
            "2025-03-01T08:00:00+00:00"
        );
    }

    #[test]
    fn rejects_out_of_range_rows_with_row_number() {
        let csv = "subject_id,latitude,longitude,timestamp\n\
tourist-1,27.0,78.0,2025-03-01T14:00:00Z\n\
tourist-1,127.0,78.0,2025-03-01T14:05:00Z\n";

        match positions_from_reader(csv.as_bytes()) {
            Err(ImportError::Coordinate { row, source }) => {
                assert_eq!(row, 2);
                assert_eq!(source, CoordinateError::LatitudeOutOfRange(127.0));
            }
            other => panic!("expected coordinate error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_is_a_csv_error() {
        let csv = "subject_id,latitude,longitude,timestamp\ntourist-1,27.0,78.0,yesterday\n";
        assert!(matches!(
            positions_from_reader(csv.as_bytes()),
            Err(ImportError::Csv(_))
        ));
    }

    #[test]
    fn parses_zone_catalogue() {
        let json = r#"[
            { "name": "Old Harbor", "risk_level": "high", "center_latitude": 27.17,
              "center_longitude": 78.04, "radius_km": 1.5, "description": "Poorly lit at night" },
            { "name": "Bazaar", "risk_level": "medium", "center_latitude": 27.18,
              "center_longitude": 78.02, "radius_km": 0.8 }
        ]"#;

        let zones = zones_from_reader(json.as_bytes()).expect("zones parse");

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].risk_level, RiskLevel::High);
        assert_eq!(zones[0].description.as_deref(), Some("Poorly lit at night"));
        assert!(zones[1].description.is_none());
    }

    #[test]
    fn rejects_zero_radius_zone() {
        let json = r#"[{ "name": "Pier", "risk_level": "high", "center_latitude": 1.0,
                         "center_longitude": 1.0, "radius_km": 0 }]"#;

        match zones_from_reader(json.as_bytes()) {
            Err(ImportError::Zone { index, source }) => {
                assert_eq!(index, 0);
                assert!(matches!(source, ZoneError::InvalidRadius { .. }));
            }
            other => panic!("expected zone error, got {other:?}"),
        }
    }

    #[test]
    fn engine_settings_are_validated() {
        let ok = engine_config_from_reader(r#"{ "zone_penalty": 25 }"#.as_bytes())
            .expect("partial settings load");
        assert_eq!(ok.zone_penalty, 25.0);

        assert!(matches!(
            engine_config_from_reader(r#"{ "night_band_start_hour": 30 }"#.as_bytes()),
            Err(ImportError::Config(ConfigError::InvalidHour { .. }))
        ));
    }
}
