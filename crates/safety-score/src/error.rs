use crate::config::ConfigError;
use crate::domain::{CoordinateError, ZoneError};
use crate::import::ImportError;
use crate::ingest::IngestError;
use crate::source::SourceError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ImportError),
    Ingest(IngestError),
    Store(SourceError),
    Coordinate(CoordinateError),
    Zone(ZoneError),
    Output(serde_json::Error),
    Fixture(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Ingest(err) => write!(f, "ingest error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Coordinate(err) => write!(f, "invalid position: {}", err),
            AppError::Zone(err) => write!(f, "invalid zone: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
            AppError::Fixture(detail) => write!(f, "invalid fixture: {}", detail),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Ingest(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Coordinate(err) => Some(err),
            AppError::Zone(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::Fixture(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<SourceError> for AppError {
    fn from(value: SourceError) -> Self {
        Self::Store(value)
    }
}

impl From<CoordinateError> for AppError {
    fn from(value: CoordinateError) -> Self {
        Self::Coordinate(value)
    }
}

impl From<ZoneError> for AppError {
    fn from(value: ZoneError) -> Self {
        Self::Zone(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
