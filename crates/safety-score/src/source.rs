use crate::domain::{Position, RiskZone, SubjectId};

/// Read side of the position store.
pub trait PositionSource: Send + Sync {
    /// At most `limit` positions for the subject, newest first.
    fn recent_positions(
        &self,
        subject: &SubjectId,
        limit: usize,
    ) -> Result<Vec<Position>, SourceError>;
}

/// Write side of the position store, used by the ingestion pipeline.
pub trait PositionSink: Send + Sync {
    fn append(&self, position: Position) -> Result<(), SourceError>;
}

/// Zone catalogue. Implementations should return only high-risk zones, but
/// the engine filters again.
pub trait ZoneSource: Send + Sync {
    fn high_risk_zones(&self) -> Result<Vec<RiskZone>, SourceError>;
}

/// Collaborator failure while reading or writing store data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
