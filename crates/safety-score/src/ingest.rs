//! Position ingestion: record a fix, rescore the subject and hand any
//! escalation to the alerting collaborator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{Position, SubjectId};
use crate::scoring::ScoreOutcome;
use crate::service::RiskScoringService;
use crate::source::{PositionSink, PositionSource, SourceError, ZoneSource};

/// Origin of an escalation. Only engine-raised signals flow through here; the
/// manual panic path never touches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Anomaly,
}

/// Payload handed to the alerting collaborator when a score escalates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationSignal {
    pub subject_id: SubjectId,
    pub kind: AlertKind,
    pub score: f64,
    pub reason: String,
    pub latitude: f64,
    pub longitude: f64,
    pub raised_at: DateTime<Utc>,
}

/// The one outbound hook of the pipeline. Alert creation, assignment and
/// resolution live behind it.
pub trait EscalationSink: Send + Sync {
    fn raise(&self, signal: EscalationSignal) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// What happened to one ingested position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub subject_id: SubjectId,
    pub outcome: ScoreOutcome,
    /// An escalation signal was handed to the sink and accepted.
    pub dispatched: bool,
}

impl IngestReport {
    pub fn score(&self) -> f64 {
        self.outcome.score()
    }

    pub fn escalated(&self) -> bool {
        self.outcome.escalate()
    }

    pub fn degraded(&self) -> bool {
        self.outcome.is_degraded()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("position was not recorded: {0}")]
    Append(#[source] SourceError),
}

pub struct PositionIngestor<S, Z, E> {
    store: Arc<S>,
    scoring: RiskScoringService<S, Z>,
    sink: Arc<E>,
}

impl<S, Z, E> PositionIngestor<S, Z, E>
where
    S: PositionSource + PositionSink + 'static,
    Z: ZoneSource + 'static,
    E: EscalationSink + 'static,
{
    pub fn new(store: Arc<S>, scoring: RiskScoringService<S, Z>, sink: Arc<E>) -> Self {
        Self {
            store,
            scoring,
            sink,
        }
    }

    /// Only a failed append is an error. Scoring faults degrade to the
    /// neutral default and sink faults are logged.
    pub fn record(&self, position: Position) -> Result<IngestReport, IngestError> {
        let subject_id = position.subject_id.clone();
        let (latitude, longitude) = (position.latitude, position.longitude);

        self.store.append(position).map_err(IngestError::Append)?;

        let outcome = self.scoring.compute_risk_score(&subject_id);
        let mut dispatched = false;

        if outcome.escalate() {
            let result = outcome.result();
            let signal = EscalationSignal {
                subject_id: subject_id.clone(),
                kind: AlertKind::Anomaly,
                score: result.score,
                reason: result.reason_summary(),
                latitude,
                longitude,
                raised_at: Utc::now(),
            };

            match self.sink.raise(signal) {
                Ok(()) => {
                    info!(subject = %subject_id, score = result.score, "escalation raised");
                    dispatched = true;
                }
                Err(error) => {
                    warn!(subject = %subject_id, %error, "escalation could not be dispatched");
                }
            }
        }

        Ok(IngestReport {
            subject_id,
            outcome,
            dispatched,
        })
    }
}
