use std::sync::Arc;

use tracing::warn;

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{ScoreInput, SubjectId};
use crate::scoring::{RiskEngine, ScoreOutcome};
use crate::source::{PositionSource, SourceError, ZoneSource};

/// Composes the position and zone collaborators with the scoring engine.
pub struct RiskScoringService<P, Z> {
    positions: Arc<P>,
    zones: Arc<Z>,
    engine: Arc<RiskEngine>,
}

impl<P, Z> Clone for RiskScoringService<P, Z> {
    fn clone(&self) -> Self {
        Self {
            positions: Arc::clone(&self.positions),
            zones: Arc::clone(&self.zones),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<P, Z> RiskScoringService<P, Z>
where
    P: PositionSource + 'static,
    Z: ZoneSource + 'static,
{
    pub fn new(positions: Arc<P>, zones: Arc<Z>, config: EngineConfig) -> Result<Self, ConfigError> {
        let engine = Arc::new(RiskEngine::new(config)?);
        Ok(Self {
            positions,
            zones,
            engine,
        })
    }

    /// Scores the subject's latest window. Collaborator faults never escape:
    /// they produce a [`ScoreOutcome::Degraded`] carrying the neutral default.
    pub fn compute_risk_score(&self, subject: &SubjectId) -> ScoreOutcome {
        match self.fetch_input(subject) {
            Ok(input) => ScoreOutcome::Scored(self.engine.score(&input)),
            Err(cause) => {
                warn!(subject = %subject, error = %cause, "risk scoring degraded to neutral default");
                self.engine.degraded(cause)
            }
        }
    }

    /// Skips the zone snapshot when the window is too short to use it.
    fn fetch_input(&self, subject: &SubjectId) -> Result<ScoreInput, SourceError> {
        let config = self.engine.config();
        let mut window = self
            .positions
            .recent_positions(subject, config.window_size)?;
        window.truncate(config.window_size);

        if window.len() < config.cold_start_threshold {
            return Ok(ScoreInput {
                subject_id: subject.clone(),
                window,
                high_risk_zones: Vec::new(),
            });
        }

        let high_risk_zones = self
            .zones
            .high_risk_zones()?
            .into_iter()
            .filter(|zone| zone.is_high_risk())
            .collect();

        Ok(ScoreInput {
            subject_id: subject.clone(),
            window,
            high_risk_zones,
        })
    }
}
