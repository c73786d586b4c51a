//! Deterministic rule engine turning a window of positions and a zone
//! snapshot into a bounded safety score.

mod aggregate;
mod erratic;
mod escalation;
mod movement;
mod proximity;
mod temporal;

#[cfg(test)]
pub(crate) mod tests;

pub use aggregate::aggregate;
pub use erratic::{erratic_ratio, erratic_score, RapidMovement, MIN_ERRATIC_WINDOW};
pub use escalation::{explain, EscalationGate, COLD_START_REASON};
pub use movement::{average_segment_km, movement_score, MIN_MOVEMENT_WINDOW};
pub use proximity::containing_high_risk_zone;
pub use temporal::{night_ratio, temporal_score, NightBand};

use chrono::FixedOffset;
use serde::Serialize;
use tracing::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{ComponentScores, ScoreBasis, ScoreInput, ScoreResult};
use crate::source::SourceError;

/// Stateless evaluator applying an [`EngineConfig`] to a [`ScoreInput`].
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: EngineConfig,
    night_band: NightBand,
    rapid: RapidMovement,
    gate: EscalationGate,
}

impl RiskEngine {
    /// Refuses to build from an invalid configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let offset = FixedOffset::east_opt(config.utc_offset_minutes * 60)
            .ok_or(ConfigError::InvalidOffset(config.utc_offset_minutes))?;

        let night_band = NightBand {
            start_hour: config.night_band_start_hour,
            end_hour: config.night_band_end_hour,
            offset,
        };
        let rapid = RapidMovement {
            distance_km: config.rapid_distance_km,
            interval_minutes: config.rapid_interval_minutes,
        };
        let gate = EscalationGate::new(config.escalation_threshold);

        Ok(Self {
            config,
            night_band,
            rapid,
            gate,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs every rule over the input window, truncated to `window_size`.
    pub fn score(&self, input: &ScoreInput) -> ScoreResult {
        let len = input.window.len().min(self.config.window_size);
        let window = &input.window[..len];

        if len < self.config.cold_start_threshold {
            return self.cold_start(len);
        }

        let zone = input
            .latest()
            .and_then(|latest| containing_high_risk_zone(latest, &input.high_risk_zones));

        let component_scores = ComponentScores {
            movement: movement_score(window),
            temporal: temporal_score(window, &self.night_band),
            erratic: erratic_score(window, &self.rapid),
            zone_proximity_penalty_applied: zone.is_some(),
        };

        let score = aggregate(
            &component_scores,
            &self.config.weights,
            self.config.zone_penalty,
            self.config.cold_start_score,
        );
        let escalate = self.gate.should_escalate(score);
        let reasons = explain(&component_scores, zone);

        debug!(
            subject = %input.subject_id,
            window = len,
            movement = component_scores.movement,
            temporal = component_scores.temporal,
            erratic = component_scores.erratic,
            zone = zone.map(|zone| zone.name.as_str()),
            score,
            escalate,
            "scored position window"
        );

        ScoreResult {
            score,
            escalate,
            basis: ScoreBasis::Full,
            window_len: len,
            component_scores,
            reasons,
        }
    }

    /// Neutral prior for subjects without enough history. Never escalates.
    pub fn cold_start(&self, window_len: usize) -> ScoreResult {
        ScoreResult {
            score: self.config.cold_start_score,
            escalate: false,
            basis: ScoreBasis::ColdStart,
            window_len,
            component_scores: ComponentScores::neutral(),
            reasons: vec![COLD_START_REASON.to_string()],
        }
    }

    /// Neutral outcome for a pass whose inputs could not be fetched.
    pub fn degraded(&self, cause: SourceError) -> ScoreOutcome {
        ScoreOutcome::Degraded {
            result: self.cold_start(0),
            cause,
        }
    }
}

/// Result of a scoring request: either a real score or the neutral default
/// together with the collaborator fault that forced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(ScoreResult),
    Degraded {
        result: ScoreResult,
        #[serde(serialize_with = "serialize_cause")]
        cause: SourceError,
    },
}

impl ScoreOutcome {
    pub fn result(&self) -> &ScoreResult {
        match self {
            ScoreOutcome::Scored(result) => result,
            ScoreOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn cause(&self) -> Option<&SourceError> {
        match self {
            ScoreOutcome::Scored(_) => None,
            ScoreOutcome::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScoreOutcome::Degraded { .. })
    }

    pub fn score(&self) -> f64 {
        self.result().score
    }

    pub fn escalate(&self) -> bool {
        self.result().escalate
    }
}

fn serialize_cause<S>(cause: &SourceError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(cause)
}
