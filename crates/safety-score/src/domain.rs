use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::distance_km;

/// Identifier of a tracked subject, as issued by the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single recorded fix for a subject. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub subject_id: SubjectId,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// Validating constructor used at ingestion time.
    pub fn new(
        subject_id: SubjectId,
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, CoordinateError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            subject_id,
            latitude,
            longitude,
            timestamp,
        })
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Rejected coordinates at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoordinateError> {
    // NaN fails both range checks.
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CoordinateError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CoordinateError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Administrator-defined circular region with an assigned risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskZone {
    pub name: String,
    pub risk_level: RiskLevel,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub radius_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RiskZone {
    pub fn new(
        name: impl Into<String>,
        risk_level: RiskLevel,
        center_latitude: f64,
        center_longitude: f64,
        radius_km: f64,
    ) -> Result<Self, ZoneError> {
        let zone = Self {
            name: name.into(),
            risk_level,
            center_latitude,
            center_longitude,
            radius_km,
            description: None,
        };
        zone.validate()?;
        Ok(zone)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks a zone that arrived through deserialization rather than `new`.
    pub fn validate(&self) -> Result<(), ZoneError> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(ZoneError::InvalidRadius {
                zone: self.name.clone(),
                radius_km: self.radius_km,
            });
        }
        validate_coordinates(self.center_latitude, self.center_longitude).map_err(|source| {
            ZoneError::InvalidCenter {
                zone: self.name.clone(),
                source,
            }
        })
    }

    /// Strictly inside the radius; a point on the boundary is outside.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        distance_km(
            latitude,
            longitude,
            self.center_latitude,
            self.center_longitude,
        ) < self.radius_km
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level == RiskLevel::High
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    #[error("zone '{zone}' radius must be a positive number of km, got {radius_km}")]
    InvalidRadius { zone: String, radius_km: f64 },
    #[error("zone '{zone}' has an invalid center: {source}")]
    InvalidCenter {
        zone: String,
        #[source]
        source: CoordinateError,
    },
}

/// Everything one scoring pass looks at. Assembled per call, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInput {
    pub subject_id: SubjectId,
    /// Newest first.
    pub window: Vec<Position>,
    pub high_risk_zones: Vec<RiskZone>,
}

impl ScoreInput {
    pub fn latest(&self) -> Option<&Position> {
        self.window.first()
    }
}

/// Whether a score came from the full rule set or the cold-start prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    ColdStart,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub movement: f64,
    pub temporal: f64,
    pub erratic: f64,
    pub zone_proximity_penalty_applied: bool,
}

impl ComponentScores {
    /// Component view reported alongside a cold-start or degraded score.
    pub fn neutral() -> Self {
        Self {
            movement: 100.0,
            temporal: 100.0,
            erratic: 100.0,
            zone_proximity_penalty_applied: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub escalate: bool,
    pub basis: ScoreBasis,
    pub window_len: usize,
    pub component_scores: ComponentScores,
    pub reasons: Vec<String>,
}

impl ScoreResult {
    /// Single line suitable for an alert body.
    pub fn reason_summary(&self) -> String {
        if self.reasons.is_empty() {
            format!("safety score {:.1}", self.score)
        } else {
            format!("safety score {:.1}: {}", self.score, self.reasons.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn position_rejects_out_of_range_coordinates() {
        let id = SubjectId::new("tourist-1");
        assert!(matches!(
            Position::new(id.clone(), 91.0, 0.0, at()),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Position::new(id.clone(), 0.0, -180.5, at()),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
        assert!(Position::new(id.clone(), f64::NAN, 0.0, at()).is_err());
        assert!(Position::new(id, -90.0, 180.0, at()).is_ok());
    }

    #[test]
    fn zone_rejects_non_positive_radius() {
        match RiskZone::new("Harbor", RiskLevel::High, 10.0, 10.0, 0.0) {
            Err(ZoneError::InvalidRadius { zone, .. }) => assert_eq!(zone, "Harbor"),
            other => panic!("expected invalid radius, got {other:?}"),
        }
        assert!(RiskZone::new("Harbor", RiskLevel::High, 10.0, 10.0, f64::INFINITY).is_err());
        assert!(RiskZone::new("Harbor", RiskLevel::High, 95.0, 10.0, 1.0).is_err());
    }

    #[test]
    fn zone_containment_is_strict() {
        let zone = RiskZone::new("Old Town", RiskLevel::High, 0.0, 0.0, 5.0).expect("valid zone");
        assert!(zone.contains(0.0, 0.0));
        assert!(zone.contains(0.0, 0.04));
        assert!(!zone.contains(0.0, 1.0));
    }

    #[test]
    fn risk_level_serializes_lowercase() {
        let json = serde_json::to_string(&RiskLevel::Medium).expect("serializes");
        assert_eq!(json, "\"medium\"");
        let parsed: RiskLevel = serde_json::from_str("\"high\"").expect("parses");
        assert_eq!(parsed, RiskLevel::High);
    }

    #[test]
    fn reason_summary_lists_reasons() {
        let result = ScoreResult {
            score: 42.0,
            escalate: true,
            basis: ScoreBasis::Full,
            window_len: 10,
            component_scores: ComponentScores::neutral(),
            reasons: vec!["high erratic-movement ratio".into(), "inside high-risk zone Docks".into()],
        };
        assert_eq!(
            result.reason_summary(),
            "safety score 42.0: high erratic-movement ratio, inside high-risk zone Docks"
        );
    }
}
