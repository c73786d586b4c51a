use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::EngineConfig;
use crate::domain::{Position, RiskLevel, RiskZone, ScoreInput, SubjectId};
use crate::geo::EARTH_RADIUS_KM;
use crate::scoring::RiskEngine;

/// Reference "now" for fixtures: a Saturday afternoon, well clear of the
/// night band.
pub(crate) fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0)
        .single()
        .expect("valid reference time")
}

pub(crate) fn subject() -> SubjectId {
    SubjectId::new("tourist-0042")
}

/// Degrees of longitude on the equator covering `km`.
pub(crate) fn equator_degrees(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrackPoint {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) timestamp: DateTime<Utc>,
}

impl TrackPoint {
    /// Point on the equator `km` east of the origin, at the reference time.
    pub(crate) fn east_km(km: f64) -> Self {
        Self {
            latitude: 0.0,
            longitude: equator_degrees(km),
            timestamp: reference_time(),
        }
    }

    pub(crate) fn minutes_ago(mut self, minutes: i64) -> Self {
        self.timestamp = reference_time() - Duration::minutes(minutes);
        self
    }

    /// Same calendar day as the reference time, at `hour:minute` UTC.
    pub(crate) fn at_utc(mut self, hour: u32, minute: u32) -> Self {
        self.timestamp = Utc
            .with_ymd_and_hms(2025, 3, 1, hour, minute, 0)
            .single()
            .expect("valid fixture time");
        self
    }
}

pub(crate) fn track(points: Vec<TrackPoint>) -> Vec<Position> {
    points
        .into_iter()
        .map(|point| {
            Position::new(subject(), point.latitude, point.longitude, point.timestamp)
                .expect("fixture coordinates are valid")
        })
        .collect()
}

/// `count` daytime fixes `step_km` apart along the equator, 30 minutes
/// between fixes, newest (origin) first.
pub(crate) fn steady_walk(count: usize, step_km: f64) -> Vec<Position> {
    track(
        (0..count)
            .map(|i| TrackPoint::east_km(i as f64 * step_km).minutes_ago(i as i64 * 30))
            .collect(),
    )
}

pub(crate) fn high_zone_at(name: &str, east_km: f64, radius_km: f64) -> RiskZone {
    RiskZone::new(
        name,
        RiskLevel::High,
        0.0,
        equator_degrees(east_km),
        radius_km,
    )
    .expect("valid fixture zone")
}

pub(crate) fn input(window: Vec<Position>, zones: Vec<RiskZone>) -> ScoreInput {
    ScoreInput {
        subject_id: subject(),
        window,
        high_risk_zones: zones,
    }
}

pub(crate) fn engine() -> RiskEngine {
    RiskEngine::new(EngineConfig::default()).expect("default config is valid")
}

pub(crate) fn assert_score(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected score {expected}, got {actual}"
    );
}
