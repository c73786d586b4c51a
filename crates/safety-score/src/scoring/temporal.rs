use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::domain::Position;

/// Hours of the day considered high risk, both ends inclusive. A band whose
/// start is after its end wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightBand {
    pub start_hour: u32,
    pub end_hour: u32,
    pub offset: FixedOffset,
}

impl NightBand {
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.contains_hour(timestamp.with_timezone(&self.offset).hour())
    }
}

/// Fraction of positions recorded inside the band; zero for an empty window.
pub fn night_ratio(window: &[Position], band: &NightBand) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let night = window
        .iter()
        .filter(|position| band.contains(&position.timestamp))
        .count();

    night as f64 / window.len() as f64
}

pub fn temporal_score(window: &[Position], band: &NightBand) -> f64 {
    ratio_to_score(night_ratio(window, band))
}

pub(crate) fn ratio_to_score(ratio: f64) -> f64 {
    if ratio < 0.1 {
        100.0
    } else if ratio < 0.3 {
        80.0
    } else if ratio < 0.5 {
        60.0
    } else {
        40.0
    }
}
