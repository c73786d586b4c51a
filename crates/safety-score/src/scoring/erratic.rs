use crate::domain::Position;

pub const MIN_ERRATIC_WINDOW: usize = 5;

/// A consecutive pair is "rapid" when it covers more than `distance_km` in
/// less than `interval_minutes`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RapidMovement {
    pub distance_km: f64,
    pub interval_minutes: f64,
}

impl RapidMovement {
    /// `newer` must be the earlier element of a newest-first window. A
    /// non-monotonic pair yields a negative interval and is judged as is.
    pub fn is_rapid(&self, newer: &Position, older: &Position) -> bool {
        let minutes = (newer.timestamp - older.timestamp).num_milliseconds() as f64 / 60_000.0;
        let distance = newer.distance_to(older);
        distance > self.distance_km && minutes < self.interval_minutes
    }
}

/// Share of consecutive pairs that are rapid, `None` for fewer than two positions.
pub fn erratic_ratio(window: &[Position], rule: &RapidMovement) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }

    let rapid = window
        .windows(2)
        .filter(|pair| rule.is_rapid(&pair[0], &pair[1]))
        .count();

    Some(rapid as f64 / (window.len() - 1) as f64)
}

/// Three buckets only, coarser than the movement and temporal scales.
pub fn erratic_score(window: &[Position], rule: &RapidMovement) -> f64 {
    if window.len() < MIN_ERRATIC_WINDOW {
        return 100.0;
    }

    match erratic_ratio(window, rule) {
        Some(ratio) if ratio < 0.1 => 100.0,
        Some(ratio) if ratio < 0.3 => 70.0,
        Some(_) => 40.0,
        None => 100.0,
    }
}
