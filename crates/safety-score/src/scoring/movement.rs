use crate::domain::Position;

/// Below this many positions the movement rule abstains.
pub const MIN_MOVEMENT_WINDOW: usize = 10;

/// Mean distance between consecutive positions, `None` for fewer than two.
pub fn average_segment_km(window: &[Position]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }

    let total: f64 = window
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();

    Some(total / (window.len() - 1) as f64)
}

/// Scores average inter-sample displacement: local wandering is benign,
/// long hauls between fixes are not.
pub fn movement_score(window: &[Position]) -> f64 {
    if window.len() < MIN_MOVEMENT_WINDOW {
        return 100.0;
    }

    match average_segment_km(window) {
        Some(avg) if avg < 5.0 => 100.0,
        Some(avg) if avg < 10.0 => 80.0,
        Some(avg) if avg < 20.0 => 60.0,
        _ => 40.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tests::common::{track, TrackPoint};

    fn straight_line(count: usize, step_km: f64) -> Vec<Position> {
        track(
            (0..count)
                .map(|i| TrackPoint::east_km(i as f64 * step_km).minutes_ago(i as i64 * 30))
                .collect(),
        )
    }

    #[test]
    fn short_windows_are_not_penalized() {
        let window = straight_line(9, 50.0);
        assert_eq!(movement_score(&window), 100.0);
    }

    #[test]
    fn maps_average_distance_to_buckets() {
        assert_eq!(movement_score(&straight_line(10, 1.0)), 100.0);
        assert_eq!(movement_score(&straight_line(10, 7.0)), 80.0);
        assert_eq!(movement_score(&straight_line(10, 15.0)), 60.0);
        assert_eq!(movement_score(&straight_line(10, 25.0)), 40.0);
    }

    #[test]
    fn averages_over_all_segments() {
        let window = straight_line(11, 2.0);
        let avg = average_segment_km(&window).expect("enough positions");
        assert!((avg - 2.0).abs() < 0.01, "got {avg}");
    }

    #[test]
    fn nan_coordinates_fall_to_lowest_bucket() {
        let mut window = straight_line(10, 1.0);
        window[3].latitude = f64::NAN;
        assert_eq!(movement_score(&window), 40.0);
    }
}
