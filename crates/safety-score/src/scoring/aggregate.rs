use crate::config::RiskWeights;
use crate::domain::ComponentScores;

/// Folds the component scores into one bounded score.
///
/// Every sub-score is clamped to `[0, 100]` first. The engine's rules only
/// emit bucket values (corrupt coordinates land in the lowest bucket), so the
/// non-finite guard only matters for hand-built [`ComponentScores`]: such a
/// sub-score counts as 100, and a non-finite total returns `fallback`.
pub fn aggregate(
    components: &ComponentScores,
    weights: &RiskWeights,
    zone_penalty: f64,
    fallback: f64,
) -> f64 {
    let mut score = 100.0;

    score -= (100.0 - sanitize(components.movement)) * weights.movement;
    score -= (100.0 - sanitize(components.temporal)) * weights.temporal;
    score -= (100.0 - sanitize(components.erratic)) * weights.erratic;

    if components.zone_proximity_penalty_applied {
        score -= zone_penalty;
    }

    if !score.is_finite() {
        return fallback;
    }

    score.clamp(0.0, 100.0)
}

fn sanitize(component: f64) -> f64 {
    if component.is_finite() {
        component.clamp(0.0, 100.0)
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(movement: f64, temporal: f64, erratic: f64, zone: bool) -> ComponentScores {
        ComponentScores {
            movement,
            temporal,
            erratic,
            zone_proximity_penalty_applied: zone,
        }
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn perfect_components_score_100() {
        let score = aggregate(
            &components(100.0, 100.0, 100.0, false),
            &RiskWeights::default(),
            20.0,
            85.0,
        );
        approx(score, 100.0);
    }

    #[test]
    fn applies_fixed_weights() {
        let weights = RiskWeights::default();
        approx(
            aggregate(&components(60.0, 100.0, 100.0, false), &weights, 20.0, 85.0),
            88.0,
        );
        approx(
            aggregate(&components(100.0, 40.0, 100.0, false), &weights, 20.0, 85.0),
            88.0,
        );
        approx(
            aggregate(&components(40.0, 40.0, 40.0, true), &weights, 20.0, 85.0),
            38.0,
        );
    }

    #[test]
    fn zone_penalty_is_flat() {
        approx(
            aggregate(
                &components(100.0, 100.0, 100.0, true),
                &RiskWeights::default(),
                20.0,
                85.0,
            ),
            80.0,
        );
    }

    #[test]
    fn adversarial_inputs_stay_in_range() {
        let heavy = RiskWeights {
            movement: 5.0,
            temporal: 5.0,
            erratic: 5.0,
        };
        let extremes = [
            -1e12,
            -100.0,
            0.0,
            50.0,
            100.0,
            250.0,
            1e12,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
        ];
        for weights in [RiskWeights::default(), heavy] {
            for movement in extremes {
                for erratic in extremes {
                    for zone in [false, true] {
                        let score = aggregate(
                            &components(movement, 0.0, erratic, zone),
                            &weights,
                            1e9,
                            85.0,
                        );
                        assert!(
                            (0.0..=100.0).contains(&score),
                            "score {score} out of range for movement={movement} erratic={erratic}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn nan_component_counts_as_no_penalty() {
        approx(
            aggregate(
                &components(f64::NAN, 100.0, 100.0, false),
                &RiskWeights::default(),
                20.0,
                85.0,
            ),
            100.0,
        );
    }
}
