use crate::domain::{ComponentScores, RiskZone};

pub const COLD_START_REASON: &str = "insufficient position history";

/// Decides whether a freshly computed score warrants an automatic alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationGate {
    pub threshold: f64,
}

impl EscalationGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn should_escalate(&self, score: f64) -> bool {
        score < self.threshold
    }
}

/// Names the signals that pulled the score below 100.
pub fn explain(components: &ComponentScores, zone: Option<&RiskZone>) -> Vec<String> {
    let mut reasons = Vec::new();

    if components.movement < 100.0 {
        reasons.push("irregular movement pattern".to_string());
    }
    if components.temporal < 100.0 {
        reasons.push("high night-time activity".to_string());
    }
    if components.erratic < 100.0 {
        reasons.push("high erratic-movement ratio".to_string());
    }
    if let Some(zone) = zone {
        reasons.push(format!("inside high-risk zone {}", zone.name));
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;

    #[test]
    fn escalates_strictly_below_threshold() {
        let gate = EscalationGate::new(50.0);
        assert!(gate.should_escalate(49.99));
        assert!(!gate.should_escalate(50.0));
        assert!(!gate.should_escalate(85.0));
    }

    #[test]
    fn explains_driving_signals() {
        let components = ComponentScores {
            movement: 100.0,
            temporal: 80.0,
            erratic: 40.0,
            zone_proximity_penalty_applied: true,
        };
        let zone = RiskZone::new("Docks", RiskLevel::High, 0.0, 0.0, 2.0).expect("valid zone");

        let reasons = explain(&components, Some(&zone));

        assert_eq!(
            reasons,
            vec![
                "high night-time activity".to_string(),
                "high erratic-movement ratio".to_string(),
                "inside high-risk zone Docks".to_string(),
            ]
        );
    }

    #[test]
    fn perfect_components_have_no_reasons() {
        assert!(explain(&ComponentScores::neutral(), None).is_empty());
    }
}
