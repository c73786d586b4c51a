use crate::domain::{Position, RiskZone};

/// First high-risk zone containing the latest position. Zones of any other
/// level are ignored even if they contain the point.
pub fn containing_high_risk_zone<'a>(
    latest: &Position,
    zones: &'a [RiskZone],
) -> Option<&'a RiskZone> {
    zones
        .iter()
        .filter(|zone| zone.is_high_risk())
        .find(|zone| zone.contains(latest.latitude, latest.longitude))
}
