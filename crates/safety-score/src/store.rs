use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Position, RiskZone, SubjectId};
use crate::source::{PositionSink, PositionSource, SourceError, ZoneSource};

/// Process-local position store, each subject's history kept newest first.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPositionStore {
    positions: Arc<Mutex<HashMap<SubjectId, Vec<Position>>>>,
}

impl InMemoryPositionStore {
    pub fn extend<I>(&self, positions: I) -> Result<(), SourceError>
    where
        I: IntoIterator<Item = Position>,
    {
        for position in positions {
            self.append(position)?;
        }
        Ok(())
    }

    pub fn len(&self, subject: &SubjectId) -> Result<usize, SourceError> {
        let guard = lock(&self.positions)?;
        Ok(guard.get(subject).map(Vec::len).unwrap_or(0))
    }
}

impl PositionSource for InMemoryPositionStore {
    fn recent_positions(
        &self,
        subject: &SubjectId,
        limit: usize,
    ) -> Result<Vec<Position>, SourceError> {
        let guard = lock(&self.positions)?;
        Ok(guard
            .get(subject)
            .map(|history| history.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

impl PositionSink for InMemoryPositionStore {
    fn append(&self, position: Position) -> Result<(), SourceError> {
        let mut guard = lock(&self.positions)?;
        let history = guard.entry(position.subject_id.clone()).or_default();
        // Ties put the latest arrival first.
        let index = history.partition_point(|existing| existing.timestamp > position.timestamp);
        history.insert(index, position);
        Ok(())
    }
}

/// Zone catalogue snapshot. Stores every level but serves only high-risk zones.
#[derive(Debug, Default, Clone)]
pub struct InMemoryZoneStore {
    zones: Arc<Mutex<Vec<RiskZone>>>,
}

impl InMemoryZoneStore {
    pub fn new(zones: Vec<RiskZone>) -> Self {
        Self {
            zones: Arc::new(Mutex::new(zones)),
        }
    }
}

impl ZoneSource for InMemoryZoneStore {
    fn high_risk_zones(&self) -> Result<Vec<RiskZone>, SourceError> {
        Ok(lock(&self.zones)?
            .iter()
            .filter(|zone| zone.is_high_risk())
            .cloned()
            .collect())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, SourceError> {
    mutex
        .lock()
        .map_err(|_| SourceError::Unavailable("in-memory store mutex poisoned".to_string()))
}
