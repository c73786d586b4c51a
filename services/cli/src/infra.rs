use safety_score::import;
use safety_score::ingest::{EscalationSignal, EscalationSink, SinkError};
use safety_score::EngineConfig;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Stands in for the alerting service: logs each signal and keeps it for the
/// final summary.
#[derive(Default, Clone)]
pub(crate) struct LoggingEscalationSink {
    events: Arc<Mutex<Vec<EscalationSignal>>>,
}

impl EscalationSink for LoggingEscalationSink {
    fn raise(&self, signal: EscalationSignal) -> Result<(), SinkError> {
        warn!(
            subject = %signal.subject_id,
            score = signal.score,
            reason = %signal.reason,
            "automatic safety alert"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| SinkError::Transport("alert log mutex poisoned".to_string()))?;
        guard.push(signal);
        Ok(())
    }
}

impl LoggingEscalationSink {
    pub(crate) fn events(&self) -> Vec<EscalationSignal> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Settings file when given, otherwise the environment-derived settings.
pub(crate) fn engine_config(
    path: Option<&Path>,
    fallback: EngineConfig,
) -> Result<EngineConfig, import::ImportError> {
    match path {
        Some(path) => import::engine_config_from_path(path),
        None => Ok(fallback),
    }
}
