use crate::infra::engine_config;
use clap::Args;
use safety_score::config::AppConfig;
use safety_score::error::AppError;
use safety_score::import;
use safety_score::store::{InMemoryPositionStore, InMemoryZoneStore};
use safety_score::{
    EngineConfig, Position, RiskScoringService, RiskZone, ScoreOutcome, SubjectId,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export with subject_id,latitude,longitude,timestamp columns
    #[arg(long)]
    pub(crate) positions: PathBuf,
    /// JSON array of risk zones
    #[arg(long)]
    pub(crate) zones: Option<PathBuf>,
    /// Subject to score
    #[arg(long)]
    pub(crate) subject: String,
    /// JSON engine settings; missing keys keep their defaults
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs, app: AppConfig) -> Result<(), AppError> {
    let ScoreArgs {
        positions,
        zones,
        subject,
        config,
    } = args;

    let engine_config = engine_config(config.as_deref(), app.engine)?;
    let positions = import::positions_from_path(&positions)?;
    let zones = match zones {
        Some(path) => import::zones_from_path(path)?,
        None => Vec::new(),
    };

    let outcome = score_fixtures(positions, zones, &SubjectId(subject), engine_config)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn score_fixtures(
    positions: Vec<Position>,
    zones: Vec<RiskZone>,
    subject: &SubjectId,
    engine_config: EngineConfig,
) -> Result<ScoreOutcome, AppError> {
    let store = Arc::new(InMemoryPositionStore::default());
    store.extend(positions)?;

    info!(
        subject = %subject,
        positions = store.len(subject)?,
        zones = zones.len(),
        "scoring subject from fixtures"
    );

    let zones = Arc::new(InMemoryZoneStore::new(zones));
    let service = RiskScoringService::new(store, zones, engine_config)?;
    Ok(service.compute_risk_score(subject))
}
