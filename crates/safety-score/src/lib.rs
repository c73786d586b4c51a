//! Safety risk scoring for mobile subjects.
//!
//! [`scoring::RiskEngine`] is a pure function of a position window, a zone
//! snapshot and an [`config::EngineConfig`]. [`service::RiskScoringService`]
//! feeds it from the store collaborators in [`source`], and
//! [`ingest::PositionIngestor`] wires it into position ingestion.

pub mod config;
pub mod domain;
pub mod error;
pub mod geo;
pub mod import;
pub mod ingest;
pub mod scoring;
pub mod service;
pub mod source;
pub mod store;
pub mod telemetry;

pub use config::{AppConfig, EngineConfig, RiskWeights};
pub use domain::{
    ComponentScores, Position, RiskLevel, RiskZone, ScoreBasis, ScoreInput, ScoreResult, SubjectId,
};
pub use scoring::{RiskEngine, ScoreOutcome};
pub use service::RiskScoringService;
