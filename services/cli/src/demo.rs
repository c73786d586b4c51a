use crate::infra::{engine_config, LoggingEscalationSink};
use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Args;
use safety_score::config::AppConfig;
use safety_score::error::AppError;
use safety_score::geo::EARTH_RADIUS_KM;
use safety_score::ingest::{EscalationSink, IngestReport, PositionIngestor};
use safety_score::store::{InMemoryPositionStore, InMemoryZoneStore};
use safety_score::{Position, RiskLevel, RiskScoringService, RiskZone, SubjectId};
use std::path::PathBuf;
use std::sync::Arc;

const BASE_LATITUDE: f64 = 27.1751;
const BASE_LONGITUDE: f64 = 78.0421;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// JSON engine settings; missing keys keep their defaults
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Print each final report as JSON instead of a summary line
    #[arg(long)]
    pub(crate) json: bool,
}

struct Scenario {
    subject: &'static str,
    title: &'static str,
    fixes: Vec<Fix>,
}

/// Offset from the base point in km, and minutes before the scenario's end.
struct Fix {
    north_km: f64,
    east_km: f64,
    minutes_before: i64,
}

pub(crate) fn run_demo(args: DemoArgs, app: AppConfig) -> Result<(), AppError> {
    let DemoArgs { config, json } = args;
    let engine_config = engine_config(config.as_deref(), app.engine)?;

    let store = Arc::new(InMemoryPositionStore::default());
    let zones = Arc::new(InMemoryZoneStore::new(zone_catalogue()?));
    let sink = Arc::new(LoggingEscalationSink::default());
    let scoring = RiskScoringService::new(store.clone(), zones, engine_config)?;
    let ingestor = PositionIngestor::new(store, scoring, sink.clone());

    println!("Safety score demo");
    for scenario in scenarios() {
        if let Some(report) = replay(&ingestor, &scenario)? {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render_report(scenario.title, &report);
            }
        }
    }

    let alerts = sink.events();
    println!("\nEscalations raised: {}", alerts.len());
    for alert in alerts {
        println!("  - {} at {:.1}: {}", alert.subject_id, alert.score, alert.reason);
    }

    Ok(())
}

/// Feeds a scenario oldest fix first, the order a device would report them,
/// and returns the report for the newest fix.
fn replay<E>(
    ingestor: &PositionIngestor<InMemoryPositionStore, InMemoryZoneStore, E>,
    scenario: &Scenario,
) -> Result<Option<IngestReport>, AppError>
where
    E: EscalationSink + 'static,
{
    let end = scenario_end(scenario.subject)?;
    let subject = SubjectId::new(scenario.subject);
    let mut last = None;

    for fix in scenario.fixes.iter().rev() {
        let position = fix_position(&subject, fix, end)?;
        last = Some(ingestor.record(position)?);
    }

    Ok(last)
}

fn render_report(title: &str, report: &IngestReport) {
    let result = report.outcome.result();
    let verdict = if report.escalated() {
        "ESCALATE"
    } else {
        "ok"
    };
    println!(
        "\n{title}\n  subject {}: score {:.1} [{verdict}] over {} positions",
        report.subject_id,
        result.score,
        result.window_len
    );
    println!(
        "  movement {:.0} | temporal {:.0} | erratic {:.0} | zone penalty {}",
        result.component_scores.movement,
        result.component_scores.temporal,
        result.component_scores.erratic,
        if result.component_scores.zone_proximity_penalty_applied {
            "yes"
        } else {
            "no"
        }
    );
    if !result.reasons.is_empty() {
        println!("  reasons: {}", result.reasons.join(", "));
    }
}

fn zone_catalogue() -> Result<Vec<RiskZone>, AppError> {
    let (harbor_lat, harbor_lon) = offset(2.0, 0.0);
    let (market_lat, market_lon) = offset(0.0, 0.0);
    let (quarry_lat, quarry_lon) = offset(-20.0, 40.0);

    let zones = vec![
        RiskZone::new("Old Harbor", RiskLevel::High, harbor_lat, harbor_lon, 1.5),
        RiskZone::new("Central Bazaar", RiskLevel::Medium, market_lat, market_lon, 3.0),
        RiskZone::new("Quarry Road", RiskLevel::Low, quarry_lat, quarry_lon, 5.0),
    ];

    zones
        .into_iter()
        .map(|zone| zone.map_err(AppError::from))
        .collect()
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            subject: "demo-walker",
            title: "Afternoon stroll around the bazaar",
            fixes: (0..10)
                .map(|i| Fix {
                    north_km: -(i as f64) * 0.4,
                    east_km: i as f64 * 0.6,
                    minutes_before: i * 20,
                })
                .collect(),
        },
        Scenario {
            subject: "demo-driver",
            title: "Day trip with long hops between fixes",
            fixes: (0..10)
                .map(|i| Fix {
                    north_km: -20.0,
                    east_km: -(i as f64) * 15.0,
                    minutes_before: i * 30,
                })
                .collect(),
        },
        Scenario {
            subject: "demo-harbor",
            title: "Walk ending at the Old Harbor",
            fixes: (0..10)
                .map(|i| Fix {
                    north_km: 2.0 - i as f64 * 0.5,
                    east_km: 0.0,
                    minutes_before: i * 20,
                })
                .collect(),
        },
        Scenario {
            subject: "demo-night",
            title: "Night-time jumps ending at the Old Harbor",
            fixes: (0..10)
                .map(|i| Fix {
                    north_km: 2.0,
                    east_km: i as f64 * 25.0,
                    minutes_before: i * 5,
                })
                .collect(),
        },
    ]
}

/// 2025-03-01 at 16:50 UTC, or 01:50 for the night scenario.
fn scenario_end(subject: &str) -> Result<DateTime<Utc>, AppError> {
    let hour = if subject == "demo-night" { 1 } else { 16 };
    Utc.with_ymd_and_hms(2025, 3, 1, hour, 50, 0)
        .single()
        .ok_or_else(|| AppError::Fixture(format!("no unique end time for {subject}")))
}

fn fix_position(subject: &SubjectId, fix: &Fix, end: DateTime<Utc>) -> Result<Position, AppError> {
    let (latitude, longitude) = offset(fix.north_km, fix.east_km);
    Position::new(
        subject.clone(),
        latitude,
        longitude,
        end - Duration::minutes(fix.minutes_before),
    )
    .map_err(AppError::from)
}

/// Small-distance offset from the base point.
fn offset(north_km: f64, east_km: f64) -> (f64, f64) {
    let km_per_degree = EARTH_RADIUS_KM.to_radians();
    let latitude = BASE_LATITUDE + north_km / km_per_degree;
    let longitude =
        BASE_LONGITUDE + east_km / (km_per_degree * BASE_LATITUDE.to_radians().cos());
    (latitude, longitude)
}
