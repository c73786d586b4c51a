use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Deployment stage, read from `APP_ENV`. Only log output depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Colored multi-field lines for a terminal; single uncolored lines
    /// everywhere logs are collected.
    pub fn log_format(self) -> LogFormat {
        match self {
            AppEnvironment::Development => LogFormat::Full,
            AppEnvironment::Test | AppEnvironment::Production => LogFormat::Compact,
        }
    }
}

/// Top-level configuration for a host embedding the engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let engine = EngineConfig::from_env()?;

        Ok(Self {
            telemetry: TelemetryConfig {
                log_level,
                format: environment.log_format(),
            },
            engine,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Target, ANSI colors and all span fields.
    Full,
    /// One uncolored line per event, no target.
    Compact,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub format: LogFormat,
}

/// Relative weight of each pattern signal in the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub movement: f64,
    pub temporal: f64,
    pub erratic: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            movement: 0.30,
            temporal: 0.20,
            erratic: 0.20,
        }
    }
}

/// Immutable tuning surface of the scoring engine. Validated once, at
/// construction of [`crate::scoring::RiskEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Most recent positions considered per pass.
    pub window_size: usize,
    /// Windows shorter than this return `cold_start_score`.
    pub cold_start_threshold: usize,
    pub cold_start_score: f64,
    /// Scores strictly below this escalate.
    pub escalation_threshold: f64,
    pub night_band_start_hour: u32,
    pub night_band_end_hour: u32,
    /// Offset applied to UTC timestamps before taking the hour of day.
    pub utc_offset_minutes: i32,
    pub zone_penalty: f64,
    pub weights: RiskWeights,
    pub rapid_distance_km: f64,
    pub rapid_interval_minutes: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            cold_start_threshold: 5,
            cold_start_score: 85.0,
            escalation_threshold: 50.0,
            night_band_start_hour: 23,
            night_band_end_hour: 5,
            utc_offset_minutes: 0,
            zone_penalty: 20.0,
            weights: RiskWeights::default(),
            rapid_distance_km: 5.0,
            rapid_interval_minutes: 10.0,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `SAFETY_*` variables present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        override_from_env("SAFETY_WINDOW_SIZE", &mut config.window_size)?;
        override_from_env(
            "SAFETY_COLD_START_THRESHOLD",
            &mut config.cold_start_threshold,
        )?;
        override_from_env("SAFETY_COLD_START_SCORE", &mut config.cold_start_score)?;
        override_from_env(
            "SAFETY_ESCALATION_THRESHOLD",
            &mut config.escalation_threshold,
        )?;
        override_from_env("SAFETY_NIGHT_START_HOUR", &mut config.night_band_start_hour)?;
        override_from_env("SAFETY_NIGHT_END_HOUR", &mut config.night_band_end_hour)?;
        override_from_env("SAFETY_UTC_OFFSET_MINUTES", &mut config.utc_offset_minutes)?;
        override_from_env("SAFETY_ZONE_PENALTY", &mut config.zone_penalty)?;
        override_from_env("SAFETY_WEIGHT_MOVEMENT", &mut config.weights.movement)?;
        override_from_env("SAFETY_WEIGHT_TEMPORAL", &mut config.weights.temporal)?;
        override_from_env("SAFETY_WEIGHT_ERRATIC", &mut config.weights.erratic)?;
        override_from_env("SAFETY_RAPID_DISTANCE_KM", &mut config.rapid_distance_km)?;
        override_from_env(
            "SAFETY_RAPID_INTERVAL_MINUTES",
            &mut config.rapid_interval_minutes,
        )?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 || self.cold_start_threshold == 0 {
            return Err(ConfigError::InvalidWindow {
                window_size: self.window_size,
                cold_start_threshold: self.cold_start_threshold,
            });
        }
        if self.cold_start_threshold > self.window_size {
            return Err(ConfigError::InvalidWindow {
                window_size: self.window_size,
                cold_start_threshold: self.cold_start_threshold,
            });
        }

        for (name, value) in [
            ("movement", self.weights.movement),
            ("temporal", self.weights.temporal),
            ("erratic", self.weights.erratic),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        for (name, value) in [
            ("night_band_start_hour", self.night_band_start_hour),
            ("night_band_end_hour", self.night_band_end_hour),
        ] {
            if value > 23 {
                return Err(ConfigError::InvalidHour { name, value });
            }
        }

        for (name, value) in [
            ("escalation_threshold", self.escalation_threshold),
            ("cold_start_score", self.cold_start_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }

        if !self.zone_penalty.is_finite() || self.zone_penalty < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "zone_penalty",
                value: self.zone_penalty,
            });
        }

        for (name, value) in [
            ("rapid_distance_km", self.rapid_distance_km),
            ("rapid_interval_minutes", self.rapid_interval_minutes),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }

        if self.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(ConfigError::InvalidOffset(self.utc_offset_minutes));
        }

        Ok(())
    }
}

fn override_from_env<T: FromStr>(key: &'static str, target: &mut T) -> Result<(), ConfigError> {
    match env::var(key) {
        Ok(raw) => {
            *target = raw
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { key, value: raw })?;
            Ok(())
        }
        Err(_) => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    InvalidWindow {
        window_size: usize,
        cold_start_threshold: usize,
    },
    InvalidWeight { name: &'static str, value: f64 },
    InvalidHour { name: &'static str, value: u32 },
    OutOfRange { name: &'static str, value: f64 },
    InvalidOffset(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unparseable value '{value}'")
            }
            ConfigError::InvalidWindow {
                window_size,
                cold_start_threshold,
            } => write!(
                f,
                "window size {window_size} and cold-start threshold {cold_start_threshold} must be positive, with the threshold no larger than the window"
            ),
            ConfigError::InvalidWeight { name, value } => {
                write!(f, "{name} weight must be a finite non-negative number, got {value}")
            }
            ConfigError::InvalidHour { name, value } => {
                write!(f, "{name} must be an hour between 0 and 23, got {value}")
            }
            ConfigError::OutOfRange { name, value } => {
                write!(f, "{name} is out of range: {value}")
            }
            ConfigError::InvalidOffset(minutes) => {
                write!(f, "UTC offset of {minutes} minutes exceeds a day")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
