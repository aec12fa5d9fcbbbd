// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Structured logging configuration and coaching-cycle log helpers

use anyhow::Result;
use serde_json::{json, Value};
use std::env;
use std::io;
use tracing::{info, warn, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::CoachingConfig;
use crate::constants::{env_config, run, service, target};
use crate::models::{AnalysisTrigger, RagAnalysisResult};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    pub level: String,
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    pub include_thread: bool,
    /// Emit span open and close events
    pub include_spans: bool,
    pub service_name: String,
    pub service_version: String,
    /// Deployment environment (development, staging, production)
    pub environment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log shippers
    Json,
    Pretty,
    /// Single-line events without targets, for replaying runs in a terminal
    Compact,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service::SERVICE_NAME.to_string(),
            service_version: service::SERVICE_VERSION.to_string(),
            environment: "development".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Build from `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT` and the `LOG_INCLUDE_*` switches.
    ///
    /// Production turns on location, thread and span output unless the format is compact.
    pub fn from_env() -> Self {
        let format = env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| LogFormat::parse(&value))
            .unwrap_or(LogFormat::Pretty);

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let verbose = environment == "production" && format != LogFormat::Compact;
        let switch = |key: &str| verbose || env::var(key).is_ok();

        Self {
            level: env_config::log_level(),
            format,
            include_location: switch("LOG_INCLUDE_LOCATION"),
            include_thread: switch("LOG_INCLUDE_THREAD"),
            include_spans: switch("LOG_INCLUDE_SPANS"),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| service::SERVICE_NAME.to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| service::SERVICE_VERSION.to_string()),
            environment,
        }
    }

    /// Install the global subscriber. Events go to stderr; stdout carries cycle results.
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(env_filter)
            .try_init()?;
        Ok(())
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    {
        if self.format == LogFormat::Compact {
            return fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr)
                .boxed();
        }

        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_thread_ids(self.include_thread)
            .with_thread_names(self.include_thread)
            .with_writer(io::stderr)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Json => layer.json().boxed(),
            _ => layer.boxed(),
        }
    }

    /// Service identity, logging setup and the thresholds this engine classifies against
    pub fn startup_summary(&self, coaching: &CoachingConfig) -> Value {
        json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": self.format.as_str(),
                "location": self.include_location,
                "thread": self.include_thread,
                "spans": self.include_spans
            },
            "engine": {
                "nominal_run_minutes": run::NOMINAL_RUN_DURATION_MINUTES,
                "on_track_band_percent": target::ON_TRACK_BAND_PERCENT,
                "way_off_band_percent": target::WAY_OFF_BAND_PERCENT
            },
            "context": {
                "collaborator_timeout_ms": coaching.context.collaborator_timeout_ms,
                "cycle_deadline_ms": coaching.context.cycle_deadline_ms,
                "insight_limit": coaching.context.insight_limit,
                "similar_run_limit": coaching.context.similar_run_limit
            }
        })
    }

    /// Log once the coaching configuration is known
    pub fn log_startup(&self, coaching: &CoachingConfig) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Running coach engine starting up"
        );
        info!("Engine settings: {}", self.startup_summary(coaching));
    }
}

/// Initialize logging with default configuration
pub fn init_default() -> Result<LoggingConfig> {
    let config = LoggingConfig::default();
    config.init()?;
    Ok(config)
}

/// Initialize logging from environment, returning the settings in effect
pub fn init_from_env() -> Result<LoggingConfig> {
    let config = LoggingConfig::from_env();
    config.init()?;
    Ok(config)
}

/// Coaching-specific logging utilities
pub struct AppLogger;

impl AppLogger {
    /// Log the outcome of one analysis cycle
    pub fn log_analysis_cycle(
        run_id: Option<&str>,
        trigger: AnalysisTrigger,
        result: &RagAnalysisResult,
        duration_ms: u64,
    ) {
        info!(
            run.id = run_id.unwrap_or("none"),
            cycle.trigger = %trigger,
            cycle.target_status = result.target_status.as_str(),
            cycle.deviation_percent = result.target_status.deviation_percent(),
            cycle.risk_count = result.injury_risk_signals.len(),
            cycle.tags = %result.situation_tags.join(","),
            cycle.duration_ms = duration_ms,
            "Analysis cycle complete"
        );
    }

    /// Log run begin and end
    pub fn log_run_lifecycle(run_id: &str, event: &str, user_id: Option<&str>) {
        info!(
            run.id = %run_id,
            run.event = %event,
            user.id = user_id.unwrap_or("anonymous"),
            "Run lifecycle"
        );
    }

    /// Log a context collaborator call; failures are warnings
    pub fn log_collaborator_event(collaborator: &str, success: bool, duration_ms: u64, details: Option<&str>) {
        if success {
            info!(
                collaborator.name = %collaborator,
                collaborator.duration_ms = duration_ms,
                "Context collaborator responded"
            );
        } else {
            warn!(
                collaborator.name = %collaborator,
                collaborator.duration_ms = duration_ms,
                collaborator.details = details.unwrap_or(""),
                "Context collaborator degraded to empty"
            );
        }
    }

    /// Log the risk signals raised in a cycle
    pub fn log_risk_signals(run_id: Option<&str>, signals: &[String]) {
        if signals.is_empty() {
            return;
        }
        warn!(
            run.id = run_id.unwrap_or("none"),
            risk.count = signals.len(),
            risk.signals = %signals.join("; "),
            "Injury risk signals raised"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_logging_config_from_env() {
        env::set_var("RUST_LOG", "debug");
        env::set_var("LOG_FORMAT", "json");
        env::set_var("ENVIRONMENT", "production");
        env::set_var("SERVICE_NAME", "test-service");

        let config = LoggingConfig::from_env();

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.environment, "production");
        assert_eq!(config.service_name, "test-service");
        assert!(config.include_location);

        // compact output stays terse even in production
        env::set_var("LOG_FORMAT", "Compact");
        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.include_location);
        assert!(!config.include_spans);

        env::remove_var("RUST_LOG");
        env::remove_var("LOG_FORMAT");
        env::remove_var("ENVIRONMENT");
        env::remove_var("SERVICE_NAME");
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();

        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.environment, "development");
        assert_eq!(config.service_name, "running-coach-engine");
        assert!(!config.include_location);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse(" JSON "), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
        assert_eq!(LogFormat::Compact.as_str(), "compact");
    }

    #[test]
    fn test_startup_summary_reports_engine_settings() {
        let mut coaching = CoachingConfig::default();
        coaching.context.cycle_deadline_ms = 750;

        let summary = LoggingConfig::default().startup_summary(&coaching);

        assert_eq!(summary["logging"]["format"], "pretty");
        assert_eq!(summary["engine"]["nominal_run_minutes"], 30.0);
        assert_eq!(summary["engine"]["on_track_band_percent"], 5.0);
        assert_eq!(summary["engine"]["way_off_band_percent"], 15.0);
        assert_eq!(summary["context"]["cycle_deadline_ms"], 750);
        assert_eq!(
            summary["context"]["collaborator_timeout_ms"],
            coaching.context.collaborator_timeout_ms
        );
    }
}
