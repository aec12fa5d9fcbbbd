// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Running Coach Engine
//!
//! Real-time performance analysis for a run in progress. Each coaching cycle
//! turns live telemetry, optional heart-rate data and completed kilometer
//! splits into a structured, explainable result: target progress, trends,
//! fatigue, cardiac drift, injury-risk signals and a tactical strategy.
//!
//! ## Features
//!
//! - **Deterministic classification**: identical inputs always yield identical output
//! - **Missing data tolerance**: absent heart-rate data never fails a cycle
//! - **Bounded enrichment**: optional collaborators add context text under a deadline
//! - **Run-scoped cache**: preferences and identity fixed for the duration of a run
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use running_coach_engine::config::CoachingConfig;
//! use running_coach_engine::engine::{CoachingEngine, CycleRequest};
//! use running_coach_engine::models::{AnalysisTrigger, RunnerPreferences, TelemetryReading};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = CoachingConfig::load(None)?;
//!     let mut engine = CoachingEngine::new(config);
//!
//!     let started = Utc::now();
//!     engine.begin_run_at(RunnerPreferences::default(), Some("Sam".into()), None, started);
//!
//!     let now = started + Duration::minutes(12);
//!     let result = engine.analyze(CycleRequest {
//!         trigger: AnalysisTrigger::Time,
//!         telemetry: TelemetryReading { distance_meters: 2000.0, pace_min_per_km: 6.0, timestamp: now },
//!         heart_rate: None,
//!         completed_intervals: vec![],
//!         preferences: RunnerPreferences::default(),
//!         runner_name: None,
//!         user_id: None,
//!         run_started_at: started,
//!         now,
//!     });
//!     println!("{}", result.adaptive_strategy);
//!
//!     engine.end_run();
//!     Ok(())
//! }
//! ```

/// Value shapes shared across the engine
pub mod models;

/// Classification thresholds and environment accessors
pub mod constants;

/// Configuration loading
pub mod config;

/// Production logging and structured output
pub mod logging;

/// Snapshot building, classifiers, risk rules and strategy generation
pub mod intelligence;

/// Run-scoped preference and identity cache
pub mod run_cache;

/// Bounded concurrent lookups against context collaborators
pub mod context;

/// Per-cycle orchestration
pub mod engine;
