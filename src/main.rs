// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Replays a recorded run through the coaching engine, one JSON result per cycle

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

use running_coach_engine::config::CoachingConfig;
use running_coach_engine::engine::{CoachingEngine, CycleRequest};
use running_coach_engine::intelligence::{CoachingStrategy, DistanceCategory, RunnerLevel};
use running_coach_engine::logging;
use running_coach_engine::models::{
    AnalysisTrigger, HeartRateData, IntervalSnapshot, PerformanceSnapshot, RagAnalysisResult,
    RunnerPreferences, TelemetryReading,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run replay file (JSON)
    #[arg(short, long)]
    replay: String,

    #[arg(short, long)]
    config: Option<String>,
}

/// A recorded run
#[derive(Debug, Deserialize)]
struct RunReplay {
    preferences: RunnerPreferences,
    #[serde(default)]
    runner_name: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    started_at: DateTime<Utc>,
    cycles: Vec<ReplayCycle>,
}

#[derive(Debug, Deserialize)]
struct ReplayCycle {
    trigger: AnalysisTrigger,
    at: DateTime<Utc>,
    distance_meters: f64,
    pace_min_per_km: f64,
    #[serde(default)]
    heart_rate: Option<HeartRateData>,
    #[serde(default)]
    completed_intervals: Vec<IntervalSnapshot>,
}

#[derive(Debug, Serialize)]
struct ReplayOutput<'a> {
    trigger: AnalysisTrigger,
    at: DateTime<Utc>,
    snapshot: &'a PerformanceSnapshot,
    result: &'a RagAnalysisResult,
    distance_category: DistanceCategory,
    runner_level: RunnerLevel,
    recommended_strategy: Option<&'a CoachingStrategy>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = logging::init_from_env()?;

    let args = Args::parse();

    let config = CoachingConfig::load(args.config)?;
    log_config.log_startup(&config);

    let content = fs::read_to_string(&args.replay)
        .with_context(|| format!("Failed to read replay file: {}", args.replay))?;
    let replay: RunReplay = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse replay file: {}", args.replay))?;

    info!(cycles = replay.cycles.len(), "Replaying run from {}", args.replay);

    let mut engine = CoachingEngine::new(config);
    engine.begin_run_at(
        replay.preferences.clone(),
        replay.runner_name.clone(),
        replay.user_id.clone(),
        replay.started_at,
    );

    for cycle in replay.cycles {
        let outcome = engine.run_cycle(CycleRequest {
            trigger: cycle.trigger,
            telemetry: TelemetryReading {
                distance_meters: cycle.distance_meters,
                pace_min_per_km: cycle.pace_min_per_km,
                timestamp: cycle.at,
            },
            heart_rate: cycle.heart_rate,
            completed_intervals: cycle.completed_intervals,
            preferences: replay.preferences.clone(),
            runner_name: replay.runner_name.clone(),
            user_id: replay.user_id.clone(),
            run_started_at: replay.started_at,
            now: cycle.at,
        });

        let output = ReplayOutput {
            trigger: outcome.trigger,
            at: cycle.at,
            snapshot: &outcome.snapshot,
            result: &outcome.analysis.result,
            distance_category: outcome.analysis.distance_category,
            runner_level: outcome.analysis.runner_level,
            recommended_strategy: outcome.analysis.recommended_strategy.as_ref(),
        };
        println!("{}", serde_json::to_string(&output)?);
    }

    engine.end_run();
    Ok(())
}
