// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Coaching Engine
//!
//! Per-cycle orchestration for one run: resolves run context through the
//! [`RunCache`], advances the cardiac drift tracker, builds the snapshot and
//! runs the analysis pipeline. Context collaborators only ever add text to a
//! result that has already been computed from local data.
//!
//! One engine serves one run at a time. Overlapping cycles for the same run
//! are not supported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::CoachingConfig;
use crate::context::ContextGatherer;
use crate::intelligence::report::augment_with_context;
use crate::intelligence::{
    build_snapshot, drift_percent, CardiacDriftTracker, CycleAnalysis, RunAnalyzer, SnapshotInputs,
};
use crate::logging::AppLogger;
use crate::models::{
    AnalysisTrigger, HeartRateData, IntervalSnapshot, KmDriftData, PerformanceSnapshot,
    RagAnalysisResult, RunnerPreferences, TelemetryReading,
};
use crate::run_cache::{RunCache, RunContext};

/// Inputs for one analysis cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRequest {
    pub trigger: AnalysisTrigger,
    pub telemetry: TelemetryReading,
    #[serde(default)]
    pub heart_rate: Option<HeartRateData>,
    #[serde(default)]
    pub completed_intervals: Vec<IntervalSnapshot>,
    pub preferences: RunnerPreferences,
    #[serde(default)]
    pub runner_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub run_started_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

/// Everything produced by one cycle
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub trigger: AnalysisTrigger,
    pub run_context: RunContext,
    pub snapshot: PerformanceSnapshot,
    pub analysis: CycleAnalysis,
}

/// Real-time coaching engine for a single run
#[derive(Debug)]
pub struct CoachingEngine {
    config: CoachingConfig,
    cache: RunCache,
    drift_tracker: CardiacDriftTracker,
    analyzer: RunAnalyzer,
}

impl CoachingEngine {
    pub fn new(config: CoachingConfig) -> Self {
        Self::with_analyzer(config, RunAnalyzer::new())
    }

    pub fn with_analyzer(config: CoachingConfig, analyzer: RunAnalyzer) -> Self {
        Self {
            config,
            cache: RunCache::new(),
            drift_tracker: CardiacDriftTracker::new(),
            analyzer,
        }
    }

    pub fn config(&self) -> &CoachingConfig {
        &self.config
    }

    pub fn cache(&self) -> &RunCache {
        &self.cache
    }

    pub fn drift_series(&self) -> &[KmDriftData] {
        self.drift_tracker.series()
    }

    /// Start a run now; per-cycle values are ignored until [`CoachingEngine::end_run`]
    pub fn begin_run(
        &mut self,
        preferences: RunnerPreferences,
        runner_name: Option<String>,
        user_id: Option<String>,
    ) -> Uuid {
        self.begin_run_at(preferences, runner_name, user_id, Utc::now())
    }

    pub fn begin_run_at(
        &mut self,
        preferences: RunnerPreferences,
        runner_name: Option<String>,
        user_id: Option<String>,
        started_at: DateTime<Utc>,
    ) -> Uuid {
        self.drift_tracker.reset();
        let run_id = self
            .cache
            .begin_run_at(preferences, runner_name, user_id.clone(), started_at);
        AppLogger::log_run_lifecycle(&run_id.to_string(), "begin", user_id.as_deref());
        run_id
    }

    pub fn end_run(&mut self) {
        if let Some(run_id) = self.cache.run_id() {
            AppLogger::log_run_lifecycle(&run_id.to_string(), "end", self.cache.user_id());
        }
        self.cache.end_run();
        self.drift_tracker.reset();
    }

    /// Run one cycle from local data only
    pub fn run_cycle(&mut self, request: CycleRequest) -> CycleOutcome {
        let started = Instant::now();

        let run_context = self.cache.resolve(RunContext {
            preferences: request.preferences,
            runner_name: request.runner_name,
            user_id: request.user_id,
            run_started_at: request.run_started_at,
        });

        // drift is tracked per run; cycles outside a run see no series
        let drift_series: &[KmDriftData] = if self.cache.is_active() {
            let current_drift = request
                .heart_rate
                .as_ref()
                .and_then(|hr| drift_percent(hr.current_bpm, hr.average_bpm));
            self.drift_tracker
                .observe(request.completed_intervals.len() as u32, current_drift);
            self.drift_tracker.series()
        } else {
            &[]
        };

        let snapshot = build_snapshot(&SnapshotInputs {
            telemetry: &request.telemetry,
            preferences: &run_context.preferences,
            heart_rate: request.heart_rate.as_ref(),
            completed_intervals: &request.completed_intervals,
            drift_series,
            run_started_at: run_context.run_started_at,
            now: request.now,
        });

        let analysis = self.analyzer.analyze(
            &snapshot,
            run_context.preferences.coach_personality,
            run_context.preferences.coach_energy,
        );

        let run_id = self.cache.run_id().map(|id| id.to_string());
        AppLogger::log_risk_signals(run_id.as_deref(), &analysis.result.injury_risk_signals);
        AppLogger::log_analysis_cycle(
            run_id.as_deref(),
            request.trigger,
            &analysis.result,
            started.elapsed().as_millis() as u64,
        );

        CycleOutcome {
            trigger: request.trigger,
            run_context,
            snapshot,
            analysis,
        }
    }

    /// Analyze one cycle from local data only
    pub fn analyze(&mut self, request: CycleRequest) -> RagAnalysisResult {
        self.run_cycle(request).analysis.result
    }

    /// Analyze one cycle, then enrich its text from the collaborators.
    ///
    /// Gathering is bounded by the configured cycle deadline and skipped when
    /// no user is known. The structured fields never depend on the collaborators.
    pub async fn analyze_with_context(
        &mut self,
        request: CycleRequest,
        gatherer: &ContextGatherer,
    ) -> RagAnalysisResult {
        let outcome = self.run_cycle(request);
        let mut result = outcome.analysis.result;

        let Some(user_id) = outcome.run_context.user_id.as_deref() else {
            debug!("No user id for cycle, skipping context gathering");
            return result;
        };

        let query = outcome.analysis.situation.describe();
        let deadline = self.config.context.cycle_deadline();

        match timeout(deadline, gatherer.gather(user_id, &query)).await {
            Ok(context) => augment_with_context(&mut result, &context),
            Err(_) => {
                warn!(
                    deadline_ms = deadline.as_millis() as u64,
                    "Context gathering missed the cycle deadline, using local analysis only"
                );
            }
        }

        result
    }
}
