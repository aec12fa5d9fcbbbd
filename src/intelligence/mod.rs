// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Real-time classification of a run in progress.
//!
//! This module includes:
//! - Snapshot construction from live telemetry
//! - Pace, heart-rate and fatigue classifiers
//! - Target progress evaluation and cardiac drift tracking
//! - Risk rules and adaptive strategy generation
//! - Situation tagging, strategy library scoring and outcome assessment
//! - Free-text report sections
//!
//! Every function here is synchronous and deterministic for a given input.

pub mod analyzer;
pub mod cardiac_drift;
pub mod fatigue;
pub mod outcome;
pub mod report;
pub mod risk;
pub mod situation;
pub mod snapshot;
pub mod strategy;
pub mod target_status;
pub mod trends;

pub use analyzer::{analyze_snapshot, CycleAnalysis, RunAnalyzer};
pub use cardiac_drift::{drift_percent, is_fatigue_signal, CardiacDriftTracker};
pub use fatigue::{assess_fatigue, FatigueAssessment};
pub use outcome::{assess_effectiveness, EffectivenessAssessment, ExecutionContext, OutcomeMetrics};
pub use risk::{detect_risks, RiskSignal};
pub use situation::{
    fallback_strategies, select_best_strategy, CoachingStrategy, DistanceCategory, RunnerLevel,
    SituationContext, StrategySource,
};
pub use snapshot::{build_snapshot, SnapshotInputs};
pub use strategy::{generate_strategy, AdaptiveStrategy, StrategyInputs, StrategyTemplate};
pub use target_status::{evaluate_target_status, TargetProgress};
pub use trends::{classify_heart_rate_trend, classify_pace_trend};
