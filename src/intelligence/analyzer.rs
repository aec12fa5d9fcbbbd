// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-cycle analysis pipeline over a finished snapshot

use tracing::debug;

use super::report::{overall_recommendation, render_sections};
use super::risk::{detect_risks, risk_messages, RiskSignal};
use super::situation::{
    fallback_strategies, select_best_strategy, CoachingStrategy, DistanceCategory, RunnerLevel,
    SituationContext,
};
use super::strategy::{generate_strategy, AdaptiveStrategy, StrategyInputs};
use super::target_status::{evaluate_target_status, TargetProgress};
use crate::models::{CoachEnergy, CoachPersonality, PerformanceSnapshot, RagAnalysisResult, TargetStatus};

/// Everything one cycle concluded, before flattening into the result shape
#[derive(Debug, Clone)]
pub struct CycleAnalysis {
    pub target_status: TargetStatus,
    pub risks: Vec<RiskSignal>,
    pub strategy: AdaptiveStrategy,
    pub situation: SituationContext,
    pub distance_category: DistanceCategory,
    pub runner_level: RunnerLevel,
    /// Best matching entry from the strategy library, if any scored
    pub recommended_strategy: Option<CoachingStrategy>,
    pub result: RagAnalysisResult,
}

/// Runs the classifiers, risk rules and strategy generator for one snapshot
#[derive(Debug, Clone, Default)]
pub struct RunAnalyzer {
    library: Vec<CoachingStrategy>,
}

impl RunAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer that also scores the given library strategies alongside the fallbacks
    pub fn with_library(library: Vec<CoachingStrategy>) -> Self {
        Self { library }
    }

    pub fn analyze(
        &self,
        snapshot: &PerformanceSnapshot,
        personality: CoachPersonality,
        energy: CoachEnergy,
    ) -> CycleAnalysis {
        let target_status = evaluate_target_status(&TargetProgress::from(snapshot));
        let risks = detect_risks(snapshot, &target_status);
        let strategy = generate_strategy(&StrategyInputs::from_snapshot(snapshot, target_status));
        let situation = SituationContext::derive(snapshot, target_status, risks.len(), personality, energy);

        debug!(
            target_status = target_status.as_str(),
            deviation = target_status.deviation_percent(),
            pace_trend = snapshot.pace_trend.as_str(),
            hr_trend = snapshot.heart_rate_trend.as_str(),
            fatigue = snapshot.fatigue_level.as_str(),
            risks = risks.len(),
            template = strategy.template.headline(),
            "Classified snapshot"
        );

        let mut candidates = self.library.clone();
        candidates.extend(fallback_strategies(&situation));
        let recommended_strategy = select_best_strategy(&situation, &candidates).cloned();

        let sections = render_sections(snapshot, &target_status);
        let result = RagAnalysisResult {
            target_status,
            performance_summary: sections.performance_summary,
            heart_zone_analysis: sections.heart_zone_analysis,
            interval_trends: sections.interval_trends,
            hr_variation_analysis: sections.hr_variation_analysis,
            adaptive_strategy: strategy.text.clone(),
            injury_risk_signals: risk_messages(&risks),
            overall_recommendation: overall_recommendation(&strategy, &risks),
            situation_tags: situation.tags.clone(),
        };

        CycleAnalysis {
            target_status,
            risks,
            strategy,
            situation,
            distance_category: DistanceCategory::from_target_meters(snapshot.target_distance_meters),
            runner_level: RunnerLevel::estimate(snapshot),
            recommended_strategy,
            result,
        }
    }
}

/// Analyze a snapshot with only the built-in strategies
pub fn analyze_snapshot(
    snapshot: &PerformanceSnapshot,
    personality: CoachPersonality,
    energy: CoachEnergy,
) -> RagAnalysisResult {
    RunAnalyzer::new().analyze(snapshot, personality, energy).result
}
