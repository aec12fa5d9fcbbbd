// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Situation context and built-in strategy library
//!
//! Derives boolean situation flags and filter tags from a snapshot, classifies
//! the run by distance and the runner by level, and picks a coaching strategy
//! from the built-in library when no external strategy store is available.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::situation;
use crate::models::{
    CoachEnergy, CoachPersonality, FatigueLevel, HeartRateTrend, PaceTrend, PerformanceSnapshot,
    TargetStatus,
};

/// Derived description of the current situation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationContext {
    pub pace_trend: PaceTrend,
    pub heart_rate_trend: HeartRateTrend,
    pub fatigue_level: FatigueLevel,
    pub target_status: TargetStatus,

    /// Pace declining while heart rate rises or spikes
    pub cardiac_drift: bool,
    /// Zone 4 + zone 5 occupancy above 25%
    pub zone_too_high: bool,
    pub injury_risk: bool,
    /// Pace declining with stable heart rate, a mechanical rather than cardiac cause
    pub form_breakdown: bool,
    pub push_possible: bool,
    pub recovery_needed: bool,

    pub personality: CoachPersonality,
    pub energy: CoachEnergy,

    pub tags: Vec<String>,
}

impl SituationContext {
    /// Derive the situation from a snapshot and the cycle's classification
    pub fn derive(
        snapshot: &PerformanceSnapshot,
        target_status: TargetStatus,
        risk_signal_count: usize,
        personality: CoachPersonality,
        energy: CoachEnergy,
    ) -> Self {
        let cardiac_drift = snapshot.pace_trend == PaceTrend::Declining
            && matches!(snapshot.heart_rate_trend, HeartRateTrend::Rising | HeartRateTrend::Spiking);

        let zone_too_high =
            snapshot.zone_percent(4) + snapshot.zone_percent(5) > situation::HIGH_ZONES_OCCUPANCY_PERCENT;

        let form_breakdown = snapshot.pace_trend == PaceTrend::Declining
            && snapshot.heart_rate_trend == HeartRateTrend::Stable;

        let has_headroom = match (snapshot.current_heart_rate, snapshot.max_heart_rate) {
            (Some(current), Some(max)) if max > 0 => {
                f64::from(current) / f64::from(max) < situation::PUSH_HEADROOM_FRACTION
            }
            _ => true,
        };
        let push_possible = snapshot.fatigue_level == FatigueLevel::Fresh
            && snapshot.heart_rate_trend == HeartRateTrend::Stable
            && has_headroom;

        let recovery_needed = snapshot.fatigue_level.is_elevated() || zone_too_high || cardiac_drift;

        let mut context = Self {
            pace_trend: snapshot.pace_trend,
            heart_rate_trend: snapshot.heart_rate_trend,
            fatigue_level: snapshot.fatigue_level,
            target_status,
            cardiac_drift,
            zone_too_high,
            injury_risk: risk_signal_count > 0,
            form_breakdown,
            push_possible,
            recovery_needed,
            personality,
            energy,
            tags: Vec::new(),
        };
        context.tags = context.build_tags();
        context
    }

    fn build_tags(&self) -> Vec<String> {
        let mut tags = Vec::new();

        match self.pace_trend {
            PaceTrend::Declining => tags.push("pace_decline"),
            PaceTrend::Stable => tags.push("pace_stable"),
            PaceTrend::Improving => tags.push("pace_improving"),
            PaceTrend::Erratic => {}
        }
        match self.heart_rate_trend {
            HeartRateTrend::Rising => tags.push("hr_rising"),
            HeartRateTrend::Stable => tags.push("hr_stable"),
            HeartRateTrend::Spiking => tags.push("hr_spiking"),
            HeartRateTrend::Recovering => {}
        }
        if self.target_status.is_ahead() {
            tags.push("target_ahead");
        } else if self.target_status.is_behind() {
            tags.push("target_behind");
        } else {
            tags.push("target_on_track");
        }
        match self.fatigue_level {
            FatigueLevel::Fresh => tags.push("fatigue_low"),
            FatigueLevel::Moderate => tags.push("fatigue_moderate"),
            FatigueLevel::High | FatigueLevel::Critical => tags.push("fatigue_high"),
        }

        let flags = [
            (self.cardiac_drift, "cardiac_drift"),
            (self.zone_too_high, "zone_too_high"),
            (self.injury_risk, "injury_risk"),
            (self.form_breakdown, "form_breakdown"),
            (self.push_possible, "push_possible"),
            (self.recovery_needed, "recovery_needed"),
        ];
        tags.extend(flags.iter().filter(|(on, _)| *on).map(|(_, tag)| *tag));

        tags.into_iter().map(str::to_string).collect()
    }

    /// One-line description used as a lookup query for context collaborators
    pub fn describe(&self) -> String {
        format!(
            "pace {}, heart rate {}, fatigue {}, target {}",
            self.pace_trend,
            self.heart_rate_trend,
            self.fatigue_level,
            self.target_status.as_str()
        )
    }
}

/// Race distance category derived from target distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceCategory {
    Casual,
    #[serde(rename = "5k")]
    FiveK,
    #[serde(rename = "10k")]
    TenK,
    Half,
    Full,
}

impl DistanceCategory {
    pub fn from_target_meters(target_distance_meters: f64) -> Self {
        let km = target_distance_meters / 1000.0;
        if km < 3.0 {
            Self::Casual
        } else if km <= 5.5 {
            Self::FiveK
        } else if km <= 11.0 {
            Self::TenK
        } else if km <= 22.0 {
            Self::Half
        } else {
            Self::Full
        }
    }
}

/// Runner experience estimated from pacing control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl RunnerLevel {
    pub fn estimate(snapshot: &PerformanceSnapshot) -> Self {
        let deviation = snapshot.pace_deviation_percent.abs();

        if snapshot.pace_trend == PaceTrend::Stable
            && snapshot.heart_rate_trend == HeartRateTrend::Stable
            && deviation < situation::ADVANCED_MAX_PACE_DEVIATION
        {
            return Self::Advanced;
        }
        if snapshot.pace_trend == PaceTrend::Erratic
            || snapshot.heart_rate_trend == HeartRateTrend::Spiking
            || deviation > situation::BEGINNER_MIN_PACE_DEVIATION
        {
            return Self::Beginner;
        }
        Self::Intermediate
    }
}

/// Where a coaching strategy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySource {
    Library,
    Fallback,
}

/// A named coaching strategy with its effectiveness history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingStrategy {
    pub id: String,
    pub name: String,
    pub text: String,
    pub tags: Vec<String>,
    pub success_rate: f64,
    pub similarity_score: f64,
    pub source: StrategySource,
}

impl CoachingStrategy {
    fn fallback(id: &str, name: &str, text: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            text: text.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            success_rate: 0.0,
            similarity_score: 0.0,
            source: StrategySource::Fallback,
        }
    }
}

/// Built-in strategies matching the situation flags
pub fn fallback_strategies(context: &SituationContext) -> Vec<CoachingStrategy> {
    let mut strategies = Vec::new();

    if context.cardiac_drift {
        strategies.push(CoachingStrategy::fallback(
            "fallback-1",
            "Cardiac Drift Management",
            "Classic drift pattern. Ease 15 sec/km for the next 500m. Focus on efficiency, not speed.",
            &["cardiac_drift", "hr_rising", "pace_decline"],
        ));
    }
    if context.pace_trend == PaceTrend::Declining {
        strategies.push(CoachingStrategy::fallback(
            "fallback-2",
            "Cadence Reset",
            "Quick feet, light steps. Shorten your stride and find your rhythm.",
            &["pace_decline", "form_breakdown"],
        ));
    }
    if context.fatigue_level.is_elevated() {
        strategies.push(CoachingStrategy::fallback(
            "fallback-3",
            "Active Recovery",
            "Next 500m easy in zone 2. Shake out your arms and breathe deep.",
            &["fatigue_high", "recovery_needed"],
        ));
    }
    if context.injury_risk {
        strategies.push(CoachingStrategy::fallback(
            "fallback-4",
            "Injury Prevention",
            "Warning signs detected. Ease the pace now, shorten your stride and land softly.",
            &["injury_risk"],
        ));
    }
    if strategies.is_empty() {
        strategies.push(CoachingStrategy::fallback(
            "fallback-default",
            "Maintain Pace",
            "Hold your current pace. Steady breathing. You're doing well.",
            &["pace_stable"],
        ));
    }

    strategies
}

/// Score strategies against the situation and return the best one
pub fn select_best_strategy<'a>(
    context: &SituationContext,
    strategies: &'a [CoachingStrategy],
) -> Option<&'a CoachingStrategy> {
    let situation_tags: HashSet<&str> = context.tags.iter().map(String::as_str).collect();

    let score = |strategy: &CoachingStrategy| {
        let shared = strategy
            .tags
            .iter()
            .filter(|t| situation_tags.contains(t.as_str()))
            .count() as f64;
        let source_bonus = match strategy.source {
            StrategySource::Library => 0.2,
            StrategySource::Fallback => 0.1,
        };
        strategy.success_rate * 0.4 + strategy.similarity_score * 0.3 + shared * 0.1 + source_bonus
    };

    // ties keep the earliest strategy
    strategies.iter().fold(None, |best: Option<(&CoachingStrategy, f64)>, candidate| {
        let candidate_score = score(candidate);
        match best {
            Some((_, best_score)) if best_score >= candidate_score => best,
            _ => Some((candidate, candidate_score)),
        }
    })
    .map(|(strategy, _)| strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::risk::tests::quiet_snapshot;

    fn derive(snapshot: &PerformanceSnapshot, risks: usize) -> SituationContext {
        SituationContext::derive(
            snapshot,
            TargetStatus::on_track(),
            risks,
            CoachPersonality::Strategist,
            CoachEnergy::Medium,
        )
    }

    #[test]
    fn test_quiet_run_can_push() {
        let context = derive(&quiet_snapshot(), 0);
        assert!(context.push_possible);
        assert!(!context.recovery_needed);
        assert_eq!(
            context.tags,
            vec!["pace_stable", "hr_stable", "target_on_track", "fatigue_low", "push_possible"]
        );
    }

    #[test]
    fn test_cardiac_drift_requires_recovery() {
        let mut snapshot = quiet_snapshot();
        snapshot.pace_trend = PaceTrend::Declining;
        snapshot.heart_rate_trend = HeartRateTrend::Spiking;
        let context = derive(&snapshot, 1);
        assert!(context.cardiac_drift);
        assert!(context.recovery_needed);
        assert!(context.injury_risk);
        assert!(!context.form_breakdown);
        assert!(context.tags.contains(&"cardiac_drift".to_string()));
    }

    #[test]
    fn test_form_breakdown_and_high_zones() {
        let mut snapshot = quiet_snapshot();
        snapshot.pace_trend = PaceTrend::Declining;
        snapshot.zone_percentages.insert(4, 15.0);
        snapshot.zone_percentages.insert(5, 12.0);
        let context = derive(&snapshot, 0);
        assert!(context.form_breakdown);
        assert!(context.zone_too_high);
        assert!(context.recovery_needed);
    }

    #[test]
    fn test_no_headroom_blocks_push() {
        let mut snapshot = quiet_snapshot();
        snapshot.current_heart_rate = Some(170);
        snapshot.max_heart_rate = Some(190);
        assert!(!derive(&snapshot, 0).push_possible);
    }

    #[test]
    fn test_distance_categories() {
        assert_eq!(DistanceCategory::from_target_meters(2000.0), DistanceCategory::Casual);
        assert_eq!(DistanceCategory::from_target_meters(5000.0), DistanceCategory::FiveK);
        assert_eq!(DistanceCategory::from_target_meters(10000.0), DistanceCategory::TenK);
        assert_eq!(DistanceCategory::from_target_meters(21097.0), DistanceCategory::Half);
        assert_eq!(DistanceCategory::from_target_meters(42195.0), DistanceCategory::Full);
    }

    #[test]
    fn test_runner_level() {
        let mut snapshot = quiet_snapshot();
        assert_eq!(RunnerLevel::estimate(&snapshot), RunnerLevel::Advanced);
        snapshot.pace_deviation_percent = 8.0;
        assert_eq!(RunnerLevel::estimate(&snapshot), RunnerLevel::Intermediate);
        snapshot.pace_trend = PaceTrend::Erratic;
        assert_eq!(RunnerLevel::estimate(&snapshot), RunnerLevel::Beginner);
    }

    #[test]
    fn test_fallback_default_when_nothing_flagged() {
        let context = derive(&quiet_snapshot(), 0);
        let strategies = fallback_strategies(&context);
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].id, "fallback-default");
    }

    #[test]
    fn test_best_strategy_prefers_shared_tags() {
        let mut snapshot = quiet_snapshot();
        snapshot.pace_trend = PaceTrend::Declining;
        snapshot.heart_rate_trend = HeartRateTrend::Rising;
        let context = derive(&snapshot, 0);
        let strategies = fallback_strategies(&context);
        let best = select_best_strategy(&context, &strategies).unwrap();
        assert_eq!(best.name, "Cardiac Drift Management");
    }

    #[test]
    fn test_best_strategy_empty() {
        let context = derive(&quiet_snapshot(), 0);
        assert!(select_best_strategy(&context, &[]).is_none());
    }
}
