// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Adaptive strategy generation
//!
//! Maps target status, fatigue and zone to one of five tactical templates,
//! adds zone/fatigue-conditioned phrasing and closes with a trailer keyed by
//! pace trend. Output depends only on the inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{heart_rate, strategy};
use crate::models::{FatigueLevel, PaceTrend, PerformanceSnapshot, TargetStatus};

/// Base tactical template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTemplate {
    Maintain,
    Adjust,
    UrgentRecovery,
    BankTime,
    Conserve,
}

impl StrategyTemplate {
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Maintain => "MAINTAIN",
            Self::Adjust => "ADJUST",
            Self::UrgentRecovery => "URGENT RECOVERY",
            Self::BankTime => "BANK TIME",
            Self::Conserve => "CONSERVE",
        }
    }
}

impl fmt::Display for StrategyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

/// Inputs to the strategy generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyInputs {
    pub target_status: TargetStatus,
    pub fatigue_level: FatigueLevel,
    pub current_zone: Option<u8>,
    pub pace_trend: PaceTrend,
    pub target_pace_min_per_km: f64,
}

impl StrategyInputs {
    pub fn from_snapshot(snapshot: &PerformanceSnapshot, target_status: TargetStatus) -> Self {
        Self {
            target_status,
            fatigue_level: snapshot.fatigue_level,
            current_zone: snapshot.current_zone,
            pace_trend: snapshot.pace_trend,
            target_pace_min_per_km: snapshot.target_pace_min_per_km,
        }
    }

    fn high_zone(&self) -> Option<u8> {
        self.current_zone.filter(|z| *z >= heart_rate::HIGH_ZONE)
    }
}

/// A generated tactical recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveStrategy {
    pub template: StrategyTemplate,
    pub text: String,
}

/// Pick the template for the current situation
pub fn select_template(inputs: &StrategyInputs) -> StrategyTemplate {
    let strained = inputs.fatigue_level.is_elevated() || inputs.high_zone().is_some();

    match inputs.target_status {
        TargetStatus::OnTrack { .. } => StrategyTemplate::Maintain,
        TargetStatus::SlightlyBehind { .. } => {
            if inputs.fatigue_level == FatigueLevel::Critical {
                StrategyTemplate::UrgentRecovery
            } else {
                StrategyTemplate::Adjust
            }
        }
        TargetStatus::WayBehind { .. } => {
            if strained {
                StrategyTemplate::UrgentRecovery
            } else {
                StrategyTemplate::Adjust
            }
        }
        TargetStatus::SlightlyAhead { .. } => {
            if strained {
                StrategyTemplate::Conserve
            } else {
                StrategyTemplate::BankTime
            }
        }
        TargetStatus::WayAhead { .. } => StrategyTemplate::Conserve,
    }
}

/// Seconds per kilometer that would close the current deviation
pub fn corrective_seconds_per_km(deviation_percent: f64, target_pace_min_per_km: f64) -> f64 {
    if target_pace_min_per_km <= 0.0 {
        return strategy::DEFAULT_CORRECTION_SECONDS_PER_KM;
    }
    (deviation_percent / 100.0 * target_pace_min_per_km * 60.0).round()
}

/// Generate the strategy text for the next stretch
pub fn generate_strategy(inputs: &StrategyInputs) -> AdaptiveStrategy {
    let template = select_template(inputs);
    let deviation = inputs.target_status.deviation_percent();
    let seconds = corrective_seconds_per_km(deviation, inputs.target_pace_min_per_km);

    let body = match template {
        StrategyTemplate::Maintain => maintain_text(inputs),
        StrategyTemplate::Adjust => adjust_text(inputs, deviation, seconds),
        StrategyTemplate::UrgentRecovery => urgent_recovery_text(inputs),
        StrategyTemplate::BankTime => bank_time_text(inputs, deviation),
        StrategyTemplate::Conserve => conserve_text(inputs, deviation, seconds),
    };

    AdaptiveStrategy {
        template,
        text: format!("{}: {}{}", template.headline(), body, interval_trailer(inputs.pace_trend)),
    }
}

fn maintain_text(inputs: &StrategyInputs) -> String {
    if let Some(zone) = inputs.high_zone() {
        format!("You're on target, but heart rate is in zone {zone}. Hold the pace and relax your breathing.")
    } else if inputs.fatigue_level.is_elevated() {
        "On target. Fatigue is building, so keep the effort smooth and don't surge.".to_string()
    } else {
        "Right on target. Hold this pace and stay relaxed.".to_string()
    }
}

fn adjust_text(inputs: &StrategyInputs, deviation: f64, seconds: f64) -> String {
    let mut text = format!(
        "{deviation:.0}% behind target. Pick up about {seconds:.0} sec/km over the next kilometer."
    );
    match inputs.current_zone {
        Some(zone) if zone < heart_rate::HIGH_ZONE => {
            text.push_str(&format!(" You have heart-rate room in zone {zone}."));
        }
        _ => {
            if inputs.fatigue_level == FatigueLevel::Moderate {
                text.push_str(" Build gradually rather than surging.");
            }
        }
    }
    text
}

fn urgent_recovery_text(inputs: &StrategyInputs) -> String {
    let mut text = "Ease off now.".to_string();
    if let Some(zone) = inputs.high_zone() {
        text.push_str(&format!(" Bring your heart rate down out of zone {zone} before pushing again."));
    } else if inputs.fatigue_level == FatigueLevel::Critical {
        text.push_str(" Fatigue is critical: take 60 seconds easy or walk.");
    } else {
        text.push_str(" Slow down for the next 500m and reset your breathing.");
    }
    text
}

fn bank_time_text(inputs: &StrategyInputs, deviation: f64) -> String {
    let fresh_and_low = inputs.fatigue_level == FatigueLevel::Fresh && inputs.high_zone().is_none();
    if fresh_and_low {
        format!("{deviation:.0}% ahead of target. You're fresh, so hold this pace and bank the time.")
    } else {
        format!("{deviation:.0}% ahead of target. Hold steady and bank the time without pushing harder.")
    }
}

fn conserve_text(inputs: &StrategyInputs, deviation: f64, seconds: f64) -> String {
    if let Some(zone) = inputs.high_zone() {
        format!(
            "{deviation:.0}% ahead of target with heart rate in zone {zone}. Ease back about {seconds:.0} sec/km to save energy for the finish."
        )
    } else if inputs.fatigue_level.is_elevated() {
        format!("{deviation:.0}% ahead of target. Fatigue is rising, so ease back and protect your lead.")
    } else {
        format!("{deviation:.0}% ahead of target. Ease back slightly and save energy for the finish.")
    }
}

fn interval_trailer(pace_trend: PaceTrend) -> &'static str {
    match pace_trend {
        PaceTrend::Improving => " Splits are getting faster; keep the rhythm.",
        PaceTrend::Stable => " Splits are consistent; lock in this cadence.",
        PaceTrend::Declining => " Splits are slowing; shorten your stride and lift cadence.",
        PaceTrend::Erratic => " Splits are uneven; settle into an even effort.",
    }
}
