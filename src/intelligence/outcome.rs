// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strategy outcome assessment

use serde::{Deserialize, Serialize};

use super::situation::SituationContext;
use crate::models::{FatigueLevel, HeartRateTrend, TargetStatus};

/// Situation recorded when a strategy was delivered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub target_status: TargetStatus,
    pub fatigue_level: FatigueLevel,
    pub heart_rate_trend: HeartRateTrend,
    pub zone_too_high: bool,
}

impl From<&SituationContext> for ExecutionContext {
    fn from(context: &SituationContext) -> Self {
        Self {
            target_status: context.target_status,
            fatigue_level: context.fatigue_level,
            heart_rate_trend: context.heart_rate_trend,
            zone_too_high: context.zone_too_high,
        }
    }
}

/// Metrics sampled before or after a strategy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeMetrics {
    pub pace_min_per_km: Option<f64>,
    pub heart_rate: Option<u32>,
    pub zone: Option<u8>,
}

/// Verdict on whether a delivered strategy worked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessAssessment {
    pub was_effective: bool,
    /// 0.0 - 1.0
    pub score: f64,
    pub reason: String,
}

/// Compare metrics before and after a strategy against the situation it addressed
pub fn assess_effectiveness(
    context: &ExecutionContext,
    before: &OutcomeMetrics,
    after: &OutcomeMetrics,
) -> EffectivenessAssessment {
    let mut score = 0.5;
    let mut was_effective = false;
    let mut reasons = Vec::new();

    if let (Some(pace_before), Some(pace_after)) = (before.pace_min_per_km, after.pace_min_per_km) {
        if pace_before > 0.0 && pace_after > 0.0 {
            let change = pace_after - pace_before;
            if context.target_status.is_behind() {
                if change < -0.05 {
                    score += 0.3;
                    reasons.push("Pace improved");
                    was_effective = true;
                }
            } else if context.fatigue_level.is_elevated() && change.abs() < 0.1 {
                score += 0.2;
                reasons.push("Pace stabilized during recovery");
                was_effective = true;
            }
        }
    }

    if let (Some(hr_before), Some(hr_after)) = (before.heart_rate, after.heart_rate) {
        let rising = matches!(context.heart_rate_trend, HeartRateTrend::Rising | HeartRateTrend::Spiking);
        if hr_before > 0 && hr_after > 0 && rising && i64::from(hr_after) - i64::from(hr_before) < 3 {
            score += 0.2;
            reasons.push("HR stabilized");
            was_effective = true;
        }
    }

    if context.zone_too_high {
        if let (Some(zone_before), Some(zone_after)) = (before.zone, after.zone) {
            if zone_after < zone_before {
                score += 0.2;
                reasons.push("Moved to lower zone");
                was_effective = true;
            }
        }
    }

    let reason = if reasons.is_empty() {
        "No significant improvement detected".to_string()
    } else {
        reasons.join("; ")
    };

    EffectivenessAssessment {
        was_effective,
        score: f64::min(1.0, f64::max(0.0, score)),
        reason,
    }
}
