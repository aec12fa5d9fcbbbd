// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fatigue scoring from elapsed time, trends and current zone

use serde::{Deserialize, Serialize};

use crate::constants::{fatigue, heart_rate};
use crate::models::{FatigueLevel, HeartRateTrend, PaceTrend};

/// Raw fatigue score and its level bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueAssessment {
    /// Unbounded score; can go negative for a recovering runner
    pub score: i32,
    pub level: FatigueLevel,
}

/// Score fatigue and map it to a level
pub fn assess_fatigue(
    elapsed_seconds: f64,
    pace_trend: PaceTrend,
    heart_rate_trend: HeartRateTrend,
    current_zone: Option<u8>,
) -> FatigueAssessment {
    let score = elapsed_points(elapsed_seconds)
        + pace_points(pace_trend)
        + heart_rate_points(heart_rate_trend)
        + zone_points(current_zone);

    FatigueAssessment {
        score,
        level: level_for_score(score),
    }
}

/// Map a raw score to its level band
pub fn level_for_score(score: i32) -> FatigueLevel {
    if score <= fatigue::FRESH_MAX_SCORE {
        FatigueLevel::Fresh
    } else if score <= fatigue::MODERATE_MAX_SCORE {
        FatigueLevel::Moderate
    } else if score <= fatigue::HIGH_MAX_SCORE {
        FatigueLevel::High
    } else {
        FatigueLevel::Critical
    }
}

fn elapsed_points(elapsed_seconds: f64) -> i32 {
    let minutes = elapsed_seconds / 60.0;
    if minutes < fatigue::ELAPSED_BUCKET_1_MINUTES {
        0
    } else if minutes < fatigue::ELAPSED_BUCKET_2_MINUTES {
        1
    } else if minutes < fatigue::ELAPSED_BUCKET_3_MINUTES {
        2
    } else {
        3
    }
}

fn pace_points(trend: PaceTrend) -> i32 {
    match trend {
        PaceTrend::Improving => fatigue::PACE_IMPROVING_POINTS,
        PaceTrend::Stable => 0,
        PaceTrend::Erratic => fatigue::PACE_ERRATIC_POINTS,
        PaceTrend::Declining => fatigue::PACE_DECLINING_POINTS,
    }
}

fn heart_rate_points(trend: HeartRateTrend) -> i32 {
    match trend {
        HeartRateTrend::Recovering => fatigue::HR_RECOVERING_POINTS,
        HeartRateTrend::Stable => 0,
        HeartRateTrend::Rising => fatigue::HR_RISING_POINTS,
        HeartRateTrend::Spiking => fatigue::HR_SPIKING_POINTS,
    }
}

fn zone_points(zone: Option<u8>) -> i32 {
    match zone {
        Some(z) if z >= heart_rate::HIGH_ZONE => fatigue::HIGH_ZONE_POINTS,
        Some(z) if z == heart_rate::TEMPO_ZONE => fatigue::TEMPO_ZONE_POINTS,
        _ => 0,
    }
}
