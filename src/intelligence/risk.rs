// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rule-based injury and overexertion risk detection

use serde::{Deserialize, Serialize};

use crate::constants::{heart_rate, risk};
use crate::models::{FatigueLevel, HeartRateTrend, PaceTrend, PerformanceSnapshot, TargetStatus};

/// A risk rule that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSignal {
    DeclineWithRisingHeartRate,
    ErraticUnderHighFatigue,
    ExtendedHighZone,
    HeartRateSpike,
    CriticalFatigue,
    ChasingPaceInHighZone,
}

impl RiskSignal {
    pub fn message(&self) -> &'static str {
        match self {
            Self::DeclineWithRisingHeartRate => {
                "Pace declining while heart rate rising - possible cardiac drift"
            }
            Self::ErraticUnderHighFatigue => "Erratic pacing under high fatigue - form breakdown risk",
            Self::ExtendedHighZone => "Extended high-zone effort - over 20% of the run in zone 5",
            Self::HeartRateSpike => "Heart rate spiking near maximum",
            Self::CriticalFatigue => "Critical fatigue level - injury risk elevated",
            Self::ChasingPaceInHighZone => {
                "Far behind target while in a high heart-rate zone - do not chase the pace"
            }
        }
    }
}

/// Evaluate every rule in fixed order; all that hold are returned
pub fn detect_risks(snapshot: &PerformanceSnapshot, target_status: &TargetStatus) -> Vec<RiskSignal> {
    let mut signals = Vec::new();

    if snapshot.pace_trend == PaceTrend::Declining && snapshot.heart_rate_trend == HeartRateTrend::Rising {
        signals.push(RiskSignal::DeclineWithRisingHeartRate);
    }
    if snapshot.pace_trend == PaceTrend::Erratic && snapshot.fatigue_level == FatigueLevel::High {
        signals.push(RiskSignal::ErraticUnderHighFatigue);
    }
    if snapshot.zone_percent(heart_rate::TOP_ZONE) > risk::TOP_ZONE_OCCUPANCY_PERCENT {
        signals.push(RiskSignal::ExtendedHighZone);
    }
    if snapshot.heart_rate_trend == HeartRateTrend::Spiking {
        signals.push(RiskSignal::HeartRateSpike);
    }
    if snapshot.fatigue_level == FatigueLevel::Critical {
        signals.push(RiskSignal::CriticalFatigue);
    }
    if matches!(target_status, TargetStatus::WayBehind { .. })
        && snapshot.current_zone.is_some_and(|z| z >= heart_rate::HIGH_ZONE)
    {
        signals.push(RiskSignal::ChasingPaceInHighZone);
    }

    signals
}

/// Risk signals as their human-readable messages
pub fn risk_messages(signals: &[RiskSignal]) -> Vec<String> {
    signals.iter().map(|s| s.message().to_string()).collect()
}
