// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Value shapes exchanged with the coaching engine: live telemetry in, one
//! immutable [`PerformanceSnapshot`] per analysis cycle, and one
//! [`RagAnalysisResult`] out.
//!
//! ## Design Principles
//!
//! - **Explicit absence**: every heart-rate-derived value is an `Option`; all of
//!   them may be missing at once and nothing downstream fails because of it
//! - **Immutable snapshots**: a snapshot is built once per cycle and only read
//! - **Serializable**: all models support JSON for the downstream feedback generator
//!
//! ## Units
//!
//! Paces are minutes per kilometer, distances are meters, durations are seconds,
//! heart rates are beats per minute, zones are integers 1-5.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::drift;

/// Coaching voice selected by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoachPersonality {
    #[default]
    Strategist,
    Pacer,
    Finisher,
}

/// Energy level of the coaching voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoachEnergy {
    Low,
    #[default]
    Medium,
    High,
}

/// Runner preferences relevant to a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerPreferences {
    /// Target pace in minutes per kilometer
    pub target_pace_min_per_km: f64,
    /// Goal distance configured by the runner (not used for target distance, see
    /// [`crate::constants::run::NOMINAL_RUN_DURATION_MINUTES`])
    #[serde(default)]
    pub goal_distance_km: Option<f64>,
    #[serde(default)]
    pub coach_personality: CoachPersonality,
    #[serde(default)]
    pub coach_energy: CoachEnergy,
}

impl Default for RunnerPreferences {
    fn default() -> Self {
        Self {
            target_pace_min_per_km: 6.0,
            goal_distance_km: None,
            coach_personality: CoachPersonality::default(),
            coach_energy: CoachEnergy::default(),
        }
    }
}

/// One reading from the telemetry source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub distance_meters: f64,
    pub pace_min_per_km: f64,
    pub timestamp: DateTime<Utc>,
}

/// Live heart-rate and zone data; every field may be absent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeartRateData {
    #[serde(default)]
    pub current_bpm: Option<u32>,
    #[serde(default)]
    pub average_bpm: Option<u32>,
    #[serde(default)]
    pub max_bpm: Option<u32>,
    /// Current zone, 1-5
    #[serde(default)]
    pub current_zone: Option<u8>,
    /// Percent of the run spent in each zone
    #[serde(default)]
    pub zone_percentages: BTreeMap<u8, f64>,
    /// Average pace (min/km) while in each zone
    #[serde(default)]
    pub zone_average_pace: BTreeMap<u8, f64>,
}

/// A completed kilometer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSnapshot {
    /// 1-based kilometer index
    pub kilometer: u32,
    pub pace_min_per_km: f64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub average_heart_rate: Option<u32>,
    #[serde(default)]
    pub zone: Option<u8>,
}

/// Direction of pace across completed intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceTrend {
    Improving,
    Stable,
    Declining,
    Erratic,
}

impl PaceTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
            Self::Erratic => "erratic",
        }
    }
}

impl fmt::Display for PaceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of heart rate relative to the run average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartRateTrend {
    Stable,
    Rising,
    Spiking,
    Recovering,
}

impl HeartRateTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Rising => "rising",
            Self::Spiking => "spiking",
            Self::Recovering => "recovering",
        }
    }
}

impl fmt::Display for HeartRateTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatigue level bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatigueLevel {
    Fresh,
    Moderate,
    High,
    Critical,
}

impl FatigueLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// High or critical
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for FatigueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress toward the pacing goal with a non-negative deviation magnitude (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    OnTrack { deviation_percent: f64 },
    SlightlyBehind { deviation_percent: f64 },
    WayBehind { deviation_percent: f64 },
    SlightlyAhead { deviation_percent: f64 },
    WayAhead { deviation_percent: f64 },
}

impl TargetStatus {
    /// On track with zero deviation
    pub fn on_track() -> Self {
        Self::OnTrack {
            deviation_percent: 0.0,
        }
    }

    pub fn deviation_percent(&self) -> f64 {
        match *self {
            Self::OnTrack { deviation_percent }
            | Self::SlightlyBehind { deviation_percent }
            | Self::WayBehind { deviation_percent }
            | Self::SlightlyAhead { deviation_percent }
            | Self::WayAhead { deviation_percent } => deviation_percent,
        }
    }

    pub fn is_on_track(&self) -> bool {
        matches!(self, Self::OnTrack { .. })
    }

    pub fn is_behind(&self) -> bool {
        matches!(self, Self::SlightlyBehind { .. } | Self::WayBehind { .. })
    }

    pub fn is_ahead(&self) -> bool {
        matches!(self, Self::SlightlyAhead { .. } | Self::WayAhead { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack { .. } => "on_track",
            Self::SlightlyBehind { .. } => "slightly_behind",
            Self::WayBehind { .. } => "way_behind",
            Self::SlightlyAhead { .. } => "slightly_ahead",
            Self::WayAhead { .. } => "way_ahead",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}%)", self.as_str(), self.deviation_percent())
    }
}

/// Label for one kilometer of cardiac drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftLabel {
    Stable,
    Rising,
    HiddenFatigue,
}

impl DriftLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Rising => "rising",
            Self::HiddenFatigue => "hidden fatigue",
        }
    }
}

/// Drift percentage at the start and end of one kilometer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KmDriftData {
    pub kilometer: u32,
    pub drift_at_start: f64,
    pub drift_at_end: f64,
}

impl KmDriftData {
    /// Drift change across the kilometer in percentage points
    pub fn change(&self) -> f64 {
        self.drift_at_end - self.drift_at_start
    }

    pub fn label(&self) -> DriftLabel {
        let change = self.change();
        if change > drift::HIDDEN_FATIGUE_CHANGE {
            DriftLabel::HiddenFatigue
        } else if change > drift::RISING_CHANGE {
            DriftLabel::Rising
        } else {
            DriftLabel::Stable
        }
    }
}

/// Everything the classifiers know about the run at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub current_pace_min_per_km: f64,
    pub target_pace_min_per_km: f64,
    pub current_distance_meters: f64,
    pub target_distance_meters: f64,
    pub elapsed_seconds: f64,
    pub target_time_seconds: f64,

    pub current_heart_rate: Option<u32>,
    pub average_heart_rate: Option<u32>,
    pub max_heart_rate: Option<u32>,
    pub current_zone: Option<u8>,
    pub zone_percentages: BTreeMap<u8, f64>,
    pub zone_average_pace: BTreeMap<u8, f64>,

    pub completed_intervals: Vec<IntervalSnapshot>,
    /// 1-based number of the interval in progress
    pub current_interval: u32,

    pub pace_deviation_percent: f64,
    pub estimated_finish_seconds: Option<f64>,
    pub projected_distance_meters: f64,

    pub pace_trend: PaceTrend,
    pub heart_rate_trend: HeartRateTrend,
    pub fatigue_score: i32,
    pub fatigue_level: FatigueLevel,

    pub drift_series: Vec<KmDriftData>,
    pub current_drift_percent: Option<f64>,
}

impl PerformanceSnapshot {
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed_seconds / crate::constants::run::SECONDS_PER_MINUTE
    }

    pub fn current_distance_km(&self) -> f64 {
        self.current_distance_meters / crate::constants::run::METERS_PER_KILOMETER
    }

    pub fn target_distance_km(&self) -> f64 {
        self.target_distance_meters / crate::constants::run::METERS_PER_KILOMETER
    }

    /// Occupancy percent of a zone, zero when unknown
    pub fn zone_percent(&self, zone: u8) -> f64 {
        self.zone_percentages.get(&zone).copied().unwrap_or(0.0)
    }
}

/// What caused an analysis cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTrigger {
    Start,
    Interval,
    Time,
    End,
}

impl fmt::Display for AnalysisTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::Interval => "interval",
            Self::Time => "time",
            Self::End => "end",
        };
        f.write_str(label)
    }
}

/// Aggregated output of one analysis cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnalysisResult {
    pub target_status: TargetStatus,
    pub performance_summary: String,
    pub heart_zone_analysis: String,
    pub interval_trends: String,
    pub hr_variation_analysis: String,
    pub adaptive_strategy: String,
    pub injury_risk_signals: Vec<String>,
    pub overall_recommendation: String,
    pub situation_tags: Vec<String>,
}

/// Read-only summary from the historical aggregate store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAggregate {
    pub total_runs: u32,
    pub average_distance_km: f64,
    pub average_pace_min_per_km: f64,
    pub best_pace_min_per_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_status_serializes_with_tag() {
        let status = TargetStatus::WayBehind {
            deviation_percent: 18.5,
        };
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["status"], "way_behind");
        assert_eq!(json["deviation_percent"], 18.5);
        assert!(status.is_behind());
        assert!(!status.is_ahead());
    }

    #[test]
    fn test_on_track_predicate() {
        assert!(TargetStatus::on_track().is_on_track());
        assert!(TargetStatus::OnTrack { deviation_percent: 3.2 }.is_on_track());
        assert!(!TargetStatus::SlightlyAhead { deviation_percent: 7.0 }.is_on_track());
        assert!(!TargetStatus::WayBehind { deviation_percent: 20.0 }.is_on_track());
    }

    #[test]
    fn test_drift_labels() {
        let km = |start, end| KmDriftData {
            kilometer: 1,
            drift_at_start: start,
            drift_at_end: end,
        };
        assert_eq!(km(1.0, 3.5).label(), DriftLabel::HiddenFatigue);
        assert_eq!(km(1.0, 3.0).label(), DriftLabel::Rising);
        assert_eq!(km(1.0, 1.5).label(), DriftLabel::Stable);
        assert_eq!(km(3.0, 1.0).label(), DriftLabel::Stable);
    }

    #[test]
    fn test_heart_rate_data_deserializes_empty() {
        let data: HeartRateData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, HeartRateData::default());
    }
}
