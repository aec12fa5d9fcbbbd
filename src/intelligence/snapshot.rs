// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Snapshot construction from live telemetry

use chrono::{DateTime, Utc};

use super::cardiac_drift::drift_percent;
use super::fatigue::assess_fatigue;
use super::trends::{classify_heart_rate_trend, classify_pace_trend};
use crate::constants::run;
use crate::models::{
    HeartRateData, IntervalSnapshot, KmDriftData, PerformanceSnapshot, RunnerPreferences,
    TelemetryReading,
};

/// Everything needed to build one snapshot
#[derive(Debug, Clone, Copy)]
pub struct SnapshotInputs<'a> {
    pub telemetry: &'a TelemetryReading,
    pub preferences: &'a RunnerPreferences,
    pub heart_rate: Option<&'a HeartRateData>,
    pub completed_intervals: &'a [IntervalSnapshot],
    pub drift_series: &'a [KmDriftData],
    pub run_started_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

/// Target distance in meters implied by the nominal run duration at target pace
pub fn nominal_target_distance_meters(target_pace_min_per_km: f64) -> f64 {
    if target_pace_min_per_km <= 0.0 {
        return 0.0;
    }
    run::NOMINAL_RUN_DURATION_MINUTES / target_pace_min_per_km * run::METERS_PER_KILOMETER
}

/// Percent by which current pace is slower (positive) or faster (negative) than target
pub fn pace_deviation_percent(current_pace: f64, target_pace: f64) -> f64 {
    if target_pace <= 0.0 {
        return 0.0;
    }
    (current_pace - target_pace) / target_pace * 100.0
}

/// Distance in meters the runner reaches by the end of the nominal duration at current pace.
///
/// Past the nominal duration the remaining time is negative and the projection
/// falls below the current distance.
pub fn projected_distance_meters(current_distance_meters: f64, elapsed_seconds: f64, current_pace: f64) -> f64 {
    if current_pace <= 0.0 {
        return current_distance_meters;
    }
    let elapsed_minutes = elapsed_seconds / run::SECONDS_PER_MINUTE;
    let remaining_minutes = run::NOMINAL_RUN_DURATION_MINUTES - elapsed_minutes;
    current_distance_meters + remaining_minutes / current_pace * run::METERS_PER_KILOMETER
}

/// Total seconds to cover the target distance at current pace
pub fn estimated_finish_seconds(target_distance_meters: f64, current_pace: f64) -> Option<f64> {
    if current_pace <= 0.0 || target_distance_meters <= 0.0 {
        return None;
    }
    Some(target_distance_meters / run::METERS_PER_KILOMETER * current_pace * run::SECONDS_PER_MINUTE)
}

/// Build the immutable snapshot for one analysis cycle
pub fn build_snapshot(inputs: &SnapshotInputs<'_>) -> PerformanceSnapshot {
    let elapsed_seconds = (inputs.now - inputs.run_started_at)
        .num_milliseconds()
        .max(0) as f64
        / 1000.0;

    let current_pace = inputs.telemetry.pace_min_per_km;
    let target_pace = inputs.preferences.target_pace_min_per_km;
    let current_distance = inputs.telemetry.distance_meters;
    let target_distance = nominal_target_distance_meters(target_pace);

    let hr = inputs.heart_rate.cloned().unwrap_or_default();

    let pace_trend = classify_pace_trend(inputs.completed_intervals);
    let heart_rate_trend = classify_heart_rate_trend(hr.current_bpm, hr.average_bpm, hr.max_bpm);
    let fatigue = assess_fatigue(elapsed_seconds, pace_trend, heart_rate_trend, hr.current_zone);

    PerformanceSnapshot {
        current_pace_min_per_km: current_pace,
        target_pace_min_per_km: target_pace,
        current_distance_meters: current_distance,
        target_distance_meters: target_distance,
        elapsed_seconds,
        target_time_seconds: run::NOMINAL_RUN_DURATION_MINUTES * run::SECONDS_PER_MINUTE,

        current_heart_rate: hr.current_bpm,
        average_heart_rate: hr.average_bpm,
        max_heart_rate: hr.max_bpm,
        current_zone: hr.current_zone,
        zone_percentages: hr.zone_percentages,
        zone_average_pace: hr.zone_average_pace,

        completed_intervals: inputs.completed_intervals.to_vec(),
        current_interval: inputs.completed_intervals.len() as u32 + 1,

        pace_deviation_percent: pace_deviation_percent(current_pace, target_pace),
        estimated_finish_seconds: estimated_finish_seconds(target_distance, current_pace),
        projected_distance_meters: projected_distance_meters(current_distance, elapsed_seconds, current_pace),

        pace_trend,
        heart_rate_trend,
        fatigue_score: fatigue.score,
        fatigue_level: fatigue.level,

        drift_series: inputs.drift_series.to_vec(),
        current_drift_percent: drift_percent(hr.current_bpm, hr.average_bpm),
    }
}
