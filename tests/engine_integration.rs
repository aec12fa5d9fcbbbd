// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end coaching cycles through the public API

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use running_coach_engine::config::CoachingConfig;
use running_coach_engine::engine::{CoachingEngine, CycleRequest};
use running_coach_engine::intelligence::{
    analyze_snapshot, build_snapshot, classify_heart_rate_trend, classify_pace_trend, detect_risks,
    drift_percent, evaluate_target_status, generate_strategy, RiskSignal, SnapshotInputs,
    StrategyInputs, TargetProgress,
};
use running_coach_engine::models::{
    AnalysisTrigger, CoachEnergy, CoachPersonality, HeartRateData, HeartRateTrend, IntervalSnapshot,
    PaceTrend, PerformanceSnapshot, RunnerPreferences, TargetStatus, TelemetryReading,
};

fn start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-05-03T07:15:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn interval(km: u32, pace: f64) -> IntervalSnapshot {
    IntervalSnapshot {
        kilometer: km,
        pace_min_per_km: pace,
        duration_seconds: pace * 60.0,
        average_heart_rate: None,
        zone: None,
    }
}

fn snapshot_at(
    elapsed: Duration,
    distance_meters: f64,
    pace: f64,
    heart_rate: Option<&HeartRateData>,
    intervals: &[IntervalSnapshot],
) -> PerformanceSnapshot {
    let telemetry = TelemetryReading {
        distance_meters,
        pace_min_per_km: pace,
        timestamp: start() + elapsed,
    };
    let preferences = RunnerPreferences::default();
    build_snapshot(&SnapshotInputs {
        telemetry: &telemetry,
        preferences: &preferences,
        heart_rate,
        completed_intervals: intervals,
        drift_series: &[],
        run_started_at: start(),
        now: start() + elapsed,
    })
}

fn cycle(trigger: AnalysisTrigger, minutes: i64, distance_meters: f64, pace: f64) -> CycleRequest {
    CycleRequest {
        trigger,
        telemetry: TelemetryReading {
            distance_meters,
            pace_min_per_km: pace,
            timestamp: start() + Duration::minutes(minutes),
        },
        heart_rate: None,
        completed_intervals: vec![],
        preferences: RunnerPreferences::default(),
        runner_name: None,
        user_id: None,
        run_started_at: start(),
        now: start() + Duration::minutes(minutes),
    }
}

#[test]
fn test_fewer_than_two_intervals_is_stable() {
    assert_eq!(classify_pace_trend(&[]), PaceTrend::Stable);
    assert_eq!(classify_pace_trend(&[interval(1, 4.2)]), PaceTrend::Stable);

    let snapshot = snapshot_at(Duration::minutes(8), 1200.0, 6.5, None, &[interval(1, 7.9)]);
    assert_eq!(snapshot.pace_trend, PaceTrend::Stable);
}

#[test]
fn test_missing_heart_rate_is_stable_without_drift() {
    let snapshot = snapshot_at(Duration::minutes(10), 1700.0, 6.0, None, &[]);
    assert_eq!(snapshot.heart_rate_trend, HeartRateTrend::Stable);
    assert_eq!(snapshot.current_drift_percent, None);

    let zero_average = HeartRateData {
        current_bpm: Some(150),
        average_bpm: Some(0),
        ..HeartRateData::default()
    };
    let snapshot = snapshot_at(Duration::minutes(10), 1700.0, 6.0, Some(&zero_average), &[]);
    assert_eq!(snapshot.heart_rate_trend, HeartRateTrend::Stable);
    assert_eq!(snapshot.current_drift_percent, None);
    assert_eq!(drift_percent(Some(150), Some(0)), None);
}

#[test]
fn test_target_status_is_pure() {
    let snapshot = snapshot_at(Duration::minutes(17), 2600.0, 6.6, None, &[]);
    let progress = TargetProgress::from(&snapshot);
    assert_eq!(evaluate_target_status(&progress), evaluate_target_status(&progress));
}

#[test]
fn test_on_pace_on_distance_is_on_track_with_zero_deviation() {
    // 15 minutes at 6:00/km is exactly 2.5 km
    let snapshot = snapshot_at(Duration::minutes(15), 2500.0, 6.0, None, &[]);
    let status = evaluate_target_status(&TargetProgress::from(&snapshot));
    assert_eq!(status, TargetStatus::OnTrack { deviation_percent: 0.0 });
}

#[test]
fn test_goal_met_is_never_behind() {
    // Nominal target at 6:00/km is 5 km
    for (distance, pace) in [(5000.0, 9.0), (5200.0, 7.5), (6100.0, 8.0), (9000.0, 12.0)] {
        let snapshot = snapshot_at(Duration::minutes(45), distance, pace, None, &[]);
        let status = evaluate_target_status(&TargetProgress::from(&snapshot));
        assert!(!status.is_behind(), "{distance} m at {pace} gave {status}");
    }
}

#[test]
fn test_flat_splits_are_stable() {
    let intervals = [interval(1, 5.0), interval(2, 5.0), interval(3, 5.0)];
    assert_eq!(classify_pace_trend(&intervals), PaceTrend::Stable);
}

#[test]
fn test_heart_rate_well_above_average_is_rising() {
    assert_eq!(classify_heart_rate_trend(Some(170), Some(140), None), HeartRateTrend::Rising);
}

#[test]
fn test_zone_five_occupancy_raises_extended_high_zone() {
    let heart_rate = HeartRateData {
        current_bpm: Some(165),
        average_bpm: Some(160),
        max_bpm: Some(195),
        current_zone: Some(4),
        zone_percentages: BTreeMap::from([(3, 40.0), (4, 35.0), (5, 25.0)]),
        ..HeartRateData::default()
    };
    let snapshot = snapshot_at(Duration::minutes(20), 3400.0, 5.9, Some(&heart_rate), &[]);
    let status = evaluate_target_status(&TargetProgress::from(&snapshot));
    assert!(detect_risks(&snapshot, &status).contains(&RiskSignal::ExtendedHighZone));
}

#[test]
fn test_zero_elapsed_is_on_track() {
    let snapshot = snapshot_at(Duration::zero(), 0.0, 0.0, None, &[]);
    assert_eq!(snapshot.elapsed_seconds, 0.0);
    assert!(snapshot.projected_distance_meters.is_finite());
    let status = evaluate_target_status(&TargetProgress::from(&snapshot));
    assert_eq!(status, TargetStatus::OnTrack { deviation_percent: 0.0 });

    let result = analyze_snapshot(&snapshot, CoachPersonality::default(), CoachEnergy::default());
    assert!(result.target_status.is_on_track());
}

#[test]
fn test_strategy_output_is_byte_identical() {
    let intervals = [interval(1, 5.8), interval(2, 6.1), interval(3, 6.5)];
    let snapshot = snapshot_at(Duration::minutes(19), 3000.0, 6.5, None, &intervals);
    let status = evaluate_target_status(&TargetProgress::from(&snapshot));
    let inputs = StrategyInputs::from_snapshot(&snapshot, status);
    assert_eq!(generate_strategy(&inputs).text, generate_strategy(&inputs).text);
}

#[test]
fn test_full_run_lifecycle() {
    let mut engine = CoachingEngine::new(CoachingConfig::default());
    let run_id = engine.begin_run_at(
        RunnerPreferences::default(),
        Some("Robin".to_string()),
        Some("user-7".to_string()),
        start(),
    );
    assert_eq!(engine.cache().run_id(), Some(run_id));

    let opening = engine.analyze(cycle(AnalysisTrigger::Start, 0, 0.0, 0.0));
    assert!(opening.target_status.is_on_track());
    assert!(opening.injury_risk_signals.is_empty());

    let mut steady = cycle(AnalysisTrigger::Interval, 12, 2000.0, 6.0);
    steady.completed_intervals = vec![interval(1, 6.0), interval(2, 6.0)];
    let steady = engine.analyze(steady);
    assert!(steady.target_status.is_on_track());
    assert!(steady.adaptive_strategy.starts_with("MAINTAIN"));
    assert!(steady.situation_tags.contains(&"pace_stable".to_string()));

    let mut fading = cycle(AnalysisTrigger::Time, 27, 3600.0, 8.2);
    fading.completed_intervals = vec![interval(1, 6.0), interval(2, 6.4), interval(3, 7.1)];
    fading.heart_rate = Some(HeartRateData {
        current_bpm: Some(182),
        average_bpm: Some(160),
        max_bpm: Some(190),
        current_zone: Some(5),
        ..HeartRateData::default()
    });
    let fading = engine.analyze(fading);
    assert!(matches!(fading.target_status, TargetStatus::WayBehind { .. }));
    assert!(fading.adaptive_strategy.starts_with("URGENT RECOVERY"));
    assert!(!fading.injury_risk_signals.is_empty());
    assert!(fading.situation_tags.contains(&"recovery_needed".to_string()));

    let finish = engine.analyze(cycle(AnalysisTrigger::End, 31, 5100.0, 6.1));
    assert!(!finish.target_status.is_behind());

    engine.end_run();
    assert!(!engine.cache().is_active());
    assert!(engine.drift_series().is_empty());
}
