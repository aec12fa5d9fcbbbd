// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Target status evaluation
//!
//! Two branches, checked in order: the goal distance has already been covered
//! ([`evaluate_goal_met`]), or the runner is still chasing it
//! ([`evaluate_goal_in_progress`]). `actual == target` belongs to the first branch.

use crate::constants::{run, target};
use crate::models::{PerformanceSnapshot, TargetStatus};

/// Inputs for the target status evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetProgress {
    pub actual_distance_meters: f64,
    pub target_distance_meters: f64,
    pub elapsed_seconds: f64,
    pub current_pace_min_per_km: f64,
    pub target_pace_min_per_km: f64,
}

impl From<&PerformanceSnapshot> for TargetProgress {
    fn from(snapshot: &PerformanceSnapshot) -> Self {
        Self {
            actual_distance_meters: snapshot.current_distance_meters,
            target_distance_meters: snapshot.target_distance_meters,
            elapsed_seconds: snapshot.elapsed_seconds,
            current_pace_min_per_km: snapshot.current_pace_min_per_km,
            target_pace_min_per_km: snapshot.target_pace_min_per_km,
        }
    }
}

/// Classify progress toward the pacing goal
pub fn evaluate_target_status(progress: &TargetProgress) -> TargetStatus {
    if progress.elapsed_seconds < run::NEAR_ZERO_ELAPSED_SECONDS {
        return TargetStatus::on_track();
    }

    if progress.target_distance_meters > 0.0
        && progress.actual_distance_meters >= progress.target_distance_meters
    {
        return evaluate_goal_met(progress.actual_distance_meters, progress.target_distance_meters);
    }

    evaluate_goal_in_progress(progress)
}

/// The runner has covered at least the target distance; never returns a behind status.
///
/// `target_distance_meters` must be positive.
pub fn evaluate_goal_met(actual_distance_meters: f64, target_distance_meters: f64) -> TargetStatus {
    let beyond = (actual_distance_meters - target_distance_meters) / target_distance_meters * 100.0;

    if beyond > target::WAY_OFF_BAND_PERCENT {
        TargetStatus::WayAhead {
            deviation_percent: beyond,
        }
    } else if beyond > target::ON_TRACK_BAND_PERCENT {
        TargetStatus::SlightlyAhead {
            deviation_percent: beyond,
        }
    } else {
        TargetStatus::OnTrack {
            deviation_percent: beyond,
        }
    }
}

/// The runner is still short of the target distance.
///
/// Compares actual distance with the distance expected at target pace, using
/// the average pace so far as a cross-check on the direction.
pub fn evaluate_goal_in_progress(progress: &TargetProgress) -> TargetStatus {
    let elapsed_minutes = progress.elapsed_seconds / run::SECONDS_PER_MINUTE;
    if elapsed_minutes <= 0.0 {
        return TargetStatus::on_track();
    }

    let actual_km = progress.actual_distance_meters / run::METERS_PER_KILOMETER;
    let target_pace = progress.target_pace_min_per_km;

    let average_pace = if actual_km > 0.0 {
        elapsed_minutes / actual_km
    } else {
        progress.current_pace_min_per_km
    };

    let expected_km = if target_pace > 0.0 {
        elapsed_minutes / target_pace
    } else {
        0.0
    };
    if expected_km <= 0.0 {
        return TargetStatus::on_track();
    }

    let deviation = (actual_km - expected_km) / expected_km * 100.0;
    let magnitude = deviation.abs();
    let slower_than_target = average_pace > target_pace;
    let faster_than_target = average_pace < target_pace;

    if magnitude <= target::ON_TRACK_BAND_PERCENT {
        TargetStatus::OnTrack {
            deviation_percent: magnitude,
        }
    } else if deviation < -target::WAY_OFF_BAND_PERCENT
        || (slower_than_target && deviation < -target::ON_TRACK_BAND_PERCENT)
    {
        TargetStatus::WayBehind {
            deviation_percent: magnitude,
        }
    } else if deviation < -target::ON_TRACK_BAND_PERCENT {
        TargetStatus::SlightlyBehind {
            deviation_percent: magnitude,
        }
    } else if deviation > target::WAY_OFF_BAND_PERCENT
        || (faster_than_target && deviation > target::ON_TRACK_BAND_PERCENT)
    {
        TargetStatus::WayAhead {
            deviation_percent: magnitude,
        }
    } else {
        TargetStatus::SlightlyAhead {
            deviation_percent: magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(actual_m: f64, target_m: f64, elapsed_min: f64, current: f64, target_pace: f64) -> TargetProgress {
        TargetProgress {
            actual_distance_meters: actual_m,
            target_distance_meters: target_m,
            elapsed_seconds: elapsed_min * 60.0,
            current_pace_min_per_km: current,
            target_pace_min_per_km: target_pace,
        }
    }

    #[test]
    fn test_zero_elapsed_is_on_track() {
        let status = evaluate_target_status(&progress(0.0, 5000.0, 0.0, 0.0, 6.0));
        assert_eq!(status, TargetStatus::on_track());
    }

    #[test]
    fn test_exactly_on_pace_is_on_track_with_zero_deviation() {
        // 12 minutes at 6:00/km is exactly 2 km
        let status = evaluate_target_status(&progress(2000.0, 5000.0, 12.0, 6.0, 6.0));
        assert_eq!(status, TargetStatus::OnTrack { deviation_percent: 0.0 });
    }

    #[test]
    fn test_boundary_actual_equals_target_uses_goal_met_branch() {
        let status = evaluate_target_status(&progress(5000.0, 5000.0, 40.0, 8.0, 6.0));
        assert_eq!(status, TargetStatus::OnTrack { deviation_percent: 0.0 });
    }

    #[test]
    fn test_just_short_of_target_uses_in_progress_branch() {
        // 4999 m in 40 min against 6:00/km: expected 6.67 km, far behind
        let status = evaluate_target_status(&progress(4999.0, 5000.0, 40.0, 8.0, 6.0));
        assert!(matches!(status, TargetStatus::WayBehind { .. }));
    }

    #[test]
    fn test_goal_met_bands() {
        assert!(matches!(evaluate_goal_met(5200.0, 5000.0), TargetStatus::OnTrack { .. }));
        assert!(matches!(evaluate_goal_met(5400.0, 5000.0), TargetStatus::SlightlyAhead { .. }));
        assert!(matches!(evaluate_goal_met(6000.0, 5000.0), TargetStatus::WayAhead { .. }));
    }

    #[test]
    fn test_goal_met_never_behind() {
        for actual in [5000.0, 5001.0, 5500.0, 9000.0] {
            let status = evaluate_target_status(&progress(actual, 5000.0, 30.0, 9.0, 6.0));
            assert!(!status.is_behind(), "{actual} m gave {status}");
        }
    }

    #[test]
    fn test_behind_with_slower_average_is_way_behind() {
        // 1.8 km in 12 min vs expected 2 km: -10%, average pace 6:40 slower than 6:00
        let status = evaluate_target_status(&progress(1800.0, 5000.0, 12.0, 6.5, 6.0));
        match status {
            TargetStatus::WayBehind { deviation_percent } => assert!((deviation_percent - 10.0).abs() < 1e-9),
            other => panic!("expected way behind, got {other}"),
        }
    }

    #[test]
    fn test_no_distance_yet_falls_back_to_current_pace() {
        // 0 km after 2 min: -100%, beyond the way-off band
        let status = evaluate_target_status(&progress(0.0, 5000.0, 2.0, 0.0, 6.0));
        assert!(matches!(status, TargetStatus::WayBehind { .. }));
    }

    #[test]
    fn test_ahead_with_faster_average_is_way_ahead() {
        // 2.2 km in 12 min vs expected 2 km: +10%
        let status = evaluate_target_status(&progress(2200.0, 5000.0, 12.0, 5.4, 6.0));
        assert!(matches!(status, TargetStatus::WayAhead { .. }));
    }

    #[test]
    fn test_small_deviation_is_on_track() {
        let status = evaluate_target_status(&progress(2080.0, 5000.0, 12.0, 5.8, 6.0));
        match status {
            TargetStatus::OnTrack { deviation_percent } => assert!((deviation_percent - 4.0).abs() < 1e-9),
            other => panic!("expected on track, got {other}"),
        }
    }

    #[test]
    fn test_non_positive_target_pace_is_on_track() {
        let status = evaluate_target_status(&progress(1500.0, 0.0, 10.0, 6.0, 0.0));
        assert_eq!(status, TargetStatus::on_track());
        let status = evaluate_target_status(&progress(1500.0, 0.0, 10.0, 6.0, -1.0));
        assert_eq!(status, TargetStatus::on_track());
    }

    #[test]
    fn test_evaluation_is_pure() {
        let input = progress(2300.0, 5000.0, 15.0, 6.2, 6.0);
        assert_eq!(evaluate_target_status(&input), evaluate_target_status(&input));
    }
}
