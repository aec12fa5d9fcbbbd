// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pace and heart-rate trend classifiers

use crate::constants::{heart_rate, pace};
use crate::models::{HeartRateTrend, IntervalSnapshot, PaceTrend};

/// Classify pace across completed intervals.
///
/// Uses consecutive pace deltas: a wide spread is erratic, otherwise the mean
/// delta decides. Lower pace is faster, so a negative mean is improving.
/// Fewer than two intervals yields [`PaceTrend::Stable`].
pub fn classify_pace_trend(intervals: &[IntervalSnapshot]) -> PaceTrend {
    if intervals.len() < pace::MIN_INTERVALS_FOR_TREND {
        return PaceTrend::Stable;
    }

    let deltas: Vec<f64> = intervals
        .windows(2)
        .map(|pair| pair[1].pace_min_per_km - pair[0].pace_min_per_km)
        .collect();

    let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
    let variance = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / deltas.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev > pace::ERRATIC_STD_DEV {
        PaceTrend::Erratic
    } else if mean < -pace::TREND_MEAN_DELTA {
        PaceTrend::Improving
    } else if mean > pace::TREND_MEAN_DELTA {
        PaceTrend::Declining
    } else {
        PaceTrend::Stable
    }
}

/// Classify heart rate relative to the run average.
///
/// Needs both current and a positive average heart rate, otherwise
/// [`HeartRateTrend::Stable`]. The rising/recovering bands are checked before
/// the spike test against max heart rate.
pub fn classify_heart_rate_trend(
    current: Option<u32>,
    average: Option<u32>,
    max: Option<u32>,
) -> HeartRateTrend {
    let (current, average) = match (current, average) {
        (Some(current), Some(average)) if average > 0 => (f64::from(current), f64::from(average)),
        _ => return HeartRateTrend::Stable,
    };

    let difference = current - average;
    if difference > heart_rate::TREND_DELTA_BPM {
        return HeartRateTrend::Rising;
    }
    if difference < -heart_rate::TREND_DELTA_BPM {
        return HeartRateTrend::Recovering;
    }

    match max {
        Some(max) if max > 0 && current > heart_rate::SPIKE_FRACTION_OF_MAX * f64::from(max) => {
            HeartRateTrend::Spiking
        }
        _ => HeartRateTrend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(paces: &[f64]) -> Vec<IntervalSnapshot> {
        paces
            .iter()
            .enumerate()
            .map(|(i, pace)| IntervalSnapshot {
                kilometer: i as u32 + 1,
                pace_min_per_km: *pace,
                duration_seconds: pace * 60.0,
                average_heart_rate: None,
                zone: None,
            })
            .collect()
    }

    #[test]
    fn test_pace_trend_needs_two_intervals() {
        assert_eq!(classify_pace_trend(&[]), PaceTrend::Stable);
        assert_eq!(classify_pace_trend(&intervals(&[4.0])), PaceTrend::Stable);
    }

    #[test]
    fn test_constant_paces_are_stable() {
        assert_eq!(classify_pace_trend(&intervals(&[5.0, 5.0, 5.0])), PaceTrend::Stable);
    }

    #[test]
    fn test_pace_getting_faster_is_improving() {
        assert_eq!(classify_pace_trend(&intervals(&[5.6, 5.4, 5.2])), PaceTrend::Improving);
    }

    #[test]
    fn test_pace_getting_slower_is_declining() {
        assert_eq!(classify_pace_trend(&intervals(&[5.0, 5.2, 5.4, 5.6])), PaceTrend::Declining);
    }

    #[test]
    fn test_uneven_splits_are_erratic() {
        // deltas +1.5, -1.5: std dev 1.5
        assert_eq!(classify_pace_trend(&intervals(&[5.0, 6.5, 5.0])), PaceTrend::Erratic);
    }

    #[test]
    fn test_small_mean_delta_is_stable() {
        assert_eq!(classify_pace_trend(&intervals(&[5.0, 5.05, 5.1])), PaceTrend::Stable);
    }

    #[test]
    fn test_heart_rate_missing_is_stable() {
        assert_eq!(classify_heart_rate_trend(None, None, None), HeartRateTrend::Stable);
        assert_eq!(classify_heart_rate_trend(Some(170), None, Some(180)), HeartRateTrend::Stable);
        assert_eq!(classify_heart_rate_trend(None, Some(140), Some(180)), HeartRateTrend::Stable);
    }

    #[test]
    fn test_zero_average_is_stable() {
        assert_eq!(classify_heart_rate_trend(Some(170), Some(0), Some(180)), HeartRateTrend::Stable);
    }

    #[test]
    fn test_heart_rate_rising_and_recovering() {
        assert_eq!(classify_heart_rate_trend(Some(170), Some(140), None), HeartRateTrend::Rising);
        assert_eq!(classify_heart_rate_trend(Some(125), Some(140), None), HeartRateTrend::Recovering);
        assert_eq!(classify_heart_rate_trend(Some(150), Some(140), None), HeartRateTrend::Stable);
    }

    #[test]
    fn test_heart_rate_spiking_near_max() {
        // diff 5 is inside the band, 176 > 0.95 * 182
        assert_eq!(classify_heart_rate_trend(Some(176), Some(171), Some(182)), HeartRateTrend::Spiking);
        assert_eq!(classify_heart_rate_trend(Some(150), Some(145), Some(190)), HeartRateTrend::Stable);
    }

    #[test]
    fn test_rising_takes_precedence_over_spiking() {
        assert_eq!(classify_heart_rate_trend(Some(185), Some(150), Some(190)), HeartRateTrend::Rising);
    }
}
