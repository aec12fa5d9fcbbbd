// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cardiac drift tracking
//!
//! Drift is the percentage deviation of instantaneous heart rate from the run
//! average. The tracker keeps one [`KmDriftData`] per completed kilometer,
//! recording drift when the kilometer started and when it ended.

use tracing::debug;

use crate::constants::drift;
use crate::models::KmDriftData;

/// Drift percent of current heart rate over the run average.
///
/// `None` when either value is missing or the average is zero.
pub fn drift_percent(current: Option<u32>, average: Option<u32>) -> Option<f64> {
    match (current, average) {
        (Some(current), Some(average)) if average > 0 => {
            let average = f64::from(average);
            Some((f64::from(current) - average) / average * 100.0)
        }
        _ => None,
    }
}

/// Whether current drift is high enough to signal fatigue
pub fn is_fatigue_signal(current_drift: Option<f64>) -> bool {
    current_drift.is_some_and(|d| d > drift::FATIGUE_SIGNAL_PERCENT)
}

/// Append-only per-kilometer drift series for one run
#[derive(Debug, Clone, Default)]
pub struct CardiacDriftTracker {
    series: Vec<KmDriftData>,
    segment_start_drift: Option<f64>,
    last_completed_km: u32,
}

impl CardiacDriftTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest drift reading and the number of completed kilometers.
    ///
    /// When a new kilometer has completed and drift is known both at the start
    /// of the segment and now, one entry is appended. Returns the appended entry.
    pub fn observe(&mut self, completed_km: u32, current_drift: Option<f64>) -> Option<KmDriftData> {
        let mut appended = None;

        if completed_km > self.last_completed_km {
            if let (Some(start), Some(end)) = (self.segment_start_drift, current_drift) {
                let entry = KmDriftData {
                    kilometer: completed_km,
                    drift_at_start: start,
                    drift_at_end: end,
                };
                debug!(
                    drift.km = entry.kilometer,
                    drift.start = entry.drift_at_start,
                    drift.end = entry.drift_at_end,
                    drift.label = entry.label().as_str(),
                    "Recorded kilometer drift"
                );
                self.series.push(entry);
                appended = Some(entry);
            }
            self.last_completed_km = completed_km;
            self.segment_start_drift = current_drift;
        } else if self.segment_start_drift.is_none() {
            self.segment_start_drift = current_drift;
        }

        appended
    }

    pub fn series(&self) -> &[KmDriftData] {
        &self.series
    }

    /// Drop all state, for a new run
    pub fn reset(&mut self) {
        self.series.clear();
        self.segment_start_drift = None;
        self.last_completed_km = 0;
    }
}
