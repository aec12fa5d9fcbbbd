// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed classification thresholds and environment-based configuration values.
//! The thresholds reproduce the coaching rule set exactly; changing any of them
//! changes the engine's observable behavior.

use std::env;

/// Run-level assumptions used when building a snapshot
pub mod run {
    /// Nominal run duration used to derive target distance and projections.
    ///
    /// This is deliberately not the runner's configured goal distance.
    pub const NOMINAL_RUN_DURATION_MINUTES: f64 = 30.0;

    /// Elapsed time below this many seconds is treated as zero
    pub const NEAR_ZERO_ELAPSED_SECONDS: f64 = 1.0;

    pub const METERS_PER_KILOMETER: f64 = 1000.0;
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Pace trend classification over completed intervals
pub mod pace {
    /// Minimum completed intervals before a trend is computed
    pub const MIN_INTERVALS_FOR_TREND: usize = 2;
    /// Std-dev of consecutive pace deltas (min/km) above which pacing is erratic
    pub const ERRATIC_STD_DEV: f64 = 0.5;
    /// Mean delta (min/km) beyond which pace is improving or declining
    pub const TREND_MEAN_DELTA: f64 = 0.1;
}

/// Heart-rate trend classification
pub mod heart_rate {
    /// BPM difference between current and average that marks rising/recovering
    pub const TREND_DELTA_BPM: f64 = 10.0;
    /// Fraction of max heart rate above which HR is spiking
    pub const SPIKE_FRACTION_OF_MAX: f64 = 0.95;
    /// Zone at or above which the runner is in a high-intensity zone
    pub const HIGH_ZONE: u8 = 4;
    pub const TEMPO_ZONE: u8 = 3;
    pub const TOP_ZONE: u8 = 5;
}

/// Fatigue scoring weights and level bands
pub mod fatigue {
    pub const ELAPSED_BUCKET_1_MINUTES: f64 = 10.0;
    pub const ELAPSED_BUCKET_2_MINUTES: f64 = 20.0;
    pub const ELAPSED_BUCKET_3_MINUTES: f64 = 30.0;

    pub const PACE_IMPROVING_POINTS: i32 = -1;
    pub const PACE_ERRATIC_POINTS: i32 = 1;
    pub const PACE_DECLINING_POINTS: i32 = 2;

    pub const HR_RECOVERING_POINTS: i32 = -1;
    pub const HR_RISING_POINTS: i32 = 2;
    pub const HR_SPIKING_POINTS: i32 = 3;

    pub const HIGH_ZONE_POINTS: i32 = 2;
    pub const TEMPO_ZONE_POINTS: i32 = 1;

    pub const FRESH_MAX_SCORE: i32 = 1;
    pub const MODERATE_MAX_SCORE: i32 = 3;
    pub const HIGH_MAX_SCORE: i32 = 5;
}

/// Target status deviation bands (percent)
pub mod target {
    pub const ON_TRACK_BAND_PERCENT: f64 = 5.0;
    pub const WAY_OFF_BAND_PERCENT: f64 = 15.0;
}

/// Cardiac drift labels
pub mod drift {
    /// Per-kilometer drift increase (percentage points) labeled hidden fatigue
    pub const HIDDEN_FATIGUE_CHANGE: f64 = 2.0;
    /// Per-kilometer drift increase labeled rising
    pub const RISING_CHANGE: f64 = 0.5;
    /// Current drift percent above which the fatigue signal activates
    pub const FATIGUE_SIGNAL_PERCENT: f64 = 5.0;
}

/// Risk detection thresholds
pub mod risk {
    /// Top-zone occupancy percent above which extended high-zone effort is flagged
    pub const TOP_ZONE_OCCUPANCY_PERCENT: f64 = 20.0;
}

/// Adaptive strategy parameters
pub mod strategy {
    /// Correction used when no positive target pace is available
    pub const DEFAULT_CORRECTION_SECONDS_PER_KM: f64 = 10.0;
}

/// Situation context thresholds
pub mod situation {
    /// Combined zone 4 + zone 5 occupancy percent that counts as too high
    pub const HIGH_ZONES_OCCUPANCY_PERCENT: f64 = 25.0;
    /// Current/max heart rate ratio below which there is headroom to push
    pub const PUSH_HEADROOM_FRACTION: f64 = 0.85;
    pub const ADVANCED_MAX_PACE_DEVIATION: f64 = 3.0;
    pub const BEGINNER_MIN_PACE_DEVIATION: f64 = 15.0;
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Per-collaborator timeout for context lookups in milliseconds
    pub fn context_timeout_ms() -> Option<u64> {
        env::var("COACH_CONTEXT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
    }

    /// Overall deadline for one coaching cycle in milliseconds
    pub fn cycle_deadline_ms() -> Option<u64> {
        env::var("COACH_CYCLE_DEADLINE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}

/// Service identity used in structured logs
pub mod service {
    pub const SERVICE_NAME: &str = "running-coach-engine";
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
