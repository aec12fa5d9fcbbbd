// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Free-text report sections for the downstream feedback generator
//!
//! Pure templating over already-classified values. Nothing here feeds back
//! into classification.

use super::cardiac_drift::is_fatigue_signal;
use super::risk::RiskSignal;
use super::strategy::AdaptiveStrategy;
use crate::context::CycleContext;
use crate::models::{PerformanceSnapshot, RagAnalysisResult, TargetStatus};

/// The four descriptive sections of a cycle result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSections {
    pub performance_summary: String,
    pub heart_zone_analysis: String,
    pub interval_trends: String,
    pub hr_variation_analysis: String,
}

/// Render all sections for a snapshot
pub fn render_sections(snapshot: &PerformanceSnapshot, target_status: &TargetStatus) -> ReportSections {
    ReportSections {
        performance_summary: performance_summary(snapshot, target_status),
        heart_zone_analysis: heart_zone_analysis(snapshot),
        interval_trends: interval_trends(snapshot),
        hr_variation_analysis: hr_variation_analysis(snapshot),
    }
}

fn format_pace(pace_min_per_km: f64) -> String {
    if pace_min_per_km <= 0.0 || !pace_min_per_km.is_finite() {
        return "--:--".to_string();
    }
    let total_seconds = (pace_min_per_km * 60.0).round() as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn performance_summary(snapshot: &PerformanceSnapshot, target_status: &TargetStatus) -> String {
    let mut summary = format!(
        "{:.2} km in {:.1} min at {}/km (target {}/km, {:+.1}%). Target status: {}.",
        snapshot.current_distance_km(),
        snapshot.elapsed_minutes(),
        format_pace(snapshot.current_pace_min_per_km),
        format_pace(snapshot.target_pace_min_per_km),
        snapshot.pace_deviation_percent,
        target_status,
    );
    summary.push_str(&format!(
        " Projected {:.2} km of {:.2} km target.",
        snapshot.projected_distance_meters / 1000.0,
        snapshot.target_distance_km()
    ));
    summary.push_str(&format!(" Fatigue {} (score {}).", snapshot.fatigue_level, snapshot.fatigue_score));
    summary
}

fn heart_zone_analysis(snapshot: &PerformanceSnapshot) -> String {
    if snapshot.zone_percentages.is_empty() && snapshot.current_zone.is_none() {
        return "No heart-rate zone data available.".to_string();
    }

    let mut parts = Vec::new();
    if let Some(zone) = snapshot.current_zone {
        parts.push(format!("Currently in zone {zone}."));
    }
    if !snapshot.zone_percentages.is_empty() {
        let distribution: Vec<String> = snapshot
            .zone_percentages
            .iter()
            .map(|(zone, percent)| match snapshot.zone_average_pace.get(zone) {
                Some(pace) => format!("Z{zone} {percent:.0}% @ {}/km", format_pace(*pace)),
                None => format!("Z{zone} {percent:.0}%"),
            })
            .collect();
        parts.push(format!("Zone distribution: {}.", distribution.join(", ")));
    }
    parts.join(" ")
}

fn interval_trends(snapshot: &PerformanceSnapshot) -> String {
    if snapshot.completed_intervals.is_empty() {
        return "No completed kilometers yet.".to_string();
    }

    let splits: Vec<String> = snapshot
        .completed_intervals
        .iter()
        .map(|i| format!("km {}: {}", i.kilometer, format_pace(i.pace_min_per_km)))
        .collect();
    format!(
        "Splits {}. Pace trend: {}. Now running interval {}.",
        splits.join(", "),
        snapshot.pace_trend,
        snapshot.current_interval
    )
}

fn hr_variation_analysis(snapshot: &PerformanceSnapshot) -> String {
    let (Some(current), Some(average)) = (snapshot.current_heart_rate, snapshot.average_heart_rate) else {
        return "Heart-rate trend unavailable.".to_string();
    };

    let mut text = format!(
        "HR {current} bpm vs {average} bpm average ({}).",
        snapshot.heart_rate_trend
    );
    if let Some(max) = snapshot.max_heart_rate {
        text.push_str(&format!(" Max {max} bpm."));
    }
    if let Some(drift) = snapshot.current_drift_percent {
        text.push_str(&format!(" Cardiac drift {drift:+.1}%"));
        if is_fatigue_signal(Some(drift)) {
            text.push_str(", a fatigue signal.");
        } else {
            text.push('.');
        }
    }
    if let Some(last) = snapshot.drift_series.last() {
        text.push_str(&format!(" Last km drift: {}.", last.label().as_str()));
    }
    text
}

/// The single line the feedback generator leads with
pub fn overall_recommendation(strategy: &AdaptiveStrategy, risks: &[RiskSignal]) -> String {
    match risks.first() {
        Some(first) => format!("{} first: {}", strategy.template.headline(), first.message()),
        None => strategy.text.clone(),
    }
}

/// Append collaborator context to the descriptive sections of a result
pub fn augment_with_context(result: &mut RagAnalysisResult, context: &CycleContext) {
    if let Some(history) = &context.history {
        result.performance_summary.push_str(&format!(
            " History: {} runs, average {:.1} km at {}/km, best {}/km.",
            history.total_runs,
            history.average_distance_km,
            format_pace(history.average_pace_min_per_km),
            format_pace(history.best_pace_min_per_km),
        ));
    }
    if !context.similar_situations.is_empty() {
        result
            .interval_trends
            .push_str(&format!(" Similar past runs: {}.", context.similar_situations.join(" | ")));
    }
    if !context.insights.is_empty() {
        result
            .hr_variation_analysis
            .push_str(&format!(" Coaching notes: {}.", context.insights.join(" | ")));
    }
}
