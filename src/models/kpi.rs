// SPDX-License-Identifier: MIT

//! Derived dashboard figures.
//!
//! Everything here is computed on demand per request and never persisted.
//! The contract with the presentation layer: every numeric field is either a
//! well-defined number or an explicit `None`. Absence is never silently
//! rendered as zero, because "no comparison possible" and "no change" mean
//! different things on screen.

use serde::{Deserialize, Serialize};

use crate::models::trip::TripClassification;

/// Reduced totals over a set of trips for one (user, classification, window)
/// combination. Absent per-trip metrics contribute zero to the sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub trip_count: u32,
    pub total_distance_km: f64,
    pub total_emissions_kg: f64,
}

/// Semantic reading of a period-over-period change.
///
/// This is a business rule, not styling: less distance/emissions is good,
/// more is bad, and the trip count carries no judgment either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Favorable,
    Neutral,
    Unfavorable,
}

/// Change of one metric against the previous period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// current - previous
    pub delta: f64,
    /// Relative change in percent; `None` when the previous value was zero
    /// (or negative) and the ratio is undefined.
    pub percent: Option<f64>,
    pub trend: Trend,
}

impl MetricDelta {
    /// Display form of the percentage: nearest integer, explicit `+`/`-`
    /// prefix, no prefix for exactly zero. `None` when undefined.
    pub fn percent_label(&self) -> Option<String> {
        let percent = self.percent?;
        let sign = if self.delta > 0.0 {
            "+"
        } else if self.delta < 0.0 {
            "-"
        } else {
            ""
        };
        Some(format!("{}{}%", sign, percent.abs().round() as i64))
    }
}

/// Period-over-period comparison for one aggregate.
///
/// A `None` metric means no previous-period data existed at all, distinct
/// from a zero-valued previous period, which yields a delta with an
/// undefined percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub trip_count: Option<MetricDelta>,
    pub distance_km: Option<MetricDelta>,
    pub emissions_kg: Option<MetricDelta>,
}

impl PeriodComparison {
    /// Comparison with every delta unavailable (no baseline).
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Dashboard period variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiPeriod {
    CurrentMonth,
    AllTime,
}

/// One dashboard tile's worth of data. Ephemeral, rebuilt on every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiItem {
    pub classification: TripClassification,
    pub period: KpiPeriod,
    pub aggregate: PeriodAggregate,
    pub comparison: PeriodComparison,
    /// Emissions intensity of the aggregate, g CO₂ per km; `None` when the
    /// aggregate distance is zero.
    pub intensity_g_per_km: Option<f64>,
}

/// KPI tiles for one classification. A `None` tile means the fetch backing
/// it failed and the presentation layer should show its error state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationKpis {
    pub month: Option<KpiItem>,
    pub total: Option<KpiItem>,
}

/// Full dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub personal: ClassificationKpis,
    pub professional: ClassificationKpis,
}
