// SPDX-License-Identifier: MIT

//! CO₂ accounting computations.
//!
//! Pure functions over already-fetched trip data: period aggregation,
//! period-over-period comparison, and emissions intensity. These never
//! perform I/O and cannot fail; undefined ratios come back as `None`, never
//! as NaN/infinity and never as a substituted zero.

use crate::models::kpi::{MetricDelta, PeriodAggregate, PeriodComparison, Trend};
use crate::models::trip::Trip;

/// Reduce a list of trips into period totals.
///
/// The caller has already scoped the list to a user, classification and date
/// window. Absent distance/emissions contribute zero to the sums; the trip
/// still counts. Input order does not matter beyond float associativity.
pub fn aggregate(trips: &[Trip]) -> PeriodAggregate {
    let mut total = PeriodAggregate {
        trip_count: trips.len() as u32,
        ..PeriodAggregate::default()
    };
    for trip in trips {
        total.total_distance_km += trip.distance_km.unwrap_or(0.0);
        total.total_emissions_kg += trip.co2_emissions_kg.unwrap_or(0.0);
    }
    total
}

/// How a metric's change should be judged.
#[derive(Clone, Copy)]
enum Favorability {
    /// Decrease is good, increase is bad (distance, emissions)
    LowerIsBetter,
    /// No judgment either way (trip count)
    Informational,
}

/// Compare a current-period aggregate against the previous period.
///
/// `previous == None` means no prior-period data could be fetched at all;
/// every delta is then unavailable rather than zero, so the display can
/// distinguish "no change" from "no comparison possible". A present but
/// zero-valued previous metric yields a delta with an undefined percentage.
pub fn compare(
    current: &PeriodAggregate,
    previous: Option<&PeriodAggregate>,
) -> PeriodComparison {
    let Some(previous) = previous else {
        return PeriodComparison::unavailable();
    };

    PeriodComparison {
        trip_count: Some(metric_delta(
            current.trip_count as f64,
            previous.trip_count as f64,
            Favorability::Informational,
        )),
        distance_km: Some(metric_delta(
            current.total_distance_km,
            previous.total_distance_km,
            Favorability::LowerIsBetter,
        )),
        emissions_kg: Some(metric_delta(
            current.total_emissions_kg,
            previous.total_emissions_kg,
            Favorability::LowerIsBetter,
        )),
    }
}

fn metric_delta(current: f64, previous: f64, favorability: Favorability) -> MetricDelta {
    let delta = current - previous;

    // Percentage is only defined against a positive baseline.
    let percent = (previous > 0.0).then(|| (delta / previous) * 100.0);

    let trend = match favorability {
        Favorability::Informational => Trend::Neutral,
        Favorability::LowerIsBetter => {
            if delta < 0.0 {
                Trend::Favorable
            } else if delta > 0.0 {
                Trend::Unfavorable
            } else {
                Trend::Neutral
            }
        }
    };

    MetricDelta {
        delta,
        percent,
        trend,
    }
}

/// Emissions per unit distance, in grams of CO₂ per kilometer.
///
/// Defined only when both inputs are present and the distance is positive.
/// An absent distance must not be treated as zero: that would fabricate a
/// "zero intensity" for a trip whose intensity is simply unknown.
pub fn intensity_g_per_km(emissions_kg: Option<f64>, distance_km: Option<f64>) -> Option<f64> {
    let emissions = emissions_kg?;
    let distance = distance_km?;
    if distance <= 0.0 {
        return None;
    }
    Some((emissions * 1000.0) / distance)
}

/// Intensity of a whole-period aggregate.
pub fn aggregate_intensity(aggregate: &PeriodAggregate) -> Option<f64> {
    intensity_g_per_km(
        Some(aggregate.total_emissions_kg),
        Some(aggregate.total_distance_km),
    )
}

/// Bounded severity classification of an intensity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntensityBand {
    Low,
    Moderate,
    High,
    Severe,
}

/// Severity scale for intensity values.
///
/// The breakpoints are product-tuned configuration, not law; only the
/// monotonic ordering (lower intensity → less severe) and the clamping at
/// both ends are contractual.
#[derive(Debug, Clone)]
pub struct IntensityScale {
    breakpoints: Vec<f64>,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            breakpoints: vec![0.0, 80.0, 150.0, 220.0, 300.0],
        }
    }
}

impl IntensityScale {
    /// Build a scale from custom breakpoints. Returns `None` unless at least
    /// two strictly increasing breakpoints are given.
    pub fn new(breakpoints: Vec<f64>) -> Option<Self> {
        if breakpoints.len() < 2 || breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        Some(Self { breakpoints })
    }

    /// Severity position in `[0, 1]`, piecewise-linear across the
    /// breakpoints. Values below the first breakpoint (including negatives)
    /// clamp to 0, values above the last clamp to 1.
    pub fn severity(&self, value: f64) -> f64 {
        let first = self.breakpoints[0];
        let last = *self.breakpoints.last().expect("non-empty breakpoints");
        if value <= first {
            return 0.0;
        }
        if value >= last {
            return 1.0;
        }

        let segments = (self.breakpoints.len() - 1) as f64;
        for (i, pair) in self.breakpoints.windows(2).enumerate() {
            let (lo, hi) = (pair[0], pair[1]);
            if value < hi {
                let t = (value - lo) / (hi - lo);
                return (i as f64 + t) / segments;
            }
        }
        1.0
    }

    /// Band for a value, derived from its severity quarter.
    pub fn band(&self, value: f64) -> IntensityBand {
        let severity = self.severity(value);
        if severity < 0.25 {
            IntensityBand::Low
        } else if severity < 0.5 {
            IntensityBand::Moderate
        } else if severity < 0.75 {
            IntensityBand::High
        } else {
            IntensityBand::Severe
        }
    }
}
