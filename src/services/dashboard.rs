// SPDX-License-Identifier: MIT

//! Dashboard assembly service.
//!
//! Handles the cockpit load workflow:
//! 1. Resolve current/previous month windows from the reference date
//! 2. Fetch the period trip sets concurrently (read-only, no ordering)
//! 3. Aggregate, compare, and derive intensity
//! 4. Degrade per-tile on fetch failure instead of blanking the dashboard

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::TripStore;
use crate::models::kpi::{
    ClassificationKpis, Dashboard, KpiItem, KpiPeriod, PeriodAggregate, PeriodComparison,
};
use crate::models::trip::TripClassification;
use crate::period::DateWindow;
use crate::services::emissions;

/// Assembles display-ready KPI structures from the trip repository.
#[derive(Clone)]
pub struct DashboardService {
    trips: Arc<dyn TripStore>,
}

impl DashboardService {
    pub fn new(trips: Arc<dyn TripStore>) -> Self {
        Self { trips }
    }

    /// Load the full dashboard for a user.
    ///
    /// `today` is the reference date for the month windows; both
    /// classifications load concurrently and independently.
    pub async fn load_dashboard(&self, user_id: Uuid, today: NaiveDate) -> Dashboard {
        let (personal, professional) = tokio::join!(
            self.load_classification(user_id, TripClassification::Personal, today),
            self.load_classification(user_id, TripClassification::Professional, today),
        );
        Dashboard {
            personal,
            professional,
        }
    }

    /// Load the month and all-time tiles for one classification.
    ///
    /// Failure policy: a current-period or all-time fetch failure loses only
    /// that tile; a previous-period failure only loses the deltas.
    pub async fn load_classification(
        &self,
        user_id: Uuid,
        classification: TripClassification,
        today: NaiveDate,
    ) -> ClassificationKpis {
        let current_window = DateWindow::current_month(today);
        let previous_window = DateWindow::previous_month(today);

        let (current, previous, all_time) = tokio::join!(
            self.trips
                .fetch_trips(user_id, Some(classification), Some(&current_window), None),
            self.trips
                .fetch_trips(user_id, Some(classification), Some(&previous_window), None),
            self.trips.fetch_trips(user_id, Some(classification), None, None),
        );

        let month = match current {
            Ok(trips) => {
                let aggregate = emissions::aggregate(&trips);
                // A failed previous-period fetch degrades to "no baseline";
                // it must not take the current figures down with it.
                let previous_aggregate = match previous {
                    Ok(previous_trips) => Some(emissions::aggregate(&previous_trips)),
                    Err(e) => {
                        tracing::warn!(
                            user = %truncate_uid(user_id),
                            ?classification,
                            error = %e,
                            "Previous-period fetch failed; deltas unavailable"
                        );
                        None
                    }
                };
                Some(build_kpi(
                    classification,
                    KpiPeriod::CurrentMonth,
                    aggregate,
                    previous_aggregate.as_ref(),
                ))
            }
            Err(e) => {
                tracing::error!(
                    user = %truncate_uid(user_id),
                    ?classification,
                    error = %e,
                    "Current-period fetch failed; tile unavailable"
                );
                None
            }
        };

        let total = match all_time {
            Ok(trips) => Some(build_kpi(
                classification,
                KpiPeriod::AllTime,
                emissions::aggregate(&trips),
                None,
            )),
            Err(e) => {
                tracing::error!(
                    user = %truncate_uid(user_id),
                    ?classification,
                    error = %e,
                    "All-time fetch failed; tile unavailable"
                );
                None
            }
        };

        ClassificationKpis { month, total }
    }
}

/// Build one KPI tile from aggregates. Pure transform, no side effects.
///
/// All-time tiles never invoke the comparator (there is no "previous
/// all-time") but still carry the aggregate's intensity.
pub fn build_kpi(
    classification: TripClassification,
    period: KpiPeriod,
    aggregate: PeriodAggregate,
    previous: Option<&PeriodAggregate>,
) -> KpiItem {
    let comparison = match period {
        KpiPeriod::AllTime => PeriodComparison::unavailable(),
        KpiPeriod::CurrentMonth => emissions::compare(&aggregate, previous),
    };
    let intensity_g_per_km = emissions::aggregate_intensity(&aggregate);

    KpiItem {
        classification,
        period,
        aggregate,
        comparison,
        intensity_g_per_km,
    }
}

fn truncate_uid(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
