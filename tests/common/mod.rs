// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use axum::Router;
use carbyo_api::config::Config;
use carbyo_api::db::{SupabaseDb, TripStore};
use carbyo_api::error::AppError;
use carbyo_api::models::trip::{self, Trip, TripClassification};
use carbyo_api::period::DateWindow;
use carbyo_api::routes::create_router;
use carbyo_api::AppState;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory trip repository with per-window failure injection.
///
/// The three dashboard fetches are told apart by their window shape:
/// no window = all-time, open-ended window = current month, bounded
/// window = previous month.
#[derive(Default)]
pub struct FakeTripStore {
    pub trips: Vec<Trip>,
    pub fail_current: bool,
    pub fail_previous: bool,
    pub fail_all_time: bool,
}

impl FakeTripStore {
    pub fn with_trips(trips: Vec<Trip>) -> Self {
        Self {
            trips,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TripStore for FakeTripStore {
    async fn fetch_trips(
        &self,
        user_id: Uuid,
        classification: Option<TripClassification>,
        window: Option<&DateWindow>,
        limit: Option<u32>,
    ) -> Result<Vec<Trip>, AppError> {
        let failed = match window {
            None => self.fail_all_time,
            Some(w) if w.end.is_none() => self.fail_current,
            Some(_) => self.fail_previous,
        };
        if failed {
            return Err(AppError::Supabase("injected failure".to_string()));
        }

        let mut trips: Vec<Trip> = self
            .trips
            .iter()
            .filter(|t| t.user_id == Some(user_id))
            .filter(|t| classification.is_none() || t.classification == classification)
            .filter(|t| match window {
                // Date-filtered queries exclude undated rows, like the
                // backend's gte/lte filters on a nullable column.
                Some(w) => t.trip_date.map(|d| w.contains(d)).unwrap_or(false),
                None => true,
            })
            .cloned()
            .collect();

        trip::sort_by_date_desc(&mut trips);
        if let Some(limit) = limit {
            trips.truncate(limit as usize);
        }
        Ok(trips)
    }
}

/// Build a trip row for tests.
#[allow(dead_code)]
pub fn make_trip(
    user_id: Uuid,
    classification: TripClassification,
    date: &str,
    distance_km: Option<f64>,
    co2_kg: Option<f64>,
) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        user_id: Some(user_id),
        vehicle_id: None,
        trip_date: Some(date.parse::<NaiveDate>().expect("valid test date")),
        origin_address: None,
        destination_address: None,
        distance_km,
        co2_emissions_kg: co2_kg,
        transport_mode: Some("voiture".to_string()),
        classification: Some(classification),
        created_at: None,
        vehicles: None,
    }
}

/// Create a test app with an in-memory trip store and offline Supabase mock.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(store: FakeTripStore) -> (Router, Arc<AppState>) {
    let config = Config::default();
    let db = SupabaseDb::new_mock();
    let state = Arc::new(AppState::with_trip_store(config, db, Arc::new(store)));
    (create_router(state.clone()), state)
}

/// Mint a session JWT the way Supabase auth would.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: Uuid, signing_key: &[u8]) -> String {
    carbyo_api::middleware::auth::create_jwt(user_id, signing_key).expect("JWT creation")
}
