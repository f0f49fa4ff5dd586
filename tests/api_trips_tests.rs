// SPDX-License-Identifier: MIT

//! Trip listing and dashboard endpoint tests against the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use carbyo_api::models::kpi::Dashboard;
use carbyo_api::models::trip::{TransportMode, TripClassification};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

use common::{make_trip, FakeTripStore};

async fn get_json<T: serde::de::DeserializeOwned>(
    app: axum::Router,
    uri: &str,
    token: &str,
) -> (StatusCode, Option<T>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).ok();
    (status, body)
}

#[derive(serde::Deserialize)]
struct TripsBody {
    trips: Vec<TripRow>,
    count: usize,
}

#[derive(serde::Deserialize)]
struct TripRow {
    trip_date: Option<chrono::NaiveDate>,
    classification: Option<TripClassification>,
    mode: TransportMode,
    intensity_g_per_km: Option<f64>,
}

fn seeded_app(user: Uuid) -> axum::Router {
    let store = FakeTripStore::with_trips(vec![
        make_trip(user, TripClassification::Personal, "2026-08-02", Some(10.0), Some(1.2)),
        make_trip(user, TripClassification::Personal, "2026-08-05", Some(5.0), Some(0.5)),
        make_trip(user, TripClassification::Professional, "2026-08-03", Some(40.0), Some(4.0)),
        make_trip(user, TripClassification::Personal, "2026-07-12", Some(30.0), None),
    ]);
    let (app, state) = common::create_test_app(store);
    // The caller re-derives the token from state; keep state alive via app
    let _ = state;
    app
}

fn token_for(user: Uuid) -> String {
    common::create_test_jwt(user, &carbyo_api::config::Config::default().supabase_jwt_secret)
}

#[tokio::test]
async fn test_trips_sorted_newest_first() {
    let user = Uuid::new_v4();
    let (status, body) = get_json::<TripsBody>(seeded_app(user), "/api/trips", &token_for(user)).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("JSON body");
    assert_eq!(body.count, 4);
    let dates: Vec<_> = body
        .trips
        .iter()
        .map(|t| t.trip_date.unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2026-08-05", "2026-08-03", "2026-08-02", "2026-07-12"]);
}

#[tokio::test]
async fn test_trips_classification_filter() {
    let user = Uuid::new_v4();
    let (status, body) = get_json::<TripsBody>(
        seeded_app(user),
        "/api/trips?classification=pro",
        &token_for(user),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("JSON body");
    assert_eq!(body.count, 1);
    assert_eq!(
        body.trips[0].classification,
        Some(TripClassification::Professional)
    );
}

#[tokio::test]
async fn test_trips_date_window_filter() {
    let user = Uuid::new_v4();
    let (status, body) = get_json::<TripsBody>(
        seeded_app(user),
        "/api/trips?from=2026-08-01&to=2026-08-31",
        &token_for(user),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.expect("JSON body").count, 3);
}

#[tokio::test]
async fn test_trips_limit_applies_after_sort() {
    let user = Uuid::new_v4();
    let (status, body) =
        get_json::<TripsBody>(seeded_app(user), "/api/trips?limit=2", &token_for(user)).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("JSON body");
    assert_eq!(body.count, 2);
    assert_eq!(body.trips[0].trip_date.unwrap().to_string(), "2026-08-05");
}

#[tokio::test]
async fn test_trip_rows_carry_mode_and_intensity() {
    let user = Uuid::new_v4();
    let (_, body) = get_json::<TripsBody>(seeded_app(user), "/api/trips", &token_for(user)).await;

    let body = body.expect("JSON body");
    let newest = &body.trips[0]; // 2026-08-05: 5 km, 0.5 kg
    assert_eq!(newest.mode, TransportMode::Car);
    assert_eq!(newest.intensity_g_per_km, Some(100.0));

    // The July trip has no emissions value: intensity must be null, not 0
    let july = body.trips.last().unwrap();
    assert_eq!(july.intensity_g_per_km, None);
}

#[tokio::test]
async fn test_trips_are_scoped_to_the_token_user() {
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();
    let (status, body) =
        get_json::<TripsBody>(seeded_app(user), "/api/trips", &token_for(other)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.expect("JSON body").count, 0);
}

#[tokio::test]
async fn test_dashboard_endpoint_with_reference_date() {
    let user = Uuid::new_v4();
    let (status, body) = get_json::<Dashboard>(
        seeded_app(user),
        "/api/dashboard?date=2026-08-07",
        &token_for(user),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let dashboard = body.expect("JSON body");

    let month = dashboard.personal.month.expect("personal month tile");
    assert_eq!(month.aggregate.trip_count, 2);
    assert!((month.aggregate.total_emissions_kg - 1.7).abs() < 1e-9);

    // July baseline: one personal trip with no emissions recorded
    let trips_delta = month.comparison.trip_count.expect("trip delta");
    assert!((trips_delta.delta - 1.0).abs() < 1e-9);
    assert_eq!(trips_delta.percent_label().as_deref(), Some("+100%"));

    let total = dashboard.personal.total.expect("personal total tile");
    assert_eq!(total.aggregate.trip_count, 3);
}
