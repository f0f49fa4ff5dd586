// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::db::TripStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::kpi::Dashboard;
use crate::models::trip::{Trip, TripClassification, TransportMode};
use crate::models::vehicle::{EmissionFactor, VehicleEnergy, VehicleJoin};
use crate::period::DateWindow;
use crate::services::emissions;
use crate::services::vehicles::VehicleWithPhoto;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/trips", get(get_trips))
        .route("/api/vehicles", get(get_vehicles))
        .route("/api/vehicles", post(create_vehicle))
        .route("/api/vehicles/{id}", put(update_vehicle))
        .route("/api/vehicles/{id}", delete(delete_vehicle))
        .route("/api/factors/{energy}", get(get_factor))
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Deserialize)]
struct DashboardQuery {
    /// Reference date for the month windows; defaults to today (UTC)
    date: Option<NaiveDate>,
}

/// Get the KPI dashboard for the current user.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> Json<Dashboard> {
    let today = query.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let dashboard = state.dashboard.load_dashboard(user.user_id, today).await;
    Json(dashboard)
}

// ─── Trips ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct TripsQuery {
    /// Filter by classification ("perso", "pro", "domicile-travail")
    classification: Option<TripClassification>,
    /// Inclusive start date
    from: Option<NaiveDate>,
    /// Inclusive end date; requires `from`
    to: Option<NaiveDate>,
    /// Maximum rows returned
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    50
}

const MAX_LIMIT: u32 = 200;

/// One row of the trip list, with derived display fields.
#[derive(Serialize, Deserialize)]
pub struct TripSummary {
    pub id: Uuid,
    pub trip_date: Option<NaiveDate>,
    pub classification: Option<TripClassification>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    pub distance_km: Option<f64>,
    pub co2_emissions_kg: Option<f64>,
    pub mode: TransportMode,
    /// Per-trip intensity, g CO₂/km; `None` when not computable
    pub intensity_g_per_km: Option<f64>,
    pub vehicle: Option<VehicleJoin>,
}

impl From<Trip> for TripSummary {
    fn from(trip: Trip) -> Self {
        let mode = trip.mode();
        let intensity_g_per_km =
            emissions::intensity_g_per_km(trip.co2_emissions_kg, trip.distance_km);
        Self {
            id: trip.id,
            trip_date: trip.trip_date,
            classification: trip.classification,
            origin_address: trip.origin_address,
            destination_address: trip.destination_address,
            distance_km: trip.distance_km,
            co2_emissions_kg: trip.co2_emissions_kg,
            mode,
            intensity_g_per_km,
            vehicle: trip.vehicles,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct TripsResponse {
    pub trips: Vec<TripSummary>,
    pub count: usize,
}

/// List the user's trips, newest first.
async fn get_trips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TripsQuery>,
) -> Result<Json<TripsResponse>> {
    if query.limit == 0 || query.limit > MAX_LIMIT {
        return Err(AppError::BadRequest(format!(
            "'limit' must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let window = match (query.from, query.to) {
        (Some(start), end) => Some(DateWindow { start, end }),
        (None, Some(_)) => {
            return Err(AppError::BadRequest(
                "'to' requires 'from' to be set".to_string(),
            ))
        }
        (None, None) => None,
    };
    if let Some(DateWindow {
        start,
        end: Some(end),
    }) = window
    {
        if end < start {
            return Err(AppError::BadRequest(
                "'to' must not be before 'from'".to_string(),
            ));
        }
    }

    let trips = state
        .trip_store
        .fetch_trips(
            user.user_id,
            query.classification,
            window.as_ref(),
            Some(query.limit),
        )
        .await?;

    let summaries: Vec<TripSummary> = trips.into_iter().map(TripSummary::from).collect();
    let count = summaries.len();
    Ok(Json(TripsResponse {
        trips: summaries,
        count,
    }))
}

// ─── Vehicles ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VehiclesResponse {
    pub vehicles: Vec<VehicleWithPhoto>,
    pub count: usize,
}

/// List the user's vehicles with resolved photo URLs.
async fn get_vehicles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<VehiclesResponse>> {
    let vehicles = state.vehicles.list(user.user_id).await?;
    let count = vehicles.len();
    Ok(Json(VehiclesResponse { vehicles, count }))
}

#[derive(Deserialize, Validate)]
pub struct VehiclePayload {
    #[validate(length(min = 1, max = 32))]
    pub registration: String,
    pub energy: VehicleEnergy,
    /// Reference emission factor ("V7"), g/km
    #[validate(range(min = 0.0, max = 1000.0))]
    pub v7_emissions: Option<f64>,
    /// Storage path (or legacy absolute URL) of an already-uploaded photo
    #[validate(length(max = 512))]
    pub photo_url: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateVehicleResponse {
    pub id: Uuid,
}

/// Register a new vehicle for the user.
async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<VehiclePayload>,
) -> Result<Json<CreateVehicleResponse>> {
    payload.validate()?;

    let id = state
        .vehicles
        .create(
            user.user_id,
            &payload.registration,
            payload.energy,
            payload.v7_emissions,
            payload.photo_url,
        )
        .await?;

    Ok(Json(CreateVehicleResponse { id }))
}

#[derive(Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
}

/// Update one of the user's vehicles.
async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<VehiclePayload>,
) -> Result<Json<MutationResponse>> {
    payload.validate()?;

    state
        .vehicles
        .update(
            user.user_id,
            vehicle_id,
            &payload.registration,
            payload.energy,
            payload.v7_emissions,
            payload.photo_url,
        )
        .await?;

    Ok(Json(MutationResponse { success: true }))
}

/// Delete one of the user's vehicles.
async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<MutationResponse>> {
    state.vehicles.delete(user.user_id, vehicle_id).await?;
    Ok(Json(MutationResponse { success: true }))
}

// ─── Emission Factors ────────────────────────────────────────

/// Get the generic car emission factor for an energy type.
///
/// Returns `null` for energies without a generic factor.
async fn get_factor(
    State(state): State<Arc<AppState>>,
    Path(energy): Path<String>,
) -> Result<Json<Option<EmissionFactor>>> {
    let energy = VehicleEnergy::parse(&energy);
    let factor = state.factors.generic_car_factor(energy).await?;
    Ok(Json(factor))
}
