// SPDX-License-Identifier: MIT

//! Supabase client wrapper with typed operations.
//!
//! Talks to PostgREST (`/rest/v1`) and Storage (`/storage/v1`) with the
//! service-role key. Row-level security still applies in the backend; every
//! query nevertheless filters explicitly by the owning user id.

use crate::config::Config;
use crate::db::{tables, TripStore};
use crate::error::AppError;
use crate::models::trip::{self, Trip, TripClassification};
use crate::models::vehicle::{EmissionFactor, Vehicle, VehicleEnergy};
use crate::period::DateWindow;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Columns selected for trip queries, including the vehicle join snapshot.
/// Must stay in sync with the `Trip` model so decoding never fails.
const TRIP_SELECT: &str = "id,user_id,vehicle_id,trip_date,origin_address,destination_address,\
                           distance_km,co2_emissions_kg,transport_mode,type_trajet,created_at,\
                           vehicles(id,owner_id,registration,brand,model,energy,v7_emissions,\
                           consumption_per_100km)";

const VEHICLE_SELECT: &str =
    "id,owner_id,registration,brand,model,energy,v7_emissions,photo_url,created_at";

/// Signed photo URLs expire after an hour.
const PHOTO_URL_TTL_SECS: u32 = 3600;

/// Supabase database client.
#[derive(Clone)]
pub struct SupabaseDb {
    inner: Option<Inner>,
}

#[derive(Clone)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

/// New vehicle payload, already normalized by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct NewVehicle {
    pub registration: String,
    pub energy: VehicleEnergy,
    pub v7_emissions: Option<f64>,
    pub photo_url: Option<String>,
}

impl SupabaseDb {
    /// Create a new Supabase client from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Some(Inner {
                http: reqwest::Client::new(),
                base_url: config.supabase_url.clone(),
                service_key: config.supabase_service_key.clone(),
            }),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { inner: None }
    }

    fn get_client(&self) -> Result<&Inner, AppError> {
        self.inner
            .as_ref()
            .ok_or_else(|| AppError::Supabase("Backend not connected (offline mode)".to_string()))
    }

    /// GET rows from a PostgREST table.
    async fn rest_get<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let client = self.get_client()?;
        let url = format!("{}/rest/v1/{}", client.base_url, table);

        let response = client
            .http
            .get(&url)
            .header("apikey", &client.service_key)
            .bearer_auth(&client.service_key)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        check_json(response).await
    }

    // ─── Trip Operations ─────────────────────────────────────────

    async fn query_trips(
        &self,
        user_id: Uuid,
        classification: Option<TripClassification>,
        window: Option<&DateWindow>,
        limit: Option<u32>,
    ) -> Result<Vec<Trip>, AppError> {
        let mut query: Vec<(&str, String)> = vec![
            ("select", TRIP_SELECT.to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("order", "trip_date.desc".to_string()),
        ];
        if let Some(classification) = classification {
            query.push((
                "type_trajet",
                format!("eq.{}", classification.as_column_value()),
            ));
        }
        if let Some(window) = window {
            query.push(("trip_date", format!("gte.{}", window.start)));
            if let Some(end) = window.end {
                query.push(("trip_date", format!("lte.{}", end)));
            }
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let mut trips: Vec<Trip> = self.rest_get(tables::TRIPS, &query).await?;

        // PostgREST cannot express the created_at fallback for undated rows,
        // so the full ordering is applied here.
        trip::sort_by_date_desc(&mut trips);

        tracing::debug!(
            user = %truncate_uid(user_id),
            count = trips.len(),
            "Fetched trips"
        );
        Ok(trips)
    }

    // ─── Vehicle Operations ──────────────────────────────────────

    /// All vehicles owned by a user, newest first.
    pub async fn fetch_vehicles(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        self.rest_get(
            tables::VEHICLES,
            &[
                ("select", VEHICLE_SELECT.to_string()),
                ("owner_id", format!("eq.{}", owner_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    /// Insert a vehicle and return its generated id.
    pub async fn insert_vehicle(
        &self,
        owner_id: Uuid,
        vehicle: &NewVehicle,
    ) -> Result<Uuid, AppError> {
        #[derive(Serialize)]
        struct VehicleInsert<'a> {
            owner_id: Uuid,
            #[serde(flatten)]
            vehicle: &'a NewVehicle,
        }

        #[derive(Deserialize)]
        struct InsertedRow {
            id: Uuid,
        }

        let client = self.get_client()?;
        let url = format!("{}/rest/v1/{}", client.base_url, tables::VEHICLES);

        let response = client
            .http
            .post(&url)
            .header("apikey", &client.service_key)
            .bearer_auth(&client.service_key)
            .header("Prefer", "return=representation")
            .query(&[("select", "id")])
            .json(&VehicleInsert { owner_id, vehicle })
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        let rows: Vec<InsertedRow> = check_json(response).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Supabase("Insert returned no row".to_string()))?;

        tracing::info!(owner = %truncate_uid(owner_id), vehicle_id = %row.id, "Vehicle created");
        Ok(row.id)
    }

    /// Update a vehicle. The owner filter makes cross-user updates a no-op.
    pub async fn update_vehicle(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        changes: &NewVehicle,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;
        let url = format!("{}/rest/v1/{}", client.base_url, tables::VEHICLES);

        let response = client
            .http
            .patch(&url)
            .header("apikey", &client.service_key)
            .bearer_auth(&client.service_key)
            .header("Prefer", "return=minimal")
            .query(&[
                ("id", format!("eq.{}", vehicle_id)),
                ("owner_id", format!("eq.{}", owner_id)),
            ])
            .json(changes)
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        check_status(response).await?;
        tracing::info!(owner = %truncate_uid(owner_id), vehicle_id = %vehicle_id, "Vehicle updated");
        Ok(())
    }

    /// Delete a vehicle. Irreversible; past trips keep their join snapshot.
    pub async fn delete_vehicle(&self, owner_id: Uuid, vehicle_id: Uuid) -> Result<(), AppError> {
        let client = self.get_client()?;
        let url = format!("{}/rest/v1/{}", client.base_url, tables::VEHICLES);

        let response = client
            .http
            .delete(&url)
            .header("apikey", &client.service_key)
            .bearer_auth(&client.service_key)
            .query(&[
                ("id", format!("eq.{}", vehicle_id)),
                ("owner_id", format!("eq.{}", owner_id)),
            ])
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        check_status(response).await?;
        tracing::info!(owner = %truncate_uid(owner_id), vehicle_id = %vehicle_id, "Vehicle deleted");
        Ok(())
    }

    // ─── Storage Operations ──────────────────────────────────────

    /// Create a signed URL for a photo path in the `vehicles` bucket.
    ///
    /// Returns `None` on failure: a missing photo must not break a vehicle
    /// listing.
    pub async fn sign_photo_url(&self, path: &str) -> Option<String> {
        #[derive(Deserialize)]
        struct SignResponse {
            #[serde(rename = "signedURL")]
            signed_url: String,
        }

        let client = self.get_client().ok()?;
        let url = format!(
            "{}/storage/v1/object/sign/vehicles/{}",
            client.base_url, path
        );

        let result = client
            .http
            .post(&url)
            .header("apikey", &client.service_key)
            .bearer_auth(&client.service_key)
            .json(&serde_json::json!({ "expiresIn": PHOTO_URL_TTL_SECS }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                let signed: SignResponse = response.json().await.ok()?;
                Some(format!("{}{}", client.base_url, signed.signed_url))
            }
            Ok(response) => {
                tracing::warn!(path, status = %response.status(), "Photo URL signing failed");
                None
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Photo URL signing failed");
                None
            }
        }
    }

    // ─── Emission Factor Operations ──────────────────────────────

    /// Generic car emission factor for a sub-mode, if one is active.
    pub async fn fetch_car_factor(
        &self,
        sub_mode: &str,
    ) -> Result<Option<EmissionFactor>, AppError> {
        let factors: Vec<EmissionFactor> = self
            .rest_get(
                tables::EMISSION_FACTORS,
                &[
                    ("select", "nom,valeur,factor_kgco2e_per_km".to_string()),
                    ("mode", "eq.car".to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("sub_mode", format!("eq.{}", sub_mode)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(factors.into_iter().next())
    }
}

#[async_trait]
impl TripStore for SupabaseDb {
    async fn fetch_trips(
        &self,
        user_id: Uuid,
        classification: Option<TripClassification>,
        window: Option<&DateWindow>,
        limit: Option<u32>,
    ) -> Result<Vec<Trip>, AppError> {
        self.query_trips(user_id, classification, window, limit)
            .await
    }
}

/// Check response status; decode a JSON body on success.
async fn check_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Supabase(format!("{}: {}", status, body)));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::Supabase(format!("Decode error: {}", e)))
}

/// Check response status, discarding any body.
async fn check_status(response: reqwest::Response) -> Result<(), AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Supabase(format!("{}: {}", status, body)));
    }
    Ok(())
}

/// Truncated user id for logs.
fn truncate_uid(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_is_offline() {
        let db = SupabaseDb::new_mock();
        let result = db.fetch_vehicles(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Supabase(_))));
    }

    #[tokio::test]
    async fn test_mock_client_signs_nothing() {
        let db = SupabaseDb::new_mock();
        assert_eq!(db.sign_photo_url("user/123.jpg").await, None);
    }

    #[test]
    fn test_truncate_uid() {
        let id: Uuid = "5f4e1cda-9f1a-44a0-8e9f-0d5a3b7f8e21".parse().unwrap();
        assert_eq!(truncate_uid(id), "5f4e1cda");
    }
}
