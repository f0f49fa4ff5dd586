// SPDX-License-Identifier: MIT

//! Vehicle management service.

use uuid::Uuid;

use crate::db::supabase::NewVehicle;
use crate::db::SupabaseDb;
use crate::error::Result;
use crate::models::vehicle::{normalize_registration, Vehicle, VehicleEnergy};

/// A vehicle with its photo reference resolved to a fetchable URL.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VehicleWithPhoto {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    /// Fetchable photo URL, `None` when absent or signing failed
    pub photo: Option<String>,
}

/// Owner-scoped vehicle operations.
#[derive(Clone)]
pub struct VehicleService {
    db: SupabaseDb,
}

impl VehicleService {
    pub fn new(db: SupabaseDb) -> Self {
        Self { db }
    }

    /// List the owner's vehicles, newest first, with photo URLs resolved.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<VehicleWithPhoto>> {
        let vehicles = self.db.fetch_vehicles(owner_id).await?;

        let mut resolved = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            let photo = self.resolve_photo_url(vehicle.photo_url.as_deref()).await;
            resolved.push(VehicleWithPhoto { vehicle, photo });
        }
        Ok(resolved)
    }

    /// Create a vehicle. Registration is normalized (trim + uppercase).
    pub async fn create(
        &self,
        owner_id: Uuid,
        registration: &str,
        energy: VehicleEnergy,
        v7_emissions: Option<f64>,
        photo_url: Option<String>,
    ) -> Result<Uuid> {
        let vehicle = NewVehicle {
            registration: normalize_registration(registration),
            energy,
            v7_emissions,
            photo_url,
        };
        self.db.insert_vehicle(owner_id, &vehicle).await
    }

    /// Update a vehicle the owner holds.
    pub async fn update(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        registration: &str,
        energy: VehicleEnergy,
        v7_emissions: Option<f64>,
        photo_url: Option<String>,
    ) -> Result<()> {
        let changes = NewVehicle {
            registration: normalize_registration(registration),
            energy,
            v7_emissions,
            photo_url,
        };
        self.db.update_vehicle(owner_id, vehicle_id, &changes).await
    }

    /// Delete a vehicle. Past trips keep their join snapshot.
    pub async fn delete(&self, owner_id: Uuid, vehicle_id: Uuid) -> Result<()> {
        self.db.delete_vehicle(owner_id, vehicle_id).await
    }

    /// Resolve a stored photo reference to a fetchable URL.
    ///
    /// Legacy rows hold absolute URLs which pass through untouched; newer
    /// rows hold a storage path that gets a signed URL.
    async fn resolve_photo_url(&self, photo_url: Option<&str>) -> Option<String> {
        let path = photo_url?.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        self.db.sign_photo_url(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_legacy_absolute_photo_url_passes_through() {
        let service = VehicleService::new(SupabaseDb::new_mock());
        let url = service
            .resolve_photo_url(Some("https://cdn.example.com/v.jpg"))
            .await;
        assert_eq!(url.as_deref(), Some("https://cdn.example.com/v.jpg"));
    }

    #[tokio::test]
    async fn test_empty_photo_reference_resolves_to_none() {
        let service = VehicleService::new(SupabaseDb::new_mock());
        assert_eq!(service.resolve_photo_url(None).await, None);
        assert_eq!(service.resolve_photo_url(Some("  ")).await, None);
    }
}
