// SPDX-License-Identifier: MIT

//! Generic emission-factor lookup.

use crate::db::SupabaseDb;
use crate::error::Result;
use crate::models::vehicle::{EmissionFactor, VehicleEnergy};

/// Looks up reference emission factors for vehicle energies.
#[derive(Clone)]
pub struct EmissionFactorService {
    db: SupabaseDb,
}

impl EmissionFactorService {
    pub fn new(db: SupabaseDb) -> Self {
        Self { db }
    }

    /// Fetch the active generic car factor for an energy type.
    ///
    /// Energies without a sub-mode mapping (hydrogen, other) have no generic
    /// factor and resolve to `None` without a backend round-trip.
    pub async fn generic_car_factor(
        &self,
        energy: VehicleEnergy,
    ) -> Result<Option<EmissionFactor>> {
        let Some(sub_mode) = energy.sub_mode() else {
            return Ok(None);
        };

        let factor = self.db.fetch_car_factor(sub_mode).await?;
        if factor.is_none() {
            tracing::debug!(sub_mode, "No active emission factor found");
        }
        Ok(factor)
    }
}
