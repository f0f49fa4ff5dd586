// SPDX-License-Identifier: MIT

//! Vehicle records and emission-factor reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vehicle energy type. Stored lowercase in the `energy` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleEnergy {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
    Hydrogen,
    Other,
}

impl VehicleEnergy {
    /// Emission-factor sub-mode for generic car factors. Hydrogen and other
    /// have no reference factor row.
    pub fn sub_mode(&self) -> Option<&'static str> {
        match self {
            VehicleEnergy::Gasoline => Some("petrol"),
            VehicleEnergy::Diesel => Some("diesel"),
            VehicleEnergy::Electric => Some("electric"),
            VehicleEnergy::Hybrid => Some("hybrid"),
            VehicleEnergy::Hydrogen | VehicleEnergy::Other => None,
        }
    }

    /// Parse from a stored or user-entered label (French or English).
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "essence" | "gasoline" => VehicleEnergy::Gasoline,
            "diesel" => VehicleEnergy::Diesel,
            "électrique" | "electrique" | "electric" => VehicleEnergy::Electric,
            "hybride" | "hybrid" => VehicleEnergy::Hybrid,
            "hydrogène" | "hydrogene" | "hydrogen" => VehicleEnergy::Hydrogen,
            _ => VehicleEnergy::Other,
        }
    }
}

/// A user-owned vehicle as stored in the `vehicles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Registration plate, normalized to trimmed uppercase on write
    pub registration: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub energy: VehicleEnergy,
    /// Reference emission factor from the registration document ("V7"), g/km
    pub v7_emissions: Option<f64>,
    /// Storage path or legacy absolute URL of the vehicle photo
    pub photo_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Vehicle snapshot joined onto trip rows.
///
/// Every field is optional: the join carries whatever the row held when the
/// trip was recorded, and vehicle deletion does not rewrite past trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleJoin {
    pub id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub registration: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub energy: Option<VehicleEnergy>,
    /// g/km
    pub v7_emissions: Option<f64>,
    pub consumption_per_100km: Option<f64>,
}

/// Generic emission factor row from the `emission_factors` table.
///
/// Column names are inherited from the backend schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionFactor {
    #[serde(rename = "nom")]
    pub name: Option<String>,
    #[serde(rename = "valeur")]
    pub value: Option<f64>,
    pub factor_kgco2e_per_km: Option<f64>,
}

/// Normalize a registration plate the way the mobile clients always have:
/// trimmed and uppercased.
pub fn normalize_registration(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_parse_french_labels() {
        assert_eq!(VehicleEnergy::parse("Essence"), VehicleEnergy::Gasoline);
        assert_eq!(VehicleEnergy::parse("électrique"), VehicleEnergy::Electric);
        assert_eq!(VehicleEnergy::parse("Hybride"), VehicleEnergy::Hybrid);
        assert_eq!(VehicleEnergy::parse("gpl"), VehicleEnergy::Other);
    }

    #[test]
    fn test_energy_sub_mode_mapping() {
        assert_eq!(VehicleEnergy::Gasoline.sub_mode(), Some("petrol"));
        assert_eq!(VehicleEnergy::Hydrogen.sub_mode(), None);
        assert_eq!(VehicleEnergy::Other.sub_mode(), None);
    }

    #[test]
    fn test_energy_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&VehicleEnergy::Gasoline).unwrap(),
            "\"gasoline\""
        );
        let e: VehicleEnergy = serde_json::from_str("\"hydrogen\"").unwrap();
        assert_eq!(e, VehicleEnergy::Hydrogen);
    }

    #[test]
    fn test_normalize_registration() {
        assert_eq!(normalize_registration("  ab-123-cd \n"), "AB-123-CD");
    }
}
