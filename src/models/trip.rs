// SPDX-License-Identifier: MIT

//! Trip records as stored in the Supabase `trips` table.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle::VehicleJoin;

/// Trip purpose tag. Stored in the `type_trajet` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripClassification {
    #[serde(rename = "perso")]
    Personal,
    #[serde(rename = "pro")]
    Professional,
    #[serde(rename = "domicile-travail")]
    Commute,
}

impl TripClassification {
    /// Backend column value for PostgREST filters.
    pub fn as_column_value(&self) -> &'static str {
        match self {
            TripClassification::Personal => "perso",
            TripClassification::Professional => "pro",
            TripClassification::Commute => "domicile-travail",
        }
    }
}

/// A single recorded journey.
///
/// Distance and emissions are independently optional: not every trip has a
/// completed calculation, and absence must stay distinguishable from zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    /// Owning user
    pub user_id: Option<Uuid>,
    /// Vehicle used, when the mode involves one
    pub vehicle_id: Option<Uuid>,
    /// Calendar date of the trip (date-only backend column)
    pub trip_date: Option<NaiveDate>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    /// Distance traveled in kilometers
    pub distance_km: Option<f64>,
    /// Emissions in kilograms of CO₂-equivalent
    pub co2_emissions_kg: Option<f64>,
    /// Raw transport mode tag (free text upstream)
    pub transport_mode: Option<String>,
    #[serde(rename = "type_trajet")]
    pub classification: Option<TripClassification>,
    /// Record creation timestamp; sort fallback when `trip_date` is absent
    pub created_at: Option<DateTime<Utc>>,
    /// Vehicle join snapshot from the query, if any
    #[serde(default)]
    pub vehicles: Option<VehicleJoin>,
}

impl Trip {
    /// Normalized transport mode for display grouping.
    pub fn mode(&self) -> TransportMode {
        TransportMode::parse(self.transport_mode.as_deref())
    }
}

/// Recognized transport modes, normalized from free-text tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    Plane,
    Train,
    Bike,
    Motorcycle,
    Bus,
    Subway,
    Other,
}

impl TransportMode {
    /// Parse a raw tag. Accepts the French and English labels the mobile
    /// clients have historically written; anything unrecognized is `Other`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return TransportMode::Other;
        };
        match raw.to_lowercase().as_str() {
            "voiture" | "car" | "automobile" => TransportMode::Car,
            "avion" | "plane" | "airplane" => TransportMode::Plane,
            "train" => TransportMode::Train,
            "vélo" | "velo" | "bike" | "bicycle" => TransportMode::Bike,
            "moto" | "motorcycle" => TransportMode::Motorcycle,
            "bus" => TransportMode::Bus,
            "métro" | "metro" | "subway" => TransportMode::Subway,
            _ => TransportMode::Other,
        }
    }
}

/// Sort trips by trip date descending; trips with a date come before trips
/// without one, and undated pairs fall back to creation timestamp descending.
pub fn sort_by_date_desc(trips: &mut [Trip]) {
    trips.sort_by(compare_by_date_desc);
}

fn compare_by_date_desc(a: &Trip, b: &Trip) -> Ordering {
    match (a.trip_date, b.trip_date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(date: Option<&str>, created: Option<&str>) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            user_id: None,
            vehicle_id: None,
            trip_date: date.map(|d| d.parse().unwrap()),
            origin_address: None,
            destination_address: None,
            distance_km: None,
            co2_emissions_kg: None,
            transport_mode: None,
            classification: None,
            created_at: created.map(|c| c.parse().unwrap()),
            vehicles: None,
        }
    }

    #[test]
    fn test_sort_date_desc() {
        let mut trips = vec![
            trip(Some("2026-07-01"), None),
            trip(Some("2026-07-20"), None),
            trip(Some("2026-07-10"), None),
        ];
        sort_by_date_desc(&mut trips);
        let dates: Vec<_> = trips.iter().map(|t| t.trip_date.unwrap()).collect();
        assert_eq!(
            dates,
            vec![
                "2026-07-20".parse::<NaiveDate>().unwrap(),
                "2026-07-10".parse().unwrap(),
                "2026-07-01".parse().unwrap(),
            ]
        );
    }

    #[test]
    fn test_dated_trips_sort_before_undated() {
        let mut trips = vec![
            trip(None, Some("2026-07-25T10:00:00Z")),
            trip(Some("2026-07-01"), None),
        ];
        sort_by_date_desc(&mut trips);
        assert!(trips[0].trip_date.is_some());
        assert!(trips[1].trip_date.is_none());
    }

    #[test]
    fn test_undated_pairs_fall_back_to_created_at() {
        let mut trips = vec![
            trip(None, Some("2026-07-01T08:00:00Z")),
            trip(None, Some("2026-07-02T08:00:00Z")),
        ];
        sort_by_date_desc(&mut trips);
        assert_eq!(
            trips[0].created_at.unwrap().to_rfc3339(),
            "2026-07-02T08:00:00+00:00"
        );
    }

    #[test]
    fn test_transport_mode_parsing() {
        assert_eq!(TransportMode::parse(Some("Voiture")), TransportMode::Car);
        assert_eq!(TransportMode::parse(Some("car")), TransportMode::Car);
        assert_eq!(TransportMode::parse(Some("avion")), TransportMode::Plane);
        assert_eq!(TransportMode::parse(Some("métro")), TransportMode::Subway);
        assert_eq!(TransportMode::parse(Some("trottinette")), TransportMode::Other);
        assert_eq!(TransportMode::parse(None), TransportMode::Other);
    }

    #[test]
    fn test_classification_column_values() {
        assert_eq!(TripClassification::Personal.as_column_value(), "perso");
        assert_eq!(TripClassification::Professional.as_column_value(), "pro");
        assert_eq!(
            TripClassification::Commute.as_column_value(),
            "domicile-travail"
        );
    }

    #[test]
    fn test_trip_deserializes_backend_row() {
        let json = r#"{
            "id": "5f4e1cda-9f1a-44a0-8e9f-0d5a3b7f8e21",
            "user_id": null,
            "vehicle_id": null,
            "trip_date": "2026-07-14",
            "origin_address": "Lyon",
            "destination_address": "Paris",
            "distance_km": 465.0,
            "co2_emissions_kg": 51.2,
            "transport_mode": "voiture",
            "type_trajet": "pro",
            "created_at": "2026-07-14T18:22:05Z"
        }"#;
        let t: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(t.classification, Some(TripClassification::Professional));
        assert_eq!(t.mode(), TransportMode::Car);
        assert!(t.vehicles.is_none());
    }
}
