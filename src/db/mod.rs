// SPDX-License-Identifier: MIT

//! Database layer (Supabase PostgREST).

pub mod supabase;

pub use supabase::SupabaseDb;

use crate::error::AppError;
use crate::models::trip::{Trip, TripClassification};
use crate::period::DateWindow;
use async_trait::async_trait;
use uuid::Uuid;

/// Table names as constants.
pub mod tables {
    pub const TRIPS: &str = "trips";
    pub const VEHICLES: &str = "vehicles";
    pub const EMISSION_FACTORS: &str = "emission_factors";
}

/// Read access to trip records, scoped to a user.
///
/// Injected into the dashboard service so tests can substitute an in-memory
/// fake. Implementations return trips sorted by trip date descending, with
/// the record-creation timestamp as tie-break when dates are absent.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn fetch_trips(
        &self,
        user_id: Uuid,
        classification: Option<TripClassification>,
        window: Option<&DateWindow>,
        limit: Option<u32>,
    ) -> Result<Vec<Trip>, AppError>;
}
