// SPDX-License-Identifier: MIT

//! Carbyo: track trips and the CO₂ they cost.
//!
//! This crate provides the backend API for the Carbyo clients: it fetches
//! trip and vehicle records from Supabase, reduces them into per-period
//! aggregates, and serves display-ready dashboard KPIs with
//! period-over-period deltas and emission intensity.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod period;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::{SupabaseDb, TripStore};
use services::{DashboardService, EmissionFactorService, VehicleService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: SupabaseDb,
    /// Trip repository used by the dashboard and trip listing; injected so
    /// tests can substitute an in-memory fake.
    pub trip_store: Arc<dyn TripStore>,
    pub dashboard: DashboardService,
    pub vehicles: VehicleService,
    pub factors: EmissionFactorService,
}

impl AppState {
    /// Wire the standard production state on top of a Supabase client.
    pub fn new(config: Config, db: SupabaseDb) -> Self {
        let trip_store: Arc<dyn TripStore> = Arc::new(db.clone());
        Self {
            config,
            dashboard: DashboardService::new(trip_store.clone()),
            vehicles: VehicleService::new(db.clone()),
            factors: EmissionFactorService::new(db.clone()),
            trip_store,
            db,
        }
    }

    /// State with a custom trip store (tests inject in-memory fakes here).
    pub fn with_trip_store(config: Config, db: SupabaseDb, trip_store: Arc<dyn TripStore>) -> Self {
        Self {
            config,
            dashboard: DashboardService::new(trip_store.clone()),
            vehicles: VehicleService::new(db.clone()),
            factors: EmissionFactorService::new(db.clone()),
            trip_store,
            db,
        }
    }
}
