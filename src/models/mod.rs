// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod kpi;
pub mod trip;
pub mod vehicle;

pub use kpi::{Dashboard, KpiItem, PeriodAggregate, PeriodComparison};
pub use trip::{Trip, TripClassification};
pub use vehicle::{EmissionFactor, Vehicle, VehicleEnergy};
