// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod dashboard;
pub mod emissions;
pub mod factors;
pub mod vehicles;

pub use dashboard::DashboardService;
pub use factors::EmissionFactorService;
pub use vehicles::VehicleService;
