//! HEMS core - reachability planning for helicopter emergency medical
//! services.
//!
//! Great-circle geometry, wind triangle, fuel policy and the reachability
//! engine that turns a fuel load and a departure point into the airports
//! within range. Everything here is synchronous and does no I/O; weather
//! comes in through `hems-weather`.

pub mod error;
pub mod fuel;
pub mod mission;
pub mod models;
pub mod performance;
pub mod reachability;
pub mod reference;
pub mod spatial;

pub use error::{ReachError, Result};
pub use fuel::{compute_fuel_budget, FuelAllowances, FuelBreakdown, FuelPolicy, FuelRow};
pub use mission::{
    derive_time_budget, plan_mission, MissionReport, ReachabilityRequest, TimeBudgetDerivation,
    DEFAULT_ELEVATION_FT,
};
pub use models::{
    Airport, GeoPoint, HelicopterBase, ReachabilityResult, WindComponents, WindVector,
};
pub use performance::{PerformanceProfile, PhasePerformance};
pub use reachability::{
    evaluate_candidate, nearest_airport, reachable_airports, FlightTimeBudget, ReachabilityEngine,
};
pub use spatial::{great_circle, ground_speed, haversine_distance_nm, GreatCircle};
