//! Mission planning: turns a request (departure, aircraft, fuel, altitude,
//! wind) into a flight-time budget and runs the reachability engine on it.

use crate::error::{ensure_finite, Result};
use crate::fuel::{compute_fuel_budget, FuelBreakdown, FuelPolicy};
use crate::models::{Airport, GeoPoint, ReachabilityResult, WindVector};
use crate::performance::PerformanceProfile;
use crate::reachability::{reachable_airports, FlightTimeBudget};
use serde::{Deserialize, Serialize};

/// Elevation assumed when a departure has none, and the nominal destination
/// elevation used for the descent before the destination is known.
pub const DEFAULT_ELEVATION_FT: f64 = 500.0;

/// Everything one reachability query depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityRequest {
    pub origin: GeoPoint,
    #[serde(default)]
    pub performance: PerformanceProfile,
    pub fuel: FuelPolicy,
    pub cruise_altitude_ft: f64,
    #[serde(default)]
    pub wind: WindVector,
}

/// Intermediate values of the time budget derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBudgetDerivation {
    pub budget: FlightTimeBudget,
    pub climb_fuel_kg: f64,
    pub descent_fuel_kg: f64,
    /// Trip fuel left for cruise once climb and descent are paid for
    pub cruise_fuel_kg: f64,
}

/// Output of [`plan_mission`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub origin: GeoPoint,
    pub cruise_altitude_ft: f64,
    pub wind: WindVector,
    pub fuel: FuelBreakdown,
    pub time: TimeBudgetDerivation,
    pub results: Vec<ReachabilityResult>,
}

/// Split the trip fuel into climb, descent and cruise time.
///
/// Climb runs from the departure elevation (500 ft when unknown) to cruise
/// altitude; descent runs from cruise altitude to a nominal 500 ft. Neither
/// is negative when the cruise altitude is below those elevations.
pub fn derive_time_budget(
    request: &ReachabilityRequest,
    trip_fuel_kg: f64,
) -> Result<TimeBudgetDerivation> {
    let profile = &request.performance;
    let climb_rate = profile.climb_rate_fpm()?;
    let descend_rate = profile.descend_rate_fpm()?;

    let departure_elevation_ft = request.origin.elevation_or(DEFAULT_ELEVATION_FT);
    let climb_ft = (request.cruise_altitude_ft - departure_elevation_ft).max(0.0);
    let descent_ft = (request.cruise_altitude_ft - DEFAULT_ELEVATION_FT).max(0.0);

    let climb_hours = climb_ft / climb_rate / 60.0;
    let descent_hours = descent_ft / descend_rate / 60.0;

    let climb_fuel_kg = climb_hours * profile.climb.fuel_burn_kgph;
    let descent_fuel_kg = descent_hours * profile.descend.fuel_burn_kgph;
    let cruise_fuel_kg = trip_fuel_kg - (climb_fuel_kg + descent_fuel_kg);
    let cruise_hours = cruise_fuel_kg / profile.cruise.fuel_burn_kgph;

    Ok(TimeBudgetDerivation {
        budget: FlightTimeBudget::new(
            climb_hours + cruise_hours + descent_hours,
            climb_hours,
            descent_hours,
        ),
        climb_fuel_kg,
        descent_fuel_kg,
        cruise_fuel_kg,
    })
}

/// Apply the fuel policy, derive the time budget and collect the reachable
/// airports among `candidates`.
///
/// Fails with `FuelPolicyViolation` when the policy leaves negative trip
/// fuel, and with `InvalidConfiguration` for an unusable profile or wind.
pub fn plan_mission(request: &ReachabilityRequest, candidates: &[Airport]) -> Result<MissionReport> {
    request.performance.validate()?;
    request.origin.validate()?;
    request.wind.validate()?;
    ensure_finite("cruise_altitude_ft", request.cruise_altitude_ft)?;
    request.fuel.validate()?;

    let fuel = compute_fuel_budget(&request.fuel, request.performance.cruise.fuel_burn_kgph);
    fuel.check()?;

    let time = derive_time_budget(request, fuel.trip_fuel_kg)?;
    if time.cruise_fuel_kg < 0.0 {
        tracing::debug!(
            cruise_fuel_kg = time.cruise_fuel_kg,
            "trip fuel does not cover climb and descent"
        );
    }

    let results = reachable_airports(
        &request.origin,
        candidates,
        &time.budget,
        &request.performance.cruise,
        &request.wind,
    )?;

    Ok(MissionReport {
        origin: request.origin,
        cruise_altitude_ft: request.cruise_altitude_ft,
        wind: request.wind,
        fuel,
        time,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReachError;

    fn request() -> ReachabilityRequest {
        ReachabilityRequest {
            // Christoph 77 Mainz
            origin: GeoPoint::new(50.0, 8.2711).with_elevation(479.0),
            performance: PerformanceProfile::h145d2(),
            fuel: FuelPolicy::new(500.0),
            cruise_altitude_ft: 5000.0,
            wind: WindVector::calm(),
        }
    }

    #[test]
    fn budget_for_default_mission() {
        let time = derive_time_budget(&request(), 218.7).unwrap();
        // (5000 - 479) / 900 / 60
        assert!((time.budget.climb_hours - 0.083722).abs() < 1e-5);
        // (5000 - 500) / 500 / 60
        assert!((time.budget.descent_hours - 0.15).abs() < 1e-12);
        assert!((time.climb_fuel_kg - 20.9306).abs() < 1e-3);
        assert!((time.descent_fuel_kg - 33.0).abs() < 1e-9);
        assert!((time.cruise_fuel_kg - 164.7694).abs() < 1e-3);
        assert!((time.budget.cruise_hours() - 0.686539).abs() < 1e-5);
    }

    #[test]
    fn unknown_departure_elevation_falls_back_to_500ft() {
        let mut req = request();
        req.origin.elevation_ft = None;
        let time = derive_time_budget(&req, 218.7).unwrap();
        assert!((time.budget.climb_hours - 4500.0 / 900.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn departure_above_cruise_altitude_needs_no_climb() {
        let mut req = request();
        req.origin.elevation_ft = Some(6000.0);
        let time = derive_time_budget(&req, 218.7).unwrap();
        assert_eq!(time.budget.climb_hours, 0.0);
    }

    #[test]
    fn plan_mission_reports_fuel_time_and_results() {
        let airports = crate::reference::airports();
        let report = plan_mission(&request(), &airports).unwrap();

        assert!((report.fuel.trip_fuel_kg - 218.7).abs() < 1e-9);
        assert!(!report.results.is_empty());
        let cruise_hours = report.time.budget.cruise_hours();
        assert!(report.results.iter().all(|r| r.time_hours <= cruise_hours));
        assert!(report
            .results
            .windows(2)
            .all(|w| w[0].distance_nm <= w[1].distance_nm));
        // Wiesbaden and Frankfurt are next door
        assert!(report.results.iter().any(|r| r.airport.icao == "ETOU"));
        assert!(report.results.iter().any(|r| r.airport.icao == "EDDF"));
        // Hamburg is far beyond 40 minutes of cruise
        assert!(report.results.iter().all(|r| r.airport.icao != "EDDH"));
    }

    #[test]
    fn plan_mission_rejects_negative_trip_fuel() {
        let mut req = request();
        req.fuel = FuelPolicy::new(200.0);
        assert!(matches!(
            plan_mission(&req, &[]),
            Err(ReachError::FuelPolicyViolation { .. })
        ));
    }

    #[test]
    fn plan_mission_rejects_invalid_profile() {
        let mut req = request();
        req.performance.descend.rate_fpm = Some(0.0);
        assert!(matches!(
            plan_mission(&req, &[]),
            Err(ReachError::InvalidConfiguration {
                field: "descend.rate_fpm",
                ..
            })
        ));
    }

    #[test]
    fn plan_mission_rejects_negative_alternate_fuel() {
        let mut req = request();
        req.fuel = FuelPolicy::new(500.0).with_alternate(0.0);
        let report = plan_mission(&req, &[]).unwrap();
        assert!((report.fuel.trip_fuel_kg - 248.7).abs() < 1e-9);

        req.fuel = FuelPolicy::new(500.0).with_alternate(-500.0);
        assert!(matches!(
            plan_mission(&req, &[]),
            Err(ReachError::InvalidConfiguration {
                field: "fuel.alternate_fuel_kg",
                ..
            })
        ));

        req.fuel = FuelPolicy::new(500.0).with_alternate(f64::NAN);
        assert!(plan_mission(&req, &[]).is_err());
    }

    #[test]
    fn plan_mission_rejects_negative_allowances() {
        let mut req = request();
        req.fuel.allowances.final_reserve_kg = -100.0;
        assert!(matches!(
            plan_mission(&req, &[]),
            Err(ReachError::InvalidConfiguration {
                field: "fuel.allowances.final_reserve_kg",
                ..
            })
        ));

        let mut req = request();
        req.fuel.allowances.contingency_fraction = f64::INFINITY;
        assert!(plan_mission(&req, &[]).is_err());
    }

    #[test]
    fn request_round_trips_through_json_with_defaults() {
        let json = r#"{
            "origin": {"lat": 50.0, "lon": 8.2711, "elevation_ft": 479},
            "fuel": {"total_fuel_kg": 500},
            "cruise_altitude_ft": 5000
        }"#;
        let req: ReachabilityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.performance, PerformanceProfile::h145d2());
        assert_eq!(req.wind, WindVector::calm());
        assert_eq!(req.fuel.alternate_fuel_kg, None);
        assert_eq!(req, request());
    }
}
