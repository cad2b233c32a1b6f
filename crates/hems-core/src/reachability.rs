//! Reachability engine.
//!
//! For each candidate airport, computes the great-circle leg from the
//! departure point, the wind-corrected ground speed on that course and the
//! cruise time required. A candidate is reachable iff its ground speed is
//! strictly positive and the cruise time does not exceed the cruise budget.
//! Results are ordered by ascending distance.

use crate::error::{ensure_finite, ensure_positive, Result};
use crate::mission::{plan_mission, MissionReport, ReachabilityRequest};
use crate::models::{Airport, GeoPoint, ReachabilityResult, WindVector};
use crate::performance::PhasePerformance;
use crate::spatial::{great_circle, ground_speed_with};
use serde::{Deserialize, Serialize};

/// Flight time available, split by phase. All values in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightTimeBudget {
    pub total_hours: f64,
    pub climb_hours: f64,
    pub descent_hours: f64,
}

impl FlightTimeBudget {
    pub fn new(total_hours: f64, climb_hours: f64, descent_hours: f64) -> Self {
        Self {
            total_hours,
            climb_hours,
            descent_hours,
        }
    }

    /// Budget that is entirely cruise.
    pub fn cruise_only(cruise_hours: f64) -> Self {
        Self::new(cruise_hours, 0.0, 0.0)
    }

    pub fn cruise_hours(&self) -> f64 {
        self.total_hours - self.climb_hours - self.descent_hours
    }

    fn validate(&self) -> Result<()> {
        ensure_finite("budget.total_hours", self.total_hours)?;
        ensure_finite("budget.climb_hours", self.climb_hours)?;
        ensure_finite("budget.descent_hours", self.descent_hours)?;
        Ok(())
    }
}

/// Evaluate a single candidate. `None` means it is out of reach.
pub fn evaluate_candidate(
    origin: &GeoPoint,
    airport: &Airport,
    cruise_hours: f64,
    cruise: &PhasePerformance,
    wind: &WindVector,
) -> Option<ReachabilityResult> {
    let leg = great_circle(origin, &airport.position());
    let ground_speed_kt = ground_speed_with(cruise.speed_kt, wind, leg.bearing_deg);
    if ground_speed_kt <= 0.0 {
        tracing::trace!(icao = %airport.icao, ground_speed_kt, "excluded: no ground speed");
        return None;
    }

    let time_hours = leg.distance_nm / ground_speed_kt;
    if time_hours > cruise_hours {
        tracing::trace!(icao = %airport.icao, time_hours, cruise_hours, "excluded: beyond budget");
        return None;
    }

    Some(ReachabilityResult {
        airport: airport.clone(),
        distance_nm: leg.distance_nm,
        bearing_deg: leg.bearing_deg,
        ground_speed_kt,
        time_hours,
        // Climb and descent fuel are already taken out of the budget
        fuel_required_kg: time_hours * cruise.fuel_burn_kgph,
    })
}

/// All candidates reachable from `origin` within the cruise portion of
/// `budget`, sorted by ascending distance.
pub fn reachable_airports(
    origin: &GeoPoint,
    candidates: &[Airport],
    budget: &FlightTimeBudget,
    cruise: &PhasePerformance,
    wind: &WindVector,
) -> Result<Vec<ReachabilityResult>> {
    origin.validate()?;
    budget.validate()?;
    wind.validate()?;
    ensure_positive("cruise.speed_kt", cruise.speed_kt)?;
    ensure_positive("cruise.fuel_burn_kgph", cruise.fuel_burn_kgph)?;

    let cruise_hours = budget.cruise_hours();
    let mut results: Vec<ReachabilityResult> = candidates
        .iter()
        .filter_map(|airport| evaluate_candidate(origin, airport, cruise_hours, cruise, wind))
        .collect();

    results.sort_by(|a, b| a.distance_nm.total_cmp(&b.distance_nm));

    tracing::debug!(
        candidates = candidates.len(),
        reachable = results.len(),
        cruise_hours,
        "reachability evaluated"
    );
    Ok(results)
}

/// Closest airport to `point` accepted by `predicate`.
pub fn nearest_airport<'a, F>(point: &GeoPoint, airports: &'a [Airport], mut predicate: F) -> Option<&'a Airport>
where
    F: FnMut(&Airport) -> bool,
{
    airports
        .iter()
        .filter(|airport| predicate(airport))
        .map(|airport| (airport, great_circle(point, &airport.position()).distance_nm))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(airport, _)| airport)
}

/// A fixed candidate list queried with different departures, budgets and
/// winds.
#[derive(Debug, Clone)]
pub struct ReachabilityEngine {
    candidates: Vec<Airport>,
}

impl ReachabilityEngine {
    pub fn new(candidates: Vec<Airport>) -> Self {
        Self { candidates }
    }

    /// Engine over the built-in IFR airport table.
    pub fn with_reference_airports() -> Self {
        Self::new(crate::reference::airports())
    }

    pub fn candidates(&self) -> &[Airport] {
        &self.candidates
    }

    pub fn reachable(
        &self,
        origin: &GeoPoint,
        budget: &FlightTimeBudget,
        cruise: &PhasePerformance,
        wind: &WindVector,
    ) -> Result<Vec<ReachabilityResult>> {
        reachable_airports(origin, &self.candidates, budget, cruise, wind)
    }

    /// Fuel policy, time budget and reachability in one pass.
    pub fn plan(&self, request: &ReachabilityRequest) -> Result<MissionReport> {
        plan_mission(request, &self.candidates)
    }

    pub fn nearest<F>(&self, point: &GeoPoint, predicate: F) -> Option<&Airport>
    where
        F: FnMut(&Airport) -> bool,
    {
        nearest_airport(point, &self.candidates, predicate)
    }
}
