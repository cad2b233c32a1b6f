//! Fuel policy: fixed operational deductions from the fuel loaded, leaving
//! the trip fuel available for climb, cruise and descent.

use crate::error::{ensure_finite, ensure_non_negative, ReachError, Result};
use serde::{Deserialize, Serialize};

/// Fixed deductions applied by the operator's fuel policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelAllowances {
    pub system_test_and_air_taxi_kg: f64,
    pub final_reserve_kg: f64,
    pub air_taxi_to_parking_kg: f64,
    /// Fraction of the fuel left after the three fixed deductions above
    pub contingency_fraction: f64,
    /// Cruise time held back when no alternate is required (hours)
    pub final_cruise_hours: f64,
    pub approach_fuel_kg: f64,
    pub approach_fuel_with_alternate_kg: f64,
}

impl FuelAllowances {
    /// Every allowance must be a finite, non-negative amount.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative(
            "fuel.allowances.system_test_and_air_taxi_kg",
            self.system_test_and_air_taxi_kg,
        )?;
        ensure_non_negative("fuel.allowances.final_reserve_kg", self.final_reserve_kg)?;
        ensure_non_negative(
            "fuel.allowances.air_taxi_to_parking_kg",
            self.air_taxi_to_parking_kg,
        )?;
        ensure_non_negative("fuel.allowances.contingency_fraction", self.contingency_fraction)?;
        ensure_non_negative("fuel.allowances.final_cruise_hours", self.final_cruise_hours)?;
        ensure_non_negative("fuel.allowances.approach_fuel_kg", self.approach_fuel_kg)?;
        ensure_non_negative(
            "fuel.allowances.approach_fuel_with_alternate_kg",
            self.approach_fuel_with_alternate_kg,
        )?;
        Ok(())
    }
}

impl Default for FuelAllowances {
    fn default() -> Self {
        Self {
            system_test_and_air_taxi_kg: 37.0,
            final_reserve_kg: 100.0,
            air_taxi_to_parking_kg: 20.0,
            contingency_fraction: 0.1,
            final_cruise_hours: 0.25,
            approach_fuel_kg: 30.0,
            approach_fuel_with_alternate_kg: 60.0,
        }
    }
}

/// Fuel loaded and whether an alternate has to be carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPolicy {
    pub total_fuel_kg: f64,
    /// Alternate fuel in kg; `Some` means an alternate is required.
    #[serde(default)]
    pub alternate_fuel_kg: Option<f64>,
    #[serde(default)]
    pub allowances: FuelAllowances,
}

impl FuelPolicy {
    pub fn new(total_fuel_kg: f64) -> Self {
        Self {
            total_fuel_kg,
            alternate_fuel_kg: None,
            allowances: FuelAllowances::default(),
        }
    }

    pub fn with_alternate(mut self, alternate_fuel_kg: f64) -> Self {
        self.alternate_fuel_kg = Some(alternate_fuel_kg);
        self
    }

    pub fn alternate_required(&self) -> bool {
        self.alternate_fuel_kg.is_some()
    }

    /// Reject a non-finite fuel load and negative alternate fuel or
    /// allowances, which would add fuel instead of holding it back.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("fuel.total_fuel_kg", self.total_fuel_kg)?;
        if let Some(alternate) = self.alternate_fuel_kg {
            ensure_non_negative("fuel.alternate_fuel_kg", alternate)?;
        }
        self.allowances.validate()
    }
}

/// Every line item of the fuel policy plus the resulting trip fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelBreakdown {
    pub total_fuel_kg: f64,
    pub system_test_and_air_taxi_kg: f64,
    pub final_reserve_kg: f64,
    pub air_taxi_to_parking_kg: f64,
    pub contingency_kg: f64,
    /// Fifteen-minute cruise fuel; zero when an alternate is required
    pub final_cruise_kg: f64,
    pub alternate_fuel_kg: f64,
    pub approach_fuel_kg: f64,
    pub alternate_required: bool,
    /// May be negative when the deductions exceed the fuel loaded.
    pub trip_fuel_kg: f64,
}

/// One labelled row of the fuel policy table, rounded to whole kilograms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelRow {
    pub label: &'static str,
    pub fuel_kg: i64,
}

/// Apply the fuel policy to the fuel loaded.
///
/// Deduction order: system test/air taxi, final reserve, air taxi to
/// parking, contingency (a fraction of what remains after those three),
/// then either fifteen minutes of cruise fuel plus approach fuel, or the
/// alternate fuel plus the larger approach allowance.
pub fn compute_fuel_budget(policy: &FuelPolicy, cruise_fuel_burn_kgph: f64) -> FuelBreakdown {
    let a = &policy.allowances;
    let fixed = a.system_test_and_air_taxi_kg + a.final_reserve_kg + a.air_taxi_to_parking_kg;
    let contingency_kg = a.contingency_fraction * (policy.total_fuel_kg - fixed);
    let mut trip_fuel_kg = policy.total_fuel_kg - (fixed + contingency_kg);

    let (final_cruise_kg, alternate_fuel_kg, approach_fuel_kg) = match policy.alternate_fuel_kg {
        None => (cruise_fuel_burn_kgph * a.final_cruise_hours, 0.0, a.approach_fuel_kg),
        Some(alternate) => (0.0, alternate, a.approach_fuel_with_alternate_kg),
    };
    trip_fuel_kg -= final_cruise_kg;
    trip_fuel_kg -= alternate_fuel_kg + approach_fuel_kg;

    tracing::debug!(
        total_fuel_kg = policy.total_fuel_kg,
        contingency_kg,
        trip_fuel_kg,
        alternate_required = policy.alternate_required(),
        "fuel policy applied"
    );

    FuelBreakdown {
        total_fuel_kg: policy.total_fuel_kg,
        system_test_and_air_taxi_kg: a.system_test_and_air_taxi_kg,
        final_reserve_kg: a.final_reserve_kg,
        air_taxi_to_parking_kg: a.air_taxi_to_parking_kg,
        contingency_kg,
        final_cruise_kg,
        alternate_fuel_kg,
        approach_fuel_kg,
        alternate_required: policy.alternate_required(),
        trip_fuel_kg,
    }
}

impl FuelBreakdown {
    /// Fail when the deductions leave no trip fuel.
    pub fn check(&self) -> Result<()> {
        if self.trip_fuel_kg < 0.0 || !self.trip_fuel_kg.is_finite() {
            return Err(ReachError::FuelPolicyViolation {
                trip_fuel_kg: self.trip_fuel_kg,
            });
        }
        Ok(())
    }

    /// The policy as a table, in dispatch-sheet order.
    pub fn rows(&self) -> Vec<FuelRow> {
        let (reserve_label, reserve_kg) = if self.alternate_required {
            ("Alternate Fuel", self.alternate_fuel_kg)
        } else {
            ("15 Minutes Fuel", self.final_cruise_kg)
        };
        vec![
            row("System Test / Air Taxi", self.system_test_and_air_taxi_kg),
            row("Trip Fuel", self.trip_fuel_kg),
            row("Final Reserve", self.final_reserve_kg),
            row(reserve_label, reserve_kg),
            row("Approach Fuel", self.approach_fuel_kg),
            row("Air Taxi to Parking", self.air_taxi_to_parking_kg),
            row("Contingency Fuel", self.contingency_kg),
        ]
    }
}

fn row(label: &'static str, fuel_kg: f64) -> FuelRow {
    FuelRow {
        label,
        fuel_kg: fuel_kg.round() as i64,
    }
}
