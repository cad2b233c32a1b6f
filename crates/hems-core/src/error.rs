//! Error taxonomy for caller-supplied configuration.
//!
//! Unreachable destinations are not errors; they are simply absent from the
//! result set.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReachError {
    /// A speed, burn rate, vertical rate, wind or coordinate value the math
    /// cannot work with (zero, negative or non-finite).
    #[error("invalid configuration: {field} = {value}")]
    InvalidConfiguration { field: &'static str, value: f64 },

    /// Fixed fuel deductions exceed the fuel loaded.
    #[error("fuel policy violation: trip fuel is {trip_fuel_kg:.1} kg after deductions")]
    FuelPolicyViolation { trip_fuel_kg: f64 },

    /// No base or airport matches the given name or ICAO code.
    #[error("unknown location: {0}")]
    UnknownLocation(String),
}

pub type Result<T> = std::result::Result<T, ReachError>;

/// Reject zero, negative and non-finite values.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ReachError::InvalidConfiguration { field, value })
    }
}

/// Reject negative and non-finite values; zero is allowed.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ReachError::InvalidConfiguration { field, value })
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ReachError::InvalidConfiguration { field, value })
    }
}
