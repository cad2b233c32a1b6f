//! Aircraft performance per flight phase.

use crate::error::{ensure_positive, ReachError, Result};
use serde::{Deserialize, Serialize};

/// Speed, fuel flow and (for climb/descend) vertical rate of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePerformance {
    pub speed_kt: f64,
    pub fuel_burn_kgph: f64,
    /// Climb or descend rate in feet per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_fpm: Option<f64>,
}

impl PhasePerformance {
    pub fn level(speed_kt: f64, fuel_burn_kgph: f64) -> Self {
        Self {
            speed_kt,
            fuel_burn_kgph,
            rate_fpm: None,
        }
    }

    pub fn vertical(speed_kt: f64, fuel_burn_kgph: f64, rate_fpm: f64) -> Self {
        Self {
            speed_kt,
            fuel_burn_kgph,
            rate_fpm: Some(rate_fpm),
        }
    }
}

/// Climb, cruise and descend performance of an aircraft type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub climb: PhasePerformance,
    pub cruise: PhasePerformance,
    pub descend: PhasePerformance,
}

impl PerformanceProfile {
    /// Airbus H145 D2 planning figures.
    pub fn h145d2() -> Self {
        Self {
            climb: PhasePerformance::vertical(90.0, 250.0, 900.0),
            cruise: PhasePerformance::level(115.0, 240.0),
            descend: PhasePerformance::vertical(110.0, 220.0, 500.0),
        }
    }

    /// Check every speed, burn and vertical rate is usable as a divisor.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("climb.speed_kt", self.climb.speed_kt)?;
        ensure_positive("climb.fuel_burn_kgph", self.climb.fuel_burn_kgph)?;
        ensure_positive("cruise.speed_kt", self.cruise.speed_kt)?;
        ensure_positive("cruise.fuel_burn_kgph", self.cruise.fuel_burn_kgph)?;
        ensure_positive("descend.speed_kt", self.descend.speed_kt)?;
        ensure_positive("descend.fuel_burn_kgph", self.descend.fuel_burn_kgph)?;
        self.climb_rate_fpm()?;
        self.descend_rate_fpm()?;
        if let Some(rate) = self.cruise.rate_fpm {
            ensure_positive("cruise.rate_fpm", rate)?;
        }
        Ok(())
    }

    pub fn climb_rate_fpm(&self) -> Result<f64> {
        let rate = self.climb.rate_fpm.ok_or(ReachError::InvalidConfiguration {
            field: "climb.rate_fpm",
            value: f64::NAN,
        })?;
        ensure_positive("climb.rate_fpm", rate)
    }

    pub fn descend_rate_fpm(&self) -> Result<f64> {
        let rate = self.descend.rate_fpm.ok_or(ReachError::InvalidConfiguration {
            field: "descend.rate_fpm",
            value: f64::NAN,
        })?;
        ensure_positive("descend.rate_fpm", rate)
    }
}

impl Default for PerformanceProfile {
    fn default() -> Self {
        Self::h145d2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h145d2_profile_is_valid() {
        let profile = PerformanceProfile::h145d2();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.cruise.speed_kt, 115.0);
        assert_eq!(profile.cruise.fuel_burn_kgph, 240.0);
        assert_eq!(profile.climb_rate_fpm(), Ok(900.0));
        assert_eq!(profile.descend_rate_fpm(), Ok(500.0));
    }

    #[test]
    fn zero_cruise_speed_is_invalid() {
        let mut profile = PerformanceProfile::h145d2();
        profile.cruise.speed_kt = 0.0;
        assert_eq!(
            profile.validate(),
            Err(ReachError::InvalidConfiguration {
                field: "cruise.speed_kt",
                value: 0.0
            })
        );
    }

    #[test]
    fn missing_climb_rate_is_invalid() {
        let mut profile = PerformanceProfile::h145d2();
        profile.climb.rate_fpm = None;
        assert!(matches!(
            profile.validate(),
            Err(ReachError::InvalidConfiguration {
                field: "climb.rate_fpm",
                ..
            })
        ));
    }

    #[test]
    fn negative_descend_rate_is_invalid() {
        let mut profile = PerformanceProfile::h145d2();
        profile.descend.rate_fpm = Some(-500.0);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn profile_deserializes_without_cruise_rate() {
        let json = r#"{
            "climb": {"speed_kt": 90, "fuel_burn_kgph": 250, "rate_fpm": 900},
            "cruise": {"speed_kt": 120, "fuel_burn_kgph": 245},
            "descend": {"speed_kt": 110, "fuel_burn_kgph": 220, "rate_fpm": 500}
        }"#;
        let profile: PerformanceProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.cruise.rate_fpm, None);
        assert_eq!(profile.cruise.speed_kt, 120.0);
        assert!(profile.validate().is_ok());
    }
}
