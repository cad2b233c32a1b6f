//! Core data models for reachability queries.

use crate::error::{ensure_finite, ReachError, Result};
use serde::{Deserialize, Serialize};

/// A position in decimal degrees, optionally with an elevation in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_ft: Option<f64>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation_ft: None,
        }
    }

    pub fn with_elevation(mut self, elevation_ft: f64) -> Self {
        self.elevation_ft = Some(elevation_ft);
        self
    }

    /// Elevation in feet, or `fallback_ft` when unknown.
    pub fn elevation_or(&self, fallback_ft: f64) -> f64 {
        self.elevation_ft.unwrap_or(fallback_ft)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("lat", self.lat)?;
        ensure_finite("lon", self.lon)?;
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ReachError::InvalidConfiguration {
                field: "lat",
                value: self.lat,
            });
        }
        if let Some(elevation) = self.elevation_ft {
            ensure_finite("elevation_ft", elevation)?;
        }
        Ok(())
    }
}

/// A helicopter base (departure point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelicopterBase {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation_ft: f64,
}

impl HelicopterBase {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon).with_elevation(self.elevation_ft)
    }
}

/// An airport with an instrument approach (candidate destination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub icao: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation_ft: f64,
}

impl Airport {
    pub fn new(
        name: impl Into<String>,
        icao: impl Into<String>,
        lat: f64,
        lon: f64,
        elevation_ft: f64,
    ) -> Self {
        Self {
            name: name.into(),
            icao: icao.into(),
            lat,
            lon,
            elevation_ft,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon).with_elevation(self.elevation_ft)
    }
}

/// Wind as reported in aviation: the true direction the wind blows FROM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub direction_deg: f64,
    pub speed_kt: f64,
}

/// Wind resolved against a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindComponents {
    /// Positive when the wind opposes the direction of travel.
    pub headwind_kt: f64,
    /// Positive when the wind comes from the right of the course.
    pub crosswind_kt: f64,
}

impl WindVector {
    pub fn new(direction_deg: f64, speed_kt: f64) -> Self {
        Self {
            direction_deg: crate::spatial::normalize_deg(direction_deg),
            speed_kt,
        }
    }

    pub fn calm() -> Self {
        Self {
            direction_deg: 0.0,
            speed_kt: 0.0,
        }
    }

    pub fn is_calm(&self) -> bool {
        self.speed_kt == 0.0
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("wind.direction_deg", self.direction_deg)?;
        ensure_finite("wind.speed_kt", self.speed_kt)?;
        if self.speed_kt < 0.0 {
            return Err(ReachError::InvalidConfiguration {
                field: "wind.speed_kt",
                value: self.speed_kt,
            });
        }
        Ok(())
    }

    /// Split the wind into head- and crosswind relative to `course_deg`.
    pub fn components(&self, course_deg: f64) -> WindComponents {
        let relative = (course_deg - self.direction_deg).to_radians();
        WindComponents {
            headwind_kt: self.speed_kt * relative.cos(),
            crosswind_kt: -self.speed_kt * relative.sin(),
        }
    }
}

impl Default for WindVector {
    fn default() -> Self {
        Self::calm()
    }
}

/// A destination that can be reached within the cruise time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityResult {
    pub airport: Airport,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub ground_speed_kt: f64,
    pub time_hours: f64,
    pub fuel_required_kg: f64,
}
