//! Spherical-earth navigation math: great-circle distance, initial bearing
//! and wind-corrected ground speed.

use crate::models::{GeoPoint, WindVector};
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 1 km = 0.539957 NM.
pub const NM_PER_KM: f64 = 0.539957;

/// Distance and initial course between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreatCircle {
    pub distance_nm: f64,
    /// Forward azimuth from origin toward destination, in [0, 360).
    pub bearing_deg: f64,
}

/// Great-circle distance and initial bearing from `origin` to `destination`.
///
/// Identical points yield distance 0 and bearing 0.
pub fn great_circle(origin: &GeoPoint, destination: &GeoPoint) -> GreatCircle {
    GreatCircle {
        distance_nm: haversine_distance_nm(origin.lat, origin.lon, destination.lat, destination.lon),
        bearing_deg: initial_bearing_deg(origin.lat, origin.lon, destination.lat, destination.lon),
    }
}

/// Calculate distance between two points in kilometers using the Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance in nautical miles.
pub fn haversine_distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance_km(lat1, lon1, lat2, lon2) * NM_PER_KM
}

/// Initial bearing from point 1 to point 2 in degrees, 0 = north, 90 = east.
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_deg(y.atan2(x).to_degrees())
}

/// Wrap an angle into [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Ground speed along `course_deg` for a given airspeed and wind.
///
/// `wind_direction_deg` is the direction the wind blows FROM. The wind
/// component along the course, `wind * cos(course - wind_direction)`, is a
/// headwind when positive and is subtracted from the airspeed. No clamping:
/// zero or negative means the course cannot be flown.
pub fn ground_speed(
    cruise_speed_kt: f64,
    wind_speed_kt: f64,
    wind_direction_deg: f64,
    course_deg: f64,
) -> f64 {
    let wind_component = wind_speed_kt * (course_deg - wind_direction_deg).to_radians().cos();
    cruise_speed_kt - wind_component
}

/// [`ground_speed`] for a [`WindVector`].
pub fn ground_speed_with(cruise_speed_kt: f64, wind: &WindVector, course_deg: f64) -> f64 {
    ground_speed(cruise_speed_kt, wind.speed_kt, wind.direction_deg, course_deg)
}
