//! Winds aloft from the DWD airport weather forecast.
//!
//! `{base}/aviation/ATM/AirportWxForecast/` holds one directory per station
//! (`eddf/`, `eddm/`, ...), each with timestamped
//! `airport_forecast_{icao}_*` files. A file is a semicolon-separated table
//! starting at a `DATE;` header row, with one forecast column per hour:
//!
//! ```text
//! DATE;18.06.;18.06.;18.06.
//! UTC;12;13;14
//! 5000FT;250/15;260/18;260/20
//! FZLVL;85;87;90
//! ```

use crate::error::{FetchError, Product};
use crate::http::{decode_text, directory_url, get_bytes, get_text, Credentials};
use crate::listing::{latest_matching, resolve_href, station_directories};
use hems_core::reference;
use hems_core::spatial::{great_circle, normalize_deg};
use hems_core::{Airport, GeoPoint, WindVector};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FORECAST_PATH: &str = "aviation/ATM/AirportWxForecast";

/// The rows of one airport forecast the planner uses. Columns line up
/// across rows; unreadable cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportForecast {
    pub icao: String,
    pub hours_utc: Vec<Option<u32>>,
    pub wind_5000ft: Vec<Option<WindVector>>,
    pub freezing_level_ft: Vec<Option<u32>>,
}

/// Averages over the first hours of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindsAloftSummary {
    /// Vector-mean direction and mean speed at 5000 ft, whole degrees/knots
    pub wind: Option<WindVector>,
    /// Lowest freezing level in the window
    pub freezing_level_ft: Option<u32>,
    /// Number of wind cells averaged
    pub samples: usize,
}

impl AirportForecast {
    pub fn parse(bytes: &[u8], icao: &str) -> Result<Self, FetchError> {
        let text = decode_text(bytes);
        let lines: Vec<&str> = text.lines().collect();
        let header = lines
            .iter()
            .position(|line| line.starts_with("DATE;"))
            .ok_or_else(|| FetchError::parse(Product::AirportForecast, "DATE; header not found"))?;

        let mut hours: Option<Vec<Option<u32>>> = None;
        let mut winds: Option<Vec<Option<WindVector>>> = None;
        let mut freezing: Option<Vec<Option<u32>>> = None;
        for line in &lines[header..] {
            let cells: Vec<&str> = line.split(';').map(str::trim).collect();
            let [label, values @ ..] = cells.as_slice() else {
                continue;
            };
            if values.is_empty() {
                continue;
            }
            // First occurrence of each row wins
            match *label {
                "UTC" if hours.is_none() => {
                    hours = Some(values.iter().map(|cell| parse_hour(cell)).collect());
                }
                "5000FT" if winds.is_none() => {
                    winds = Some(values.iter().map(|cell| parse_wind_cell(cell)).collect());
                }
                "FZLVL" if freezing.is_none() => {
                    freezing = Some(values.iter().map(|cell| parse_freezing_level(cell)).collect());
                }
                _ => {}
            }
        }

        if hours.is_none() && winds.is_none() && freezing.is_none() {
            return Err(FetchError::parse(
                Product::AirportForecast,
                "no UTC, 5000FT or FZLVL rows",
            ));
        }

        Ok(Self {
            icao: icao.trim().to_uppercase(),
            hours_utc: hours.unwrap_or_default(),
            wind_5000ft: winds.unwrap_or_default(),
            freezing_level_ft: freezing.unwrap_or_default(),
        })
    }

    /// Summarise the first `hours` columns. Empty data gives `None`, never
    /// zero.
    pub fn summary(&self, hours: usize) -> WindsAloftSummary {
        let winds: Vec<WindVector> = self
            .wind_5000ft
            .iter()
            .take(hours)
            .flatten()
            .copied()
            .collect();

        let wind = if winds.is_empty() {
            None
        } else {
            let (sin, cos) = winds.iter().fold((0.0_f64, 0.0_f64), |(sin, cos), wind| {
                let direction = wind.direction_deg.to_radians();
                (sin + direction.sin(), cos + direction.cos())
            });
            let direction = normalize_deg(sin.atan2(cos).to_degrees()).round();
            let speed = winds.iter().map(|wind| wind.speed_kt).sum::<f64>() / winds.len() as f64;
            Some(WindVector::new(direction, speed.round()))
        };

        let freezing_level_ft = self
            .freezing_level_ft
            .iter()
            .take(hours)
            .flatten()
            .copied()
            .min();

        WindsAloftSummary {
            wind,
            freezing_level_ft,
            samples: winds.len(),
        }
    }
}

fn parse_hour(cell: &str) -> Option<u32> {
    let hour: u32 = cell.split(':').next()?.trim().parse().ok()?;
    (hour <= 24).then_some(hour)
}

/// `ddd/ss`, possibly followed by further space-separated values.
fn parse_wind_cell(cell: &str) -> Option<WindVector> {
    let (direction, speed) = cell.split_whitespace().next()?.split_once('/')?;
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(direction) || !all_digits(speed) {
        return None;
    }
    Some(WindVector::new(direction.parse().ok()?, speed.parse().ok()?))
}

/// Freezing level in hundreds of feet.
fn parse_freezing_level(cell: &str) -> Option<u32> {
    let hundreds: f64 = cell.parse().ok()?;
    (hundreds.is_finite() && hundreds >= 0.0).then(|| (hundreds * 100.0).round() as u32)
}

/// Lists the DWD forecast directory and fetches the forecast nearest to a
/// point.
#[derive(Debug, Clone)]
pub struct WindsAloftClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    airports: Vec<Airport>,
}

impl WindsAloftClient {
    /// `dwd_base_url` is the server root, e.g. `https://data.dwd.de`.
    pub fn new(client: Client, dwd_base_url: &str, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            base_url: directory_url(dwd_base_url, FORECAST_PATH),
            credentials,
            airports: reference::airports(),
        }
    }

    /// Replace the candidate airports (default: the reference table).
    pub fn with_airports(mut self, airports: Vec<Airport>) -> Self {
        self.airports = airports;
        self
    }

    /// Lowercase ICAO codes that have a forecast directory.
    pub async fn stations(&self) -> Result<HashSet<String>, FetchError> {
        let listing = get_text(&self.client, &self.base_url, self.credentials.as_ref()).await?;
        Ok(station_directories(&listing).into_iter().collect())
    }

    /// Latest forecast file of one station.
    pub async fn fetch_station(&self, icao: &str) -> Result<AirportForecast, FetchError> {
        let station = icao.trim().to_lowercase();
        let directory = resolve_href(&self.base_url, &format!("{}/", station))?;
        let listing = get_text(&self.client, &directory, self.credentials.as_ref()).await?;

        let href = latest_matching(&listing, &format!("airport_forecast_{}_", station))
            .ok_or_else(|| FetchError::not_found(icao, Product::AirportForecast))?;
        let url = resolve_href(&directory, href)?;
        tracing::debug!(icao, url = %url, "latest airport forecast");

        let bytes = get_bytes(&self.client, &url, self.credentials.as_ref()).await?;
        AirportForecast::parse(&bytes, icao)
    }

    /// Forecast of the nearest airport that publishes one. Stations whose
    /// directory holds no forecast file are skipped in favour of the next
    /// nearest.
    pub async fn fetch(&self, point: &GeoPoint) -> Result<(Airport, AirportForecast), FetchError> {
        let stations = self.stations().await?;
        let candidates = nearest_with_forecast(point, &self.airports, &stations);
        tracing::debug!(
            stations = stations.len(),
            candidates = candidates.len(),
            "forecast directory listed"
        );

        for airport in candidates {
            match self.fetch_station(&airport.icao).await {
                Ok(forecast) => {
                    tracing::info!(icao = %airport.icao, name = %airport.name, "using airport forecast");
                    return Ok((airport.clone(), forecast));
                }
                Err(FetchError::NotFound { .. }) => {
                    tracing::warn!(icao = %airport.icao, "no forecast file, trying next nearest airport");
                }
                Err(err) => return Err(err),
            }
        }

        Err(FetchError::NoStation {
            lat: point.lat,
            lon: point.lon,
        })
    }
}

/// Airports with a forecast directory, nearest first.
pub fn nearest_with_forecast<'a>(
    point: &GeoPoint,
    airports: &'a [Airport],
    stations: &HashSet<String>,
) -> Vec<&'a Airport> {
    let mut candidates: Vec<(&Airport, f64)> = airports
        .iter()
        .filter(|airport| stations.contains(&airport.icao.to_lowercase()))
        .map(|airport| (airport, great_circle(point, &airport.position()).distance_nm))
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
    candidates.into_iter().map(|(airport, _)| airport).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST: &str = "Airport Weather Forecast EDDF\r\n\
        issued 18.06.2024 06:00 UTC\r\n\
        DATE;18.06.;18.06.;18.06.;18.06.\r\n\
        UTC;12;13;14;15\r\n\
        SFC;240/08;250/10;250/12;260/10\r\n\
        5000FT;350/20;010/20;///;030/10 +02\r\n\
        FZLVL;95;87;90;\r\n\
        10000FT;270/30;270/32;280/35;280/35\r\n";

    #[test]
    fn parses_relevant_rows() {
        let forecast = AirportForecast::parse(FORECAST.as_bytes(), "eddf").unwrap();
        assert_eq!(forecast.icao, "EDDF");
        assert_eq!(forecast.hours_utc, [Some(12), Some(13), Some(14), Some(15)]);
        assert_eq!(forecast.wind_5000ft.len(), 4);
        assert_eq!(forecast.wind_5000ft[0], Some(WindVector::new(350.0, 20.0)));
        assert_eq!(forecast.wind_5000ft[2], None);
        assert_eq!(forecast.wind_5000ft[3], Some(WindVector::new(30.0, 10.0)));
        assert_eq!(forecast.freezing_level_ft, [Some(9500), Some(8700), Some(9000), None]);
    }

    #[test]
    fn direction_is_averaged_as_a_vector() {
        let forecast = AirportForecast::parse(FORECAST.as_bytes(), "EDDF").unwrap();
        let summary = forecast.summary(2);
        // 350 and 010 average to north, not 180
        let wind = summary.wind.unwrap();
        assert_eq!(wind.direction_deg, 0.0);
        assert_eq!(wind.speed_kt, 20.0);
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.freezing_level_ft, Some(8700));
    }

    #[test]
    fn unreadable_cells_are_skipped_in_the_average() {
        let forecast = AirportForecast::parse(FORECAST.as_bytes(), "EDDF").unwrap();
        let summary = forecast.summary(24);
        assert_eq!(summary.samples, 3);
        // mean of 20, 20, 10
        assert_eq!(summary.wind.unwrap().speed_kt, 17.0);
        assert_eq!(summary.freezing_level_ft, Some(8700));
    }

    #[test]
    fn empty_window_gives_none_not_zero() {
        let forecast = AirportForecast::parse(FORECAST.as_bytes(), "EDDF").unwrap();
        let summary = forecast.summary(0);
        assert_eq!(summary.wind, None);
        assert_eq!(summary.freezing_level_ft, None);
        assert_eq!(summary.samples, 0);
    }

    #[test]
    fn latin1_file_is_decoded() {
        let mut bytes = b"Flughafen N\xfcrnberg\n".to_vec();
        bytes.extend_from_slice(b"DATE;18.06.\nUTC;12\n5000FT;270/15\n");
        let forecast = AirportForecast::parse(&bytes, "EDDN").unwrap();
        assert_eq!(forecast.summary(1).wind, Some(WindVector::new(270.0, 15.0)));
        assert!(forecast.freezing_level_ft.is_empty());
    }

    #[test]
    fn missing_header_or_rows_is_a_parse_error() {
        assert!(matches!(
            AirportForecast::parse(b"UTC;12\n5000FT;270/15\n", "EDDF"),
            Err(FetchError::Parse {
                product: Product::AirportForecast,
                ..
            })
        ));
        assert!(AirportForecast::parse(b"DATE;18.06.\nSFC;270/05\n", "EDDF").is_err());
    }

    #[test]
    fn nearest_station_with_forecast_comes_first() {
        let airports = reference::airports();
        let stations: HashSet<String> = ["eddh", "eddf", "eddm"].into_iter().map(String::from).collect();
        // Christoph 77 Mainz
        let point = GeoPoint::new(50.0, 8.2711);
        let ordered = nearest_with_forecast(&point, &airports, &stations);
        let codes: Vec<&str> = ordered.iter().map(|a| a.icao.as_str()).collect();
        assert_eq!(codes, ["EDDF", "EDDM", "EDDH"]);
    }
}
