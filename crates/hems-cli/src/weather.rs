//! Live data for the `reach` command: forecast wind at the departure and
//! METAR/TAF for the reachable airports.

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use hems_core::{Airport, GeoPoint, WindVector};
use hems_weather::{
    http, AvwxSource, DwdOpmetSource, FallbackSource, FetchError, Metar, Taf, WeatherSource,
    WindsAloftClient, WindsAloftSummary,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Where the planning wind came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum WindOrigin {
    Manual,
    Forecast {
        station: String,
        hours: usize,
        samples: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        freezing_level_ft: Option<u32>,
    },
}

/// A fetched report, or why it could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fetched {
    Raw(String),
    Error(String),
}

impl Fetched {
    pub fn raw(&self) -> Option<&str> {
        match self {
            Fetched::Raw(raw) => Some(raw),
            Fetched::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportWeather {
    pub icao: String,
    pub metar: Fetched,
    pub taf: Fetched,
    /// TS or CB anywhere in the decoded reports
    pub thunderstorm: bool,
}

impl AirportWeather {
    pub fn new(
        icao: impl Into<String>,
        metar: Result<Metar, FetchError>,
        taf: Result<Taf, FetchError>,
    ) -> Self {
        let thunderstorm = metar.as_ref().is_ok_and(|m| m.conditions.has_thunderstorm())
            || taf.as_ref().is_ok_and(Taf::has_thunderstorm);
        Self {
            icao: icao.into(),
            metar: match metar {
                Ok(metar) => Fetched::Raw(metar.raw),
                Err(e) => Fetched::Error(e.to_string()),
            },
            taf: match taf {
                Ok(taf) => Fetched::Raw(taf.raw),
                Err(e) => Fetched::Error(e.to_string()),
            },
            thunderstorm,
        }
    }
}

/// DWD OPMET first, AVWX when the mirror has nothing.
pub fn report_source(config: &Config) -> Result<Arc<dyn WeatherSource>> {
    let client = http::client(config.http_timeout).context("building HTTP client")?;
    let dwd = DwdOpmetSource::new(client.clone(), &config.dwd_url, config.dwd_credentials());
    let avwx = AvwxSource::new(client, &config.avwx_url, config.avwx_token.clone());
    Ok(Arc::new(FallbackSource::new(dwd, avwx)))
}

/// Fetch METAR and TAF for every airport concurrently, keeping input order.
/// Failures stay on their row.
pub async fn collect_weather(
    source: Arc<dyn WeatherSource>,
    airports: &[&Airport],
) -> Result<Vec<AirportWeather>> {
    let mut tasks = JoinSet::new();
    for (index, airport) in airports.iter().enumerate() {
        let source = Arc::clone(&source);
        let icao = airport.icao.clone();
        tasks.spawn(async move {
            let metar = source.fetch_metar(&icao).await;
            let taf = source.fetch_taf(&icao).await;
            (index, AirportWeather::new(icao, metar, taf))
        });
    }

    let mut rows = Vec::with_capacity(airports.len());
    while let Some(joined) = tasks.join_next().await {
        rows.push(joined.context("weather task failed")?);
    }
    rows.sort_by_key(|(index, _)| *index);
    let rows: Vec<_> = rows.into_iter().map(|(_, row)| row).collect();

    let failed = rows
        .iter()
        .filter(|row| row.metar.raw().is_none() || row.taf.raw().is_none())
        .count();
    tracing::info!(airports = rows.len(), failed, source = source.name(), "weather collected");
    Ok(rows)
}

/// Average 5000 ft wind over the first `hours` of the nearest DWD airport
/// forecast.
pub async fn forecast_wind(
    config: &Config,
    point: &GeoPoint,
    hours: usize,
) -> Result<(WindVector, WindOrigin)> {
    let client = http::client(config.http_timeout).context("building HTTP client")?;
    let winds = WindsAloftClient::new(client, &config.dwd_url, config.dwd_credentials());
    let (station, forecast) = winds
        .fetch(point)
        .await
        .context("fetching winds aloft forecast")?;
    let summary = forecast.summary(hours);
    let wind = wind_from_summary(&station, &summary)?;
    tracing::info!(
        station = %station.icao,
        direction_deg = wind.direction_deg,
        speed_kt = wind.speed_kt,
        samples = summary.samples,
        "using forecast wind"
    );
    Ok((
        wind,
        WindOrigin::Forecast {
            station: station.icao,
            hours,
            samples: summary.samples,
            freezing_level_ft: summary.freezing_level_ft,
        },
    ))
}

fn wind_from_summary(station: &Airport, summary: &WindsAloftSummary) -> Result<WindVector> {
    summary
        .wind
        .ok_or_else(|| anyhow!("forecast for {} has no usable 5000 ft wind", station.icao))
}
