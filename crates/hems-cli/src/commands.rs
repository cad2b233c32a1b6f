//! Subcommand execution. Output goes to the writer handed in; logs go
//! through `tracing`.

use crate::args::{Cli, Command, DecodeArgs, FuelArgs, ListArgs, ReachArgs};
use crate::config::Config;
use crate::render;
use crate::weather::{self, AirportWeather, WindOrigin};
use anyhow::{Context, Result};
use chrono::Utc;
use hems_core::reference::{airports, find_airport, find_base, helicopter_bases};
use hems_core::{
    compute_fuel_budget, Airport, GeoPoint, MissionReport, ReachabilityEngine,
    ReachabilityRequest,
};
use hems_weather::{Metar, Taf};
use serde::Serialize;
use std::io::Write;

/// JSON shape of `reach --json`: the mission report plus where the wind
/// came from and any weather collected.
#[derive(Debug, Serialize)]
pub struct ReachOutput {
    pub departure: String,
    pub wind_origin: WindOrigin,
    #[serde(flatten)]
    pub report: MissionReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<AirportWeather>,
}

#[derive(Debug, Serialize)]
struct Decoded {
    #[serde(skip_serializing_if = "Option::is_none")]
    metar: Option<Metar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taf: Option<Taf>,
}

pub async fn run<W: Write>(cli: Cli, config: &Config, out: &mut W) -> Result<()> {
    tracing::debug!(avwx = %config.avwx_url, dwd = %config.dwd_url, "configuration loaded");
    match cli.command {
        Command::Reach(args) => reach(&args, config, out).await,
        Command::Fuel(args) => fuel(&args, out),
        Command::Decode(args) => decode(&args, out),
        Command::Bases(args) => bases(&args, out),
        Command::Airports(args) => list_airports(&args, out),
    }
}

fn departure(args: &ReachArgs) -> Result<(String, GeoPoint)> {
    match &args.airport {
        Some(icao) => {
            let airport = find_airport(icao)?;
            Ok((format!("{} {}", airport.icao, airport.name), airport.position()))
        }
        None => {
            let base = find_base(args.base_query())?;
            Ok((base.name.clone(), base.position()))
        }
    }
}

pub async fn reach<W: Write>(args: &ReachArgs, config: &Config, out: &mut W) -> Result<()> {
    let (name, origin) = departure(args)?;
    let performance = args.profile.resolve()?;

    let (wind, wind_origin) = if args.live_wind {
        weather::forecast_wind(config, &origin, args.wind_hours).await?
    } else {
        (args.manual_wind(), WindOrigin::Manual)
    };

    let request = ReachabilityRequest {
        origin,
        performance,
        fuel: args.fuel.policy(),
        cruise_altitude_ft: args.altitude,
        wind,
    };
    let engine = ReachabilityEngine::with_reference_airports();
    let report = engine
        .plan(&request)
        .with_context(|| format!("planning from {name}"))?;
    tracing::info!(
        departure = %name,
        reachable = report.results.len(),
        cruise_hours = report.time.budget.cruise_hours(),
        "mission planned"
    );

    let weather = if args.weather {
        let nearest: Vec<&Airport> = report
            .results
            .iter()
            .take(args.weather_limit)
            .map(|result| &result.airport)
            .collect();
        let source = weather::report_source(config)?;
        weather::collect_weather(source, &nearest).await?
    } else {
        Vec::new()
    };

    if args.json {
        let output = ReachOutput {
            departure: name,
            wind_origin,
            report,
            weather,
        };
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        render::write_reach_table(out, &name, &report, &wind_origin, &weather)?;
    }
    Ok(())
}

pub fn fuel<W: Write>(args: &FuelArgs, out: &mut W) -> Result<()> {
    let performance = args.profile.resolve()?;
    let breakdown = compute_fuel_budget(&args.fuel.policy(), performance.cruise.fuel_burn_kgph);
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &breakdown)?;
        writeln!(out)?;
    } else {
        render::write_fuel_table(out, &breakdown)?;
    }
    Ok(())
}

pub fn decode<W: Write>(args: &DecodeArgs, out: &mut W) -> Result<()> {
    let decoded = Decoded {
        metar: args
            .metar
            .as_deref()
            .map(Metar::parse)
            .transpose()
            .context("decoding METAR")?,
        taf: args
            .taf
            .as_deref()
            .map(Taf::parse)
            .transpose()
            .context("decoding TAF")?,
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &decoded)?;
        writeln!(out)?;
        return Ok(());
    }
    let now = Utc::now();
    if let Some(metar) = &decoded.metar {
        render::write_metar(out, metar, now)?;
    }
    if let Some(taf) = &decoded.taf {
        if decoded.metar.is_some() {
            writeln!(out)?;
        }
        render::write_taf(out, taf, now)?;
    }
    Ok(())
}

fn bases<W: Write>(args: &ListArgs, out: &mut W) -> Result<()> {
    let bases = helicopter_bases();
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &bases)?;
        writeln!(out)?;
    } else {
        render::write_bases(out, &bases)?;
    }
    Ok(())
}

fn list_airports<W: Write>(args: &ListArgs, out: &mut W) -> Result<()> {
    let airports = airports();
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &airports)?;
        writeln!(out)?;
    } else {
        render::write_airports(out, &airports)?;
    }
    Ok(())
}
