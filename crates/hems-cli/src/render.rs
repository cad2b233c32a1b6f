//! Plain-text tables for the terminal.

use crate::weather::{AirportWeather, Fetched, WindOrigin};
use chrono::{DateTime, Utc};
use hems_core::{Airport, FuelBreakdown, HelicopterBase, MissionReport, WindVector};
use hems_weather::{
    ChangeGroup, ChangeKind, Conditions, DayTime, Metar, Taf, TrendKind, WindDirection,
};
use std::io::{self, Write};

pub fn wind_label(wind: &WindVector) -> String {
    if wind.is_calm() {
        "calm".to_string()
    } else {
        format!("{:03.0}°/{:.0} kt", wind.direction_deg, wind.speed_kt)
    }
}

fn minutes(hours: f64) -> String {
    format!("{:.0} min", hours * 60.0)
}

fn wind_origin_label(origin: &WindOrigin) -> String {
    match origin {
        WindOrigin::Manual => "manual".to_string(),
        WindOrigin::Forecast {
            station,
            hours,
            samples,
            freezing_level_ft,
        } => {
            let mut label = format!("{station} forecast, {samples} of {hours} h");
            if let Some(fzl) = freezing_level_ft {
                label.push_str(&format!(", FZLVL {fzl} ft"));
            }
            label
        }
    }
}

/// Header, reachable airports and, when collected, their METAR/TAF.
pub fn write_reach_table<W: Write>(
    out: &mut W,
    departure: &str,
    report: &MissionReport,
    wind_origin: &WindOrigin,
    weather: &[AirportWeather],
) -> io::Result<()> {
    let budget = &report.time.budget;
    writeln!(
        out,
        "Departure  {departure} ({:.4}, {:.4})",
        report.origin.lat, report.origin.lon
    )?;
    writeln!(
        out,
        "Wind       {} at {:.0} ft ({})",
        wind_label(&report.wind),
        report.cruise_altitude_ft,
        wind_origin_label(wind_origin)
    )?;
    writeln!(
        out,
        "Fuel       {:.0} kg loaded, {:.0} kg trip fuel",
        report.fuel.total_fuel_kg, report.fuel.trip_fuel_kg
    )?;
    writeln!(
        out,
        "Budget     {} cruise (climb {}, descent {})",
        minutes(budget.cruise_hours()),
        minutes(budget.climb_hours),
        minutes(budget.descent_hours)
    )?;
    writeln!(out)?;

    if report.results.is_empty() {
        writeln!(out, "No airport reachable with the fuel loaded.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<5} {:<40} {:>7} {:>4} {:>6} {:>8} {:>7}",
        "ICAO", "Airport", "Dist NM", "Brg", "GS kt", "Time min", "Fuel kg"
    )?;
    for result in &report.results {
        writeln!(
            out,
            "{:<5} {:<40} {:>7.1} {:>4} {:>6.0} {:>8.0} {:>7.0}",
            result.airport.icao,
            result.airport.name,
            result.distance_nm,
            format!("{:03.0}", result.bearing_deg),
            result.ground_speed_kt,
            result.time_hours * 60.0,
            result.fuel_required_kg
        )?;
        if let Some(row) = weather.iter().find(|w| w.icao == result.airport.icao) {
            if row.thunderstorm {
                writeln!(out, "      ! thunderstorm reported or forecast")?;
            }
            write_fetched(out, "METAR", &row.metar)?;
            write_fetched(out, "TAF", &row.taf)?;
        }
    }
    Ok(())
}

fn write_fetched<W: Write>(out: &mut W, label: &str, fetched: &Fetched) -> io::Result<()> {
    match fetched {
        Fetched::Raw(raw) => writeln!(out, "      {label:<5} {raw}"),
        Fetched::Error(error) => writeln!(out, "      {label:<5} unavailable: {error}"),
    }
}

pub fn write_fuel_table<W: Write>(out: &mut W, breakdown: &FuelBreakdown) -> io::Result<()> {
    let alternate = if breakdown.alternate_required {
        "alternate required"
    } else {
        "no alternate"
    };
    writeln!(
        out,
        "Fuel policy, {:.0} kg loaded, {alternate}",
        breakdown.total_fuel_kg
    )?;
    for row in breakdown.rows() {
        writeln!(out, "  {:<24} {:>6} kg", row.label, row.fuel_kg)?;
    }
    if breakdown.trip_fuel_kg < 0.0 {
        writeln!(out, "  Deductions exceed the fuel loaded.")?;
    }
    Ok(())
}

pub fn write_bases<W: Write>(out: &mut W, bases: &[HelicopterBase]) -> io::Result<()> {
    writeln!(out, "{:<40} {:>9} {:>9} {:>7}", "Base", "Lat", "Lon", "Elev ft")?;
    for base in bases {
        writeln!(
            out,
            "{:<40} {:>9.4} {:>9.4} {:>7.0}",
            base.name, base.lat, base.lon, base.elevation_ft
        )?;
    }
    Ok(())
}

pub fn write_airports<W: Write>(out: &mut W, airports: &[Airport]) -> io::Result<()> {
    writeln!(
        out,
        "{:<5} {:<40} {:>9} {:>9} {:>7}",
        "ICAO", "Airport", "Lat", "Lon", "Elev ft"
    )?;
    for airport in airports {
        writeln!(
            out,
            "{:<5} {:<40} {:>9.4} {:>9.4} {:>7.0}",
            airport.icao, airport.name, airport.lat, airport.lon, airport.elevation_ft
        )?;
    }
    Ok(())
}

fn day_time(stamp: &DayTime) -> String {
    format!("day {:02} {:02}:{:02}Z", stamp.day, stamp.hour, stamp.minute)
}

fn utc(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn write_conditions<W: Write>(out: &mut W, indent: &str, conditions: &Conditions) -> io::Result<()> {
    if let Some(wind) = &conditions.wind {
        let direction = match wind.direction {
            WindDirection::Degrees(deg) => format!("{deg:03}°"),
            WindDirection::Variable => "variable".to_string(),
        };
        let gust = wind
            .gust_kt
            .map(|g| format!(", gusts {g} kt"))
            .unwrap_or_default();
        let sector = conditions
            .variable_sector
            .map(|s| format!(", varying {:03}°-{:03}°", s.from_deg, s.to_deg))
            .unwrap_or_default();
        writeln!(out, "{indent}Wind        {direction} {} kt{gust}{sector}", wind.speed_kt)?;
    }
    if conditions.cavok {
        writeln!(out, "{indent}Visibility  CAVOK")?;
    } else if let Some(visibility) = conditions.visibility_m {
        if visibility >= hems_weather::groups::UNLIMITED_VISIBILITY_M {
            writeln!(out, "{indent}Visibility  10 km or more")?;
        } else {
            writeln!(out, "{indent}Visibility  {visibility} m")?;
        }
    }
    for weather in &conditions.weather {
        writeln!(out, "{indent}Weather     {} ({})", weather.description, weather.code)?;
    }
    if !conditions.clouds.is_empty() {
        let layers: Vec<String> = conditions
            .clouds
            .iter()
            .map(|layer| {
                let convective = layer.convective.as_deref().unwrap_or("");
                format!("{} {} ft{convective:>4}", layer.cover.code(), layer.height_ft)
                    .trim_end()
                    .to_string()
            })
            .collect();
        writeln!(out, "{indent}Clouds      {}", layers.join(", "))?;
    }
    if let Some(vv) = conditions.vertical_visibility_ft {
        writeln!(out, "{indent}Vert. vis.  {vv} ft")?;
    }
    if let Some(ceiling) = conditions.ceiling_ft() {
        writeln!(out, "{indent}Ceiling     {ceiling} ft")?;
    }
    Ok(())
}

/// `reference` places the day-of-month stamps on the calendar, normally
/// the current time.
pub fn write_metar<W: Write>(
    out: &mut W,
    metar: &Metar,
    reference: DateTime<Utc>,
) -> io::Result<()> {
    let auto = if metar.automatic { " (automatic)" } else { "" };
    writeln!(
        out,
        "METAR {} observed {}{auto}",
        metar.station,
        day_time(&metar.observed)
    )?;
    if let Some(observed) = metar.observed_at(reference) {
        writeln!(out, "  Observed    {}", utc(&observed))?;
    }
    write_conditions(out, "  ", &metar.conditions)?;
    if let (Some(temperature), Some(dewpoint)) = (metar.temperature_c, metar.dewpoint_c) {
        writeln!(out, "  Temp/Dew    {temperature} / {dewpoint} °C")?;
    }
    if let Some(qnh) = metar.qnh_hpa {
        writeln!(out, "  QNH         {qnh} hPa")?;
    }
    if let Some(trend) = &metar.trend {
        let kind = match trend.kind {
            TrendKind::Tempo => "TEMPO",
            TrendKind::Becoming => "BECMG",
            TrendKind::NoSignificantChange => "NOSIG",
        };
        writeln!(out, "  Trend       {kind} {}", trend.detail)?;
    }
    if let Some(remarks) = &metar.remarks {
        writeln!(out, "  Remarks     {remarks}")?;
    }
    Ok(())
}

fn change_label(change: &ChangeGroup) -> String {
    let kind = match change.kind {
        ChangeKind::Tempo => "TEMPO".to_string(),
        ChangeKind::Becoming => "BECMG".to_string(),
        ChangeKind::From => "FROM".to_string(),
        ChangeKind::Probability(p) => format!("PROB{p}"),
        ChangeKind::ProbabilityTempo(p) => format!("PROB{p} TEMPO"),
    };
    match (change.period, change.from) {
        (Some(period), _) => format!(
            "{kind} {:02}{:02}/{:02}{:02}",
            period.from.day, period.from.hour, period.to.day, period.to.hour
        ),
        (None, Some(from)) => format!("{kind} {}", day_time(&from)),
        (None, None) => kind,
    }
}

pub fn write_taf<W: Write>(out: &mut W, taf: &Taf, reference: DateTime<Utc>) -> io::Result<()> {
    let amended = if taf.amended { " (amended)" } else { "" };
    writeln!(
        out,
        "TAF {} issued {}{amended}, valid {:02}{:02}/{:02}{:02}",
        taf.station,
        day_time(&taf.issued),
        taf.validity.from.day,
        taf.validity.from.hour,
        taf.validity.to.day,
        taf.validity.to.hour
    )?;
    if let Some((from, to)) = taf.valid_between(reference) {
        writeln!(out, "  Valid       {} to {}", utc(&from), utc(&to))?;
    }
    write_conditions(out, "  ", &taf.conditions)?;
    for change in &taf.changes {
        writeln!(out, "  {}", change_label(change))?;
        write_conditions(out, "    ", &change.conditions)?;
    }
    Ok(())
}
