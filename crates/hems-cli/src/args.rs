//! Command line arguments.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use hems_core::{FuelPolicy, PerformanceProfile, WindVector};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BASE: &str = "Christoph 77 Mainz";

/// Reachability planning for HEMS helicopters
#[derive(Parser, Debug)]
#[command(name = "hemsreach", author, version, about)]
pub struct Cli {
    /// Debug logging for all HEMSreach crates
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Airports reachable on the fuel loaded
    Reach(ReachArgs),
    /// Fuel policy breakdown
    Fuel(FuelArgs),
    /// Decode a METAR and/or TAF
    Decode(DecodeArgs),
    /// List the helicopter bases
    Bases(ListArgs),
    /// List the airports
    Airports(ListArgs),
}

#[derive(Args, Debug)]
pub struct ReachArgs {
    /// Departure base, by name or part of it
    #[arg(long, conflicts_with = "airport")]
    pub base: Option<String>,

    /// Departure airport ICAO code instead of a base
    #[arg(long)]
    pub airport: Option<String>,

    /// Cruise altitude in feet
    #[arg(long, default_value_t = 5000.0)]
    pub altitude: f64,

    /// Direction the wind blows from, degrees
    #[arg(long, conflicts_with = "live_wind", requires = "wind_speed")]
    pub wind_dir: Option<f64>,

    /// Wind speed in knots
    #[arg(long, conflicts_with = "live_wind", requires = "wind_dir")]
    pub wind_speed: Option<f64>,

    /// Use the DWD 5000 ft forecast wind of the nearest airport
    #[arg(long)]
    pub live_wind: bool,

    /// Forecast hours averaged for --live-wind
    #[arg(long, default_value_t = 3)]
    pub wind_hours: usize,

    /// Attach METAR/TAF to the nearest reachable airports
    #[arg(long)]
    pub weather: bool,

    /// Number of airports --weather fetches for
    #[arg(long, default_value_t = 10)]
    pub weather_limit: usize,

    /// Print the mission report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub fuel: FuelOptions,

    #[command(flatten)]
    pub profile: ProfileOptions,
}

impl ReachArgs {
    pub fn base_query(&self) -> &str {
        self.base.as_deref().unwrap_or(DEFAULT_BASE)
    }

    /// Calm unless both wind options are given.
    pub fn manual_wind(&self) -> WindVector {
        match (self.wind_dir, self.wind_speed) {
            (Some(direction), Some(speed)) => WindVector::new(direction, speed),
            _ => WindVector::calm(),
        }
    }
}

#[derive(Args, Debug)]
pub struct FuelArgs {
    /// Print the breakdown as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub fuel: FuelOptions,

    #[command(flatten)]
    pub profile: ProfileOptions,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct FuelOptions {
    /// Total fuel loaded, kg
    #[arg(long = "fuel", default_value_t = 500.0)]
    pub total_fuel_kg: f64,

    /// Plan with an alternate; fuel for the alternate leg in kg
    #[arg(long = "alternate")]
    pub alternate_fuel_kg: Option<f64>,
}

impl FuelOptions {
    pub fn policy(&self) -> FuelPolicy {
        let policy = FuelPolicy::new(self.total_fuel_kg);
        match self.alternate_fuel_kg {
            Some(kg) => policy.with_alternate(kg),
            None => policy,
        }
    }
}

/// Performance profile: the H145 D2 figures, a JSON file, and per-field
/// overrides on top.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileOptions {
    /// JSON file with a full performance profile
    #[arg(long = "profile")]
    pub profile_file: Option<PathBuf>,

    #[arg(long)]
    pub climb_speed: Option<f64>,
    #[arg(long)]
    pub climb_burn: Option<f64>,
    /// Climb rate, ft/min
    #[arg(long)]
    pub climb_rate: Option<f64>,

    #[arg(long)]
    pub cruise_speed: Option<f64>,
    #[arg(long)]
    pub cruise_burn: Option<f64>,

    #[arg(long)]
    pub descend_speed: Option<f64>,
    #[arg(long)]
    pub descend_burn: Option<f64>,
    /// Descend rate, ft/min
    #[arg(long)]
    pub descend_rate: Option<f64>,
}

impl ProfileOptions {
    pub fn resolve(&self) -> Result<PerformanceProfile> {
        let mut profile = match &self.profile_file {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading profile {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing profile {}", path.display()))?
            }
            None => PerformanceProfile::h145d2(),
        };
        self.apply(&mut profile);
        profile.validate()?;
        Ok(profile)
    }

    fn apply(&self, profile: &mut PerformanceProfile) {
        let set = |field: &mut f64, value: Option<f64>| {
            if let Some(value) = value {
                *field = value;
            }
        };
        set(&mut profile.climb.speed_kt, self.climb_speed);
        set(&mut profile.climb.fuel_burn_kgph, self.climb_burn);
        set(&mut profile.cruise.speed_kt, self.cruise_speed);
        set(&mut profile.cruise.fuel_burn_kgph, self.cruise_burn);
        set(&mut profile.descend.speed_kt, self.descend_speed);
        set(&mut profile.descend.fuel_burn_kgph, self.descend_burn);
        if self.climb_rate.is_some() {
            profile.climb.rate_fpm = self.climb_rate;
        }
        if self.descend_rate.is_some() {
            profile.descend.rate_fpm = self.descend_rate;
        }
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("report").required(true).multiple(true).args(["metar", "taf"])))]
pub struct DecodeArgs {
    /// Raw METAR or SPECI text
    #[arg(long)]
    pub metar: Option<String>,

    /// Raw TAF text
    #[arg(long)]
    pub taf: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub json: bool,
}
