//! HEMSreach CLI - reachability planning from the command line.
//!
//! The `hemsreach` binary is a thin wrapper around [`commands::run`]:
//! - `reach`: reachable airports for a base or airport departure
//! - `fuel`: the fuel policy table
//! - `decode`: METAR/TAF decoding
//! - `bases` / `airports`: reference data

pub mod args;
pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod weather;

pub use args::Cli;
pub use config::Config;
