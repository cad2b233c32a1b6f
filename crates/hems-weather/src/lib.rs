//! HEMS weather - METAR/TAF decoding and weather ingestion
//!
//! All network I/O of the workspace lives here. Each provider is an adapter
//! behind the [`WeatherSource`] trait; the DWD airport forecast supplies the
//! 5000 ft wind used for live reachability.

pub mod avwx;
pub mod dwd;
pub mod error;
pub mod fallback;
pub mod groups;
pub mod http;
pub mod listing;
pub mod metar;
pub mod source;
pub mod taf;
pub mod winds_aloft;

pub use avwx::AvwxSource;
pub use dwd::DwdOpmetSource;
pub use error::{FetchError, Product};
pub use fallback::FallbackSource;
pub use groups::{CloudCover, CloudLayer, Conditions, DayTime, WeatherGroup, WindDirection, WindGroup};
pub use http::Credentials;
pub use metar::{Metar, Trend, TrendKind};
pub use source::WeatherSource;
pub use taf::{ChangeGroup, ChangeKind, Taf, ValidityPeriod};
pub use winds_aloft::{AirportForecast, WindsAloftClient, WindsAloftSummary};
