//! Capability interface implemented by every weather provider.

use crate::error::FetchError;
use crate::metar::Metar;
use crate::taf::Taf;
use async_trait::async_trait;

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Short provider name for logs and reports.
    fn name(&self) -> &str;

    async fn fetch_metar(&self, icao: &str) -> Result<Metar, FetchError>;

    async fn fetch_taf(&self, icao: &str) -> Result<Taf, FetchError>;
}

#[async_trait]
impl<T: WeatherSource + ?Sized> WeatherSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_metar(&self, icao: &str) -> Result<Metar, FetchError> {
        (**self).fetch_metar(icao).await
    }

    async fn fetch_taf(&self, icao: &str) -> Result<Taf, FetchError> {
        (**self).fetch_taf(icao).await
    }
}
