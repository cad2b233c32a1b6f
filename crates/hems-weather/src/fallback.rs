//! Primary/secondary source chain.

use crate::error::FetchError;
use crate::metar::Metar;
use crate::source::WeatherSource;
use crate::taf::Taf;
use async_trait::async_trait;

/// Asks `primary` first and `secondary` when that fails. When both fail the
/// secondary's error is returned.
#[derive(Debug, Clone)]
pub struct FallbackSource<P, S> {
    primary: P,
    secondary: S,
    name: String,
}

impl<P: WeatherSource, S: WeatherSource> FallbackSource<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        let name = format!("{}+{}", primary.name(), secondary.name());
        Self {
            primary,
            secondary,
            name,
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

#[async_trait]
impl<P: WeatherSource, S: WeatherSource> WeatherSource for FallbackSource<P, S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_metar(&self, icao: &str) -> Result<Metar, FetchError> {
        match self.primary.fetch_metar(icao).await {
            Ok(metar) => Ok(metar),
            Err(err) => {
                tracing::warn!(
                    icao,
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    error = %err,
                    "METAR fetch failed, falling back"
                );
                self.secondary.fetch_metar(icao).await
            }
        }
    }

    async fn fetch_taf(&self, icao: &str) -> Result<Taf, FetchError> {
        match self.primary.fetch_taf(icao).await {
            Ok(taf) => Ok(taf),
            Err(err) => {
                tracing::warn!(
                    icao,
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    error = %err,
                    "TAF fetch failed, falling back"
                );
                self.secondary.fetch_taf(icao).await
            }
        }
    }
}
