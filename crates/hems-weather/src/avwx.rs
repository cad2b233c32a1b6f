//! AVWX REST API adapter.

use crate::error::{FetchError, Product};
use crate::metar::Metar;
use crate::source::WeatherSource;
use crate::taf::Taf;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// The one field of an AVWX report we rely on.
#[derive(Debug, Deserialize)]
struct AvwxReport {
    #[serde(default)]
    raw: Option<String>,
}

/// HTTP client for `GET {base}/api/{metar|taf}/{ICAO}`.
#[derive(Debug, Clone)]
pub struct AvwxSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl AvwxSource {
    /// A blank token is treated as no token.
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }

    pub fn report_url(&self, product: Product, icao: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.base_url,
            product.keyword().to_lowercase(),
            icao.trim().to_uppercase()
        )
    }

    async fn fetch_raw(&self, product: Product, icao: &str) -> Result<String, FetchError> {
        let url = self.report_url(product, icao);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        // AVWX answers 204 when the station has no current report
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(icao, product));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        raw_from_body(&body, product, icao)
    }
}

/// Pull the raw report text out of an AVWX JSON body.
pub fn raw_from_body(body: &str, product: Product, icao: &str) -> Result<String, FetchError> {
    let report: AvwxReport =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;
    report
        .raw
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| FetchError::not_found(icao, product))
}

#[async_trait]
impl WeatherSource for AvwxSource {
    fn name(&self) -> &str {
        "avwx"
    }

    async fn fetch_metar(&self, icao: &str) -> Result<Metar, FetchError> {
        let raw = self.fetch_raw(Product::Metar, icao).await?;
        tracing::debug!(icao, source = "avwx", "METAR received");
        Metar::parse(&raw)
    }

    async fn fetch_taf(&self, icao: &str) -> Result<Taf, FetchError> {
        let raw = self.fetch_raw(Product::Taf, icao).await?;
        tracing::debug!(icao, source = "avwx", "TAF received");
        Taf::parse(&raw)
    }
}
