//! DWD OPMET mirror adapter.
//!
//! The mirror publishes one file per bulletin under
//! `{base}/aviation/OPMET/{METAR|TAF}/DE/`, named with the issuing time and
//! the station, e.g. `SADL31_EDZW_181720_EDDF_-_20240618172000.txt`.

use crate::error::{FetchError, Product};
use crate::http::{directory_url, get_text, Credentials};
use crate::listing::{latest_matching, resolve_href};
use crate::metar::Metar;
use crate::source::WeatherSource;
use crate::taf::Taf;
use async_trait::async_trait;
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct DwdOpmetSource {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl DwdOpmetSource {
    pub fn new(client: Client, base_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }

    pub fn listing_url(&self, product: Product) -> String {
        directory_url(
            &self.base_url,
            &format!("aviation/OPMET/{}/DE", product.keyword()),
        )
    }

    async fn fetch_bulletin(&self, product: Product, icao: &str) -> Result<String, FetchError> {
        let icao = icao.trim().to_uppercase();
        let listing_url = self.listing_url(product);
        let listing = get_text(&self.client, &listing_url, self.credentials.as_ref()).await?;

        let href = latest_matching(&listing, &format!("_{}_", icao))
            .ok_or_else(|| FetchError::not_found(&icao, product))?;
        let file_url = resolve_href(&listing_url, href)?;
        tracing::debug!(icao = %icao, url = %file_url, "latest OPMET bulletin");

        let content = get_text(&self.client, &file_url, self.credentials.as_ref()).await?;
        extract_bulletin(&content, product).ok_or_else(|| {
            FetchError::parse(product, format!("no {} bulletin in {}", product, file_url))
        })
    }
}

/// Text between the product keyword and the terminating `=`, with line
/// breaks collapsed.
pub fn extract_bulletin(content: &str, product: Product) -> Option<String> {
    let keyword = product.keyword();
    let start = content.find(keyword)? + keyword.len();
    let body = &content[start..];
    let end = body.find('=').unwrap_or(body.len());
    let bulletin = body[..end].split_whitespace().collect::<Vec<_>>().join(" ");
    (!bulletin.is_empty()).then_some(bulletin)
}

#[async_trait]
impl WeatherSource for DwdOpmetSource {
    fn name(&self) -> &str {
        "dwd"
    }

    async fn fetch_metar(&self, icao: &str) -> Result<Metar, FetchError> {
        let bulletin = self.fetch_bulletin(Product::Metar, icao).await?;
        Metar::parse(&bulletin)
    }

    async fn fetch_taf(&self, icao: &str) -> Result<Taf, FetchError> {
        let bulletin = self.fetch_bulletin(Product::Taf, icao).await?;
        Taf::parse(&bulletin)
    }
}
