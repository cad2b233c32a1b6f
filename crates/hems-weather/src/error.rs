//! Fetch and decode failures.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Weather products the adapters know how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Metar,
    Taf,
    AirportForecast,
}

impl Product {
    /// Keyword used in bulletins and provider paths.
    pub fn keyword(&self) -> &'static str {
        match self {
            Product::Metar => "METAR",
            Product::Taf => "TAF",
            Product::AirportForecast => "AirportWxForecast",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no {product} available for {icao}")]
    NotFound { icao: String, product: Product },

    #[error("malformed {product}: {reason}")]
    Parse { product: Product, reason: String },

    /// The response body could not be decoded.
    #[error("cannot decode response: {0}")]
    Decode(String),

    #[error("invalid URL {0}")]
    InvalidUrl(String),

    #[error("no airport forecast available near {lat:.3}, {lon:.3}")]
    NoStation { lat: f64, lon: f64 },
}

impl FetchError {
    pub(crate) fn parse(product: Product, reason: impl Into<String>) -> Self {
        FetchError::Parse {
            product,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(icao: &str, product: Product) -> Self {
        FetchError::NotFound {
            icao: icao.to_uppercase(),
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_product_and_station() {
        let err = FetchError::not_found("eddf", Product::Taf);
        assert_eq!(err.to_string(), "no TAF available for EDDF");

        let err = FetchError::parse(Product::Metar, "missing observation time");
        assert_eq!(err.to_string(), "malformed METAR: missing observation time");

        let err = FetchError::Status {
            url: "https://avwx.rest/api/metar/EDDF".into(),
            status: 401,
        };
        assert!(err.to_string().ends_with("returned HTTP 401"));
    }
}
