//! HTTP plumbing shared by the adapters.

use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Basic-auth credentials for a data server mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    /// `None` unless a user name is given.
    pub fn from_parts(user: Option<String>, password: Option<String>) -> Option<Self> {
        let user = user.filter(|u| !u.trim().is_empty())?;
        Some(Self {
            user,
            password: password.unwrap_or_default(),
        })
    }
}

/// Client used by every adapter.
pub fn client(timeout: Duration) -> Result<Client, FetchError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("hemsreach/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(crate) async fn get_bytes(
    client: &Client,
    url: &str,
    credentials: Option<&Credentials>,
) -> Result<Vec<u8>, FetchError> {
    let mut request = client.get(url);
    if let Some(credentials) = credentials {
        request = request.basic_auth(&credentials.user, Some(&credentials.password));
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "request rejected");
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

pub(crate) async fn get_text(
    client: &Client,
    url: &str,
    credentials: Option<&Credentials>,
) -> Result<String, FetchError> {
    let bytes = get_bytes(client, url, credentials).await?;
    Ok(decode_text(&bytes))
}

/// UTF-8, falling back to Latin-1 (which maps every byte).
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Directory URL with exactly one trailing slash.
pub(crate) fn directory_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}/",
        base.trim_end_matches('/'),
        path.trim_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_fallback_keeps_umlauts() {
        assert_eq!(decode_text("Nürnberg".as_bytes()), "Nürnberg");
        assert_eq!(decode_text(b"N\xfcrnberg"), "Nürnberg");
    }

    #[test]
    fn credentials_need_a_user() {
        assert_eq!(Credentials::from_parts(None, Some("secret".into())), None);
        assert_eq!(Credentials::from_parts(Some(" ".into()), None), None);
        let credentials = Credentials::from_parts(Some("hems".into()), None).unwrap();
        assert_eq!(credentials.password, "");
    }

    #[test]
    fn directory_urls_are_normalised() {
        assert_eq!(
            directory_url("https://data.dwd.de/", "/aviation/OPMET/METAR/DE"),
            "https://data.dwd.de/aviation/OPMET/METAR/DE/"
        );
    }
}
