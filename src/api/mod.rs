//! Typed wrappers over the two backend endpoints. The clients are stateless
//! apart from their base URL and the shared reqwest connection pool; every
//! failure collapses into [`TransportError`].

mod click_detection;
mod post_monitor;

pub use click_detection::ClickDetectionClient;
pub use post_monitor::PostMonitorClient;

use crate::metrics::Typename;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The only error kind this layer produces. No per-status special-casing
/// beyond surfacing the numeric status; malformed JSON, DNS failure and
/// timeouts all collapse into the transport variant.
#[derive(Debug, thiserror::Error, strum_macros::IntoStaticStr)]
pub enum TransportError {
    #[error("http status {0}")]
    Status(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl Typename for TransportError {
    fn typename(&self) -> &'static str {
        self.into()
    }
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: String,
) -> Result<T, TransportError> {
    let response = http.get(&url).header(CONTENT_TYPE, "application/json").send().await?;
    if !response.status().is_success() {
        return Err(TransportError::Status(response.status().as_u16()));
    }
    Ok(response.json().await?)
}

pub(crate) async fn delete(http: &reqwest::Client, url: String) -> Result<(), TransportError> {
    let response = http.delete(&url).header(CONTENT_TYPE, "application/json").send().await?;
    if !response.status().is_success() {
        return Err(TransportError::Status(response.status().as_u16()));
    }
    Ok(())
}

/// Liveness probe: any failure becomes `false`, never an error.
pub(crate) async fn probe(http: &reqwest::Client, url: String) -> bool {
    match http.get(&url).header(CONTENT_TYPE, "application/json").send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

pub(crate) fn base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
