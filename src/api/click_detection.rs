use super::{base, get_json, http_client, probe, TransportError};
use crate::config::Config;
use crate::models::{ClickEvent, ClickStats};

/// Client for the click-detection side of the backend.
#[derive(Debug, Clone)]
pub struct ClickDetectionClient {
    base_url: String,
    http: reqwest::Client,
}

impl ClickDetectionClient {
    pub fn new(config: &Config) -> Self {
        Self { base_url: base(&config.click_detection_url), http: http_client() }
    }

    pub async fn stats(&self) -> Result<ClickStats, TransportError> {
        get_json(&self.http, format!("{}/api/click-detection/stats", self.base_url)).await
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<ClickEvent>, TransportError> {
        let url = format!("{}/api/click-detection/recent?limit={limit}", self.base_url);
        get_json(&self.http, url).await
    }

    pub async fn check_reachable(&self) -> bool {
        probe(&self.http, format!("{}/api/click-detection/stats", self.base_url)).await
    }
}
