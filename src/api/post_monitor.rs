use super::{base, delete, get_json, http_client, probe, TransportError};
use crate::config::Config;
use crate::models::{ClassificationStats, IncidentRecord, RequestStats};

/// Client for the blocked-request side of the backend.
#[derive(Debug, Clone)]
pub struct PostMonitorClient {
    base_url: String,
    http: reqwest::Client,
}

impl PostMonitorClient {
    pub fn new(config: &Config) -> Self {
        Self { base_url: base(&config.post_monitor_url), http: http_client() }
    }

    pub async fn stats(&self) -> Result<RequestStats, TransportError> {
        get_json(&self.http, format!("{}/api/stats", self.base_url)).await
    }

    pub async fn classification_stats(&self) -> Result<ClassificationStats, TransportError> {
        get_json(&self.http, format!("{}/api/stats/classification", self.base_url)).await
    }

    pub async fn list_all(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<IncidentRecord>, TransportError> {
        let mut url = format!("{}/api/blocked-requests", self.base_url);
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(format!("limit={limit}"));
        }
        if let Some(offset) = offset {
            params.push(format!("offset={offset}"));
        }
        if !params.is_empty() {
            url = format!("{url}?{}", params.join("&"));
        }
        get_json(&self.http, url).await
    }

    pub async fn list_human(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<IncidentRecord>, TransportError> {
        let url =
            format!("{}/api/blocked-requests/human?limit={limit}&skip={skip}", self.base_url);
        get_json(&self.http, url).await
    }

    /// Human-classified records that lack a correlated input click.
    pub async fn list_human_background(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<IncidentRecord>, TransportError> {
        let url = format!(
            "{}/api/blocked-requests/human/background?limit={limit}&skip={skip}",
            self.base_url
        );
        get_json(&self.http, url).await
    }

    pub async fn list_bot(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<IncidentRecord>, TransportError> {
        let url = format!("{}/api/blocked-requests/bot?limit={limit}&skip={skip}", self.base_url);
        get_json(&self.http, url).await
    }

    /// Deletes one record. Callers are responsible for re-reading state
    /// afterward; there is no server-pushed invalidation.
    pub async fn delete_one(&self, id: u64) -> Result<(), TransportError> {
        delete(&self.http, format!("{}/api/blocked-requests/{id}", self.base_url)).await
    }

    pub async fn clear_all(&self) -> Result<(), TransportError> {
        delete(&self.http, format!("{}/api/blocked-requests", self.base_url)).await
    }

    pub async fn check_reachable(&self) -> bool {
        probe(&self.http, format!("{}/api/stats", self.base_url)).await
    }
}
