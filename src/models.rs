//! Read-only mirrors of the backend-owned records. This layer never
//! originates ids or timestamps; everything here is replaced wholesale on
//! each successful poll.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickPoint {
    pub x: f64,
    pub y: f64,
}

/// A blocked request, as classified by the backend. The classification
/// fields are present only when the backend found a correlated click.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: u64,
    pub timestamp: String,
    pub target_url: String,
    #[serde(default)]
    pub target_hostname: String,
    pub source_url: String,
    pub matched_fields: Vec<String>,
    pub matched_values: HashMap<String, String>,
    pub request_method: String,
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_correlation_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_time_diff_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_coordinates: Option<ClickPoint>,
    #[serde(default)]
    pub has_click_correlation: bool,
}

impl IncidentRecord {
    /// Correlation id and click-to-submit delta, present together or not at
    /// all. Guards the invariant that a correlated record carries both.
    pub fn correlation(&self) -> Option<(u64, i64)> {
        if !self.has_click_correlation {
            return None;
        }
        Some((self.click_correlation_id?, self.click_time_diff_ms?))
    }

    /// Backend-reported hostname, derived from `target_url` when the
    /// backend left it empty.
    pub fn hostname(&self) -> String {
        if !self.target_hostname.is_empty() {
            return self.target_hostname.clone();
        }
        url::Url::parse(&self.target_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// One click observed by the detection backend. Ordering is
/// backend-determined (most-recent-first); this layer does not re-sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: u64,
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub is_suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trusted: Option<bool>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameCount {
    pub hostname: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

/// Aggregate counters for the blocked-request side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStats {
    pub total_requests: u64,
    pub today_requests: u64,
    #[serde(default)]
    pub blocked_domains: Vec<HostnameCount>,
    #[serde(default)]
    pub recent_activity: Vec<DailyCount>,
}

/// Aggregate counters for the click-detection side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickStats {
    pub total_clicks: u64,
    pub suspicious_clicks: u64,
    pub legitimate_clicks: u64,
    pub unique_pages: u64,
    pub total_os_clicks: u64,
}

/// Human/bot classification aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationStats {
    pub total_requests: u64,
    pub human_requests: u64,
    pub bot_requests: u64,
    pub uncorrelated_requests: u64,
    pub correlation_rate: f64,
}
