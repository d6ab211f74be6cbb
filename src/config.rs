/// The only file where reading environment variables is allowed.
/// Everything else receives an explicit `Config` at construction time.
use std::time::Duration;

/// Page size used by every paginated view.
pub const ITEMS_PER_PAGE: usize = 20;

/// Default list window for the classified request endpoints.
pub const LIST_LIMIT: usize = 100;
/// Default window for the recent-clicks endpoint.
pub const RECENT_CLICKS_LIMIT: usize = 100;

// faster-changing data polls faster
pub const CLICK_POLL_MILLIS: u64 = 2_000;
pub const REQUEST_POLL_MILLIS: u64 = 5_000;
pub const CLASSIFICATION_POLL_MILLIS: u64 = 10_000;

const DEFAULT_POST_MONITOR_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_CLICK_DETECTION_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the blocked-request backend.
    pub post_monitor_url: String,
    /// Base URL of the click-detection backend.
    pub click_detection_url: String,
    /// Cadence for request-telemetry pollers.
    pub request_poll: Duration,
    /// Cadence for click-telemetry pollers.
    pub click_poll: Duration,
    /// Cadence for classification-aggregate pollers.
    pub classification_poll: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            post_monitor_url: DEFAULT_POST_MONITOR_URL.to_string(),
            click_detection_url: DEFAULT_CLICK_DETECTION_URL.to_string(),
            request_poll: Duration::from_millis(REQUEST_POLL_MILLIS),
            click_poll: Duration::from_millis(CLICK_POLL_MILLIS),
            classification_poll: Duration::from_millis(CLASSIFICATION_POLL_MILLIS),
        }
    }
}

impl Config {
    /// Builds a config from the environment, falling back to the local
    /// defaults when the variables are unset.
    pub fn from_env() -> Self {
        let post_monitor_url = std::env::var("NEXT_PUBLIC_POST_MONITOR_API")
            .unwrap_or_else(|_| DEFAULT_POST_MONITOR_URL.to_string());
        let click_detection_url = std::env::var("NEXT_PUBLIC_CLICK_DETECTION_API")
            .unwrap_or_else(|_| DEFAULT_CLICK_DETECTION_URL.to_string());

        Self { post_monitor_url, click_detection_url, ..Self::default() }
    }

    /// Points both backends at the same base URL. Useful for tests and the
    /// unified single-backend deployment.
    pub fn with_base_url(url: &str) -> Self {
        Self {
            post_monitor_url: url.to_string(),
            click_detection_url: url.to_string(),
            ..Self::default()
        }
    }
}
