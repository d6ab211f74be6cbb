//! Composition root: owns the config, both endpoint clients, the metrics
//! registry and every poller handle. Each poller exclusively owns its own
//! state slice; the dashboard only hands out read handles and coordinators.

use crate::api::{ClickDetectionClient, PostMonitorClient};
use crate::config::{Config, LIST_LIMIT, RECENT_CLICKS_LIMIT};
use crate::metrics::Metrics;
use crate::models::{ClassificationStats, ClickEvent, ClickStats, IncidentRecord, RequestStats};
use crate::mutation::MutationCoordinator;
use crate::poller::{Poller, PollerConfig};
use std::sync::Arc;

pub struct Dashboard {
    config: Config,
    post_monitor: PostMonitorClient,
    click_detection: ClickDetectionClient,
    metrics: Arc<Metrics>,

    requests: Poller<Vec<IncidentRecord>>,
    request_stats: Poller<RequestStats>,
    classification: Poller<ClassificationStats>,
    human_requests: Poller<Vec<IncidentRecord>>,
    human_background: Poller<Vec<IncidentRecord>>,
    bot_requests: Poller<Vec<IncidentRecord>>,
    click_stats: Poller<ClickStats>,
    click_events: Poller<Vec<ClickEvent>>,
}

/// Builds a metrics-recording fetch closure around one client call.
macro_rules! fetcher {
    ($client:ident, $metrics:ident, $call:expr) => {{
        let client = $client.clone();
        let metrics = $metrics.clone();
        move || {
            let client = client.clone();
            let metrics = metrics.clone();
            async move {
                let result = $call(client).await;
                metrics.record(&result);
                result
            }
        }
    }};
}

impl Dashboard {
    /// Spawns all pollers against the configured backends. Dropping the
    /// returned dashboard (and any cloned handles) stops every poller.
    pub fn start(config: Config) -> Self {
        let post_monitor = PostMonitorClient::new(&config);
        let click_detection = ClickDetectionClient::new(&config);
        let metrics = Arc::new(Metrics::new());

        let request_cfg = PollerConfig::every(config.request_poll);
        let click_cfg = PollerConfig::every(config.click_poll);
        let classification_cfg = PollerConfig::every(config.classification_poll);

        let requests = Poller::spawn(
            request_cfg,
            fetcher!(post_monitor, metrics, |c: PostMonitorClient| async move {
                c.list_all(None, None).await
            }),
        );
        let request_stats = Poller::spawn(
            request_cfg,
            fetcher!(post_monitor, metrics, |c: PostMonitorClient| async move {
                c.stats().await
            }),
        );
        let classification = Poller::spawn(
            classification_cfg,
            fetcher!(post_monitor, metrics, |c: PostMonitorClient| async move {
                c.classification_stats().await
            }),
        );
        let human_requests = Poller::spawn(
            request_cfg,
            fetcher!(post_monitor, metrics, |c: PostMonitorClient| async move {
                c.list_human(LIST_LIMIT, 0).await
            }),
        );
        let human_background = Poller::spawn(
            request_cfg,
            fetcher!(post_monitor, metrics, |c: PostMonitorClient| async move {
                c.list_human_background(LIST_LIMIT, 0).await
            }),
        );
        let bot_requests = Poller::spawn(
            request_cfg,
            fetcher!(post_monitor, metrics, |c: PostMonitorClient| async move {
                c.list_bot(LIST_LIMIT, 0).await
            }),
        );
        let click_stats = Poller::spawn(
            click_cfg,
            fetcher!(click_detection, metrics, |c: ClickDetectionClient| async move {
                c.stats().await
            }),
        );
        let click_events = Poller::spawn(
            click_cfg,
            fetcher!(click_detection, metrics, |c: ClickDetectionClient| async move {
                c.recent(RECENT_CLICKS_LIMIT).await
            }),
        );

        Self {
            config,
            post_monitor,
            click_detection,
            metrics,
            requests,
            request_stats,
            classification,
            human_requests,
            human_background,
            bot_requests,
            click_stats,
            click_events,
        }
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn requests(&self) -> &Poller<Vec<IncidentRecord>> {
        &self.requests
    }

    pub fn request_stats(&self) -> &Poller<RequestStats> {
        &self.request_stats
    }

    pub fn classification(&self) -> &Poller<ClassificationStats> {
        &self.classification
    }

    pub fn human_requests(&self) -> &Poller<Vec<IncidentRecord>> {
        &self.human_requests
    }

    pub fn human_background(&self) -> &Poller<Vec<IncidentRecord>> {
        &self.human_background
    }

    pub fn bot_requests(&self) -> &Poller<Vec<IncidentRecord>> {
        &self.bot_requests
    }

    pub fn click_stats(&self) -> &Poller<ClickStats> {
        &self.click_stats
    }

    pub fn click_events(&self) -> &Poller<Vec<ClickEvent>> {
        &self.click_events
    }

    /// Coordinator for delete/clear against the main incident log.
    pub fn request_mutator(&self) -> MutationCoordinator {
        MutationCoordinator::new(self.post_monitor.clone(), self.requests.clone())
    }

    /// One-shot reachability probe of both backends.
    pub async fn check_backends(&self) -> (bool, bool) {
        tokio::join!(self.post_monitor.check_reachable(), self.click_detection.check_reachable())
    }

    pub fn metrics_json(&self) -> serde_json::Value {
        self.metrics.get_json()
    }
}
